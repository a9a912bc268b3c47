//! The module contains the errors the store can throw.
//!
//! The errors are:
//!
//! - [`Conflict`] thrown when a username is no longer unique at insert time.
//! - [`Database`] thrown when the underlying storage cannot be reached or
//!   rejects an operation for any other reason.
//!
//!  [`Conflict`]: WaitlistError::Conflict
//!  [`Database`]: WaitlistError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Waitlist store errors.
#[derive(Error, Debug)]
pub enum WaitlistError {
    #[error("\"{0}\" already taken!")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl WaitlistError {
    /// Whether this error is the recoverable username-collision case.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
