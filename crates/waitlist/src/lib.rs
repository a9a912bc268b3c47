//! Waitlist store and domain rules.
//!
//! The store exclusively owns the persisted entities (waitlist entries and
//! admins) and mediates all reads/writes. Conversation state lives in the
//! bot crate and is never persisted here.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
};

pub use credential::{CREDENTIAL_ALPHABET, DEFAULT_CREDENTIAL_LENGTH, generate_credential};
pub use error::WaitlistError;
pub use username::normalize_username;

mod admins;
mod credential;
mod entries;
mod error;
mod username;

type ResultStore<T> = Result<T, WaitlistError>;

/// A waitlist registration: desired handle plus generated credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub user_id: i64,
    pub wanted_username: String,
    pub credential: String,
    pub created_at: DateTime<Utc>,
}

impl From<entries::Model> for Entry {
    fn from(model: entries::Model) -> Self {
        Self {
            user_id: model.user_id,
            wanted_username: model.wanted_username,
            credential: model.credential,
            created_at: model.created_at,
        }
    }
}

/// Repository over the waitlist tables.
///
/// Every operation is a single logical transaction on the connection; a
/// failed operation leaves nothing half-written.
#[derive(Clone, Debug)]
pub struct Waitlist {
    database: DatabaseConnection,
}

impl Waitlist {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Whether `user_id` has been promoted to admin.
    pub async fn is_admin(&self, user_id: i64) -> ResultStore<bool> {
        let admin = admins::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?;
        Ok(admin.is_some())
    }

    /// Number of admins currently stored.
    pub async fn admin_count(&self) -> ResultStore<u64> {
        let count = admins::Entity::find().count(&self.database).await?;
        Ok(count)
    }

    /// Promotes `user_id` to admin if no admin exists yet.
    ///
    /// The zero-admins check runs inside the same database transaction as
    /// the insert, so racing bootstrap conversations yield exactly one
    /// admin. Returns whether the promotion happened.
    pub async fn promote_to_admin(&self, user_id: i64) -> ResultStore<bool> {
        let txn = self.database.begin().await?;

        let count = admins::Entity::find().count(&txn).await?;
        if count > 0 {
            txn.commit().await?;
            return Ok(false);
        }

        admins::ActiveModel {
            user_id: ActiveValue::Set(user_id),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        Ok(true)
    }

    /// Returns the waitlist entry registered by `user_id`, if any.
    pub async fn find_entry(&self, user_id: i64) -> ResultStore<Option<Entry>> {
        let model = entries::Entity::find()
            .filter(entries::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?;
        Ok(model.map(Entry::from))
    }

    /// Returns the entry holding `wanted_username`, if any.
    ///
    /// `wanted_username` must already be normalized; the lookup is an exact
    /// string match.
    pub async fn find_entry_by_username(&self, wanted_username: &str) -> ResultStore<Option<Entry>> {
        let model = entries::Entity::find()
            .filter(entries::Column::WantedUsername.eq(wanted_username))
            .one(&self.database)
            .await?;
        Ok(model.map(Entry::from))
    }

    /// Inserts a new waitlist entry.
    ///
    /// A unique-constraint violation on `wanted_username` (lost race between
    /// the pre-insert check and the insert) is reported as
    /// [`WaitlistError::Conflict`], so callers treat it exactly like a failed
    /// uniqueness check.
    pub async fn register(
        &self,
        user_id: i64,
        wanted_username: &str,
        credential: &str,
    ) -> ResultStore<Entry> {
        let model = entries::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            wanted_username: ActiveValue::Set(wanted_username.to_string()),
            credential: ActiveValue::Set(credential.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        match model.insert(&self.database).await {
            Ok(inserted) => Ok(inserted.into()),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(WaitlistError::Conflict(wanted_username.to_string()))
                } else {
                    Err(WaitlistError::Database(err))
                }
            }
        }
    }

    /// All entries ordered by creation time ascending.
    ///
    /// Ties on `created_at` fall back to the insertion id, keeping the
    /// export order stable.
    pub async fn export_all_ordered(&self) -> ResultStore<Vec<Entry>> {
        let models = entries::Entity::find()
            .order_by_asc(entries::Column::CreatedAt)
            .order_by_asc(entries::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Entry::from).collect())
    }
}
