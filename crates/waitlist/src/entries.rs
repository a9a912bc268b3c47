//! Waitlist entries table.
//!
//! One row per registered user: the requesting telegram account, the
//! normalized handle it wants reserved, and the credential issued with it.
//! Rows are created once and never updated or deleted.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "waitlist_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub wanted_username: String,
    pub credential: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
