pub use sea_orm_migration::prelude::*;

mod m20260601_000001_waitlist_entries;
mod m20260601_000002_admins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_waitlist_entries::Migration),
            Box::new(m20260601_000002_admins::Migration),
        ]
    }
}
