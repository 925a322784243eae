//! Migrator for the account tables. Run through the `migrate` binary.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_preference;
mod m20240101_000002_create_user_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_preference::Migration),
            Box::new(m20240101_000002_create_user_products::Migration),
        ]
    }
}
