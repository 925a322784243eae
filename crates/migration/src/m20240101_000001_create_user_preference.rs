//! Create `user_preference` table.
//!
//! One row per user; `user_id` is the primary key so a second insert for the
//! same user conflicts and can be turned into an update.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserPreference::Table)
                    .if_not_exists()
                    .col(uuid(UserPreference::UserId).primary_key())
                    .col(string_len(UserPreference::PreferenceName, 255).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserPreference::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserPreference { Table, UserId, PreferenceName }
