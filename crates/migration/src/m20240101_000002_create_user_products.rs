//! Create `user_products` table keyed by (user_id, product_name).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProducts::Table)
                    .if_not_exists()
                    .col(uuid(UserProducts::UserId).not_null())
                    .col(string_len(UserProducts::ProductName, 255).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_user_products")
                            .col(UserProducts::UserId)
                            .col(UserProducts::ProductName),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserProducts::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserProducts { Table, UserId, ProductName }
