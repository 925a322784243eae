use std::collections::BTreeSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set, SqlErr};
use tracing::{debug, instrument};

use models::{user_preference, user_product};

use crate::account::errors::StoreError;
use crate::account::repository::AccountRepository;
use crate::token::Identity;

/// PostgreSQL-backed repository over the `user_preference` and
/// `user_products` tables. Every write is a single statement.
#[derive(Clone)]
pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn read_failed(e: DbErr) -> StoreError {
    match e {
        DbErr::Type(_) | DbErr::TryIntoErr { .. } | DbErr::Json(_) => StoreError::RowDecodeFailed(e.to_string()),
        other => StoreError::QueryFailed(other.to_string()),
    }
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn list_products(&self, id: Identity) -> Result<BTreeSet<String>, StoreError> {
        let names: Vec<String> = user_product::Entity::find()
            .select_only()
            .column(user_product::Column::ProductName)
            .filter(user_product::Column::UserId.eq(id.as_uuid()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(read_failed)?;
        Ok(names.into_iter().collect())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_preference(&self, id: Identity) -> Result<String, StoreError> {
        let found = user_preference::Entity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(read_failed)?;
        found.map(|m| m.preference_name).ok_or(StoreError::PreferenceNotFound)
    }

    #[instrument(skip(self, value), fields(user_id = %id))]
    async fn upsert_preference(&self, id: Identity, value: &str) -> Result<(), StoreError> {
        let am = user_preference::ActiveModel {
            user_id: Set(id.as_uuid()),
            preference_name: Set(value.to_string()),
        };
        user_preference::Entity::insert(am)
            .on_conflict(
                OnConflict::column(user_preference::Column::UserId)
                    .update_column(user_preference::Column::PreferenceName)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| StoreError::PreferenceWriteFailed(e.to_string()))?;
        debug!("preference upserted");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn remove_preference(&self, id: Identity) -> Result<(), StoreError> {
        let res = user_preference::Entity::delete_many()
            .filter(user_preference::Column::UserId.eq(id.as_uuid()))
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(StoreError::PreferenceNotFound);
        }
        debug!("preference removed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn add_product(&self, id: Identity, name: &str) -> Result<(), StoreError> {
        let am = user_product::ActiveModel {
            user_id: Set(id.as_uuid()),
            product_name: Set(name.to_string()),
        };
        match user_product::Entity::insert(am).exec_without_returning(&self.db).await {
            Ok(_) => {
                debug!("product added");
                Ok(())
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(StoreError::ProductAlreadyExists),
                _ => Err(StoreError::QueryFailed(e.to_string())),
            },
        }
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn remove_product(&self, id: Identity, name: &str) -> Result<(), StoreError> {
        let res = user_product::Entity::delete_many()
            .filter(user_product::Column::UserId.eq(id.as_uuid()))
            .filter(user_product::Column::ProductName.eq(name))
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(StoreError::ProductNotFound);
        }
        debug!("product removed");
        Ok(())
    }
}
