//! SeaORM-backed user store (SQLite or PostgreSQL)

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::user;
use crate::store::{NewUser, StoreError, User, UserFilter, UserStore, USERS_COLLECTION};

#[derive(Clone)]
pub struct SeaOrmUserStore {
    db: DatabaseConnection,
}

impl SeaOrmUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SeaOrmUserStore {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let query = match filter {
            UserFilter::Id(id) => user::Entity::find_by_id(*id),
            UserFilter::Email(email) => {
                user::Entity::find().filter(user::Column::Email.eq(email.as_str()))
            }
        };

        Ok(query.one(&self.db).await?.map(User::from))
    }

    async fn insert_one(&self, new_user: NewUser) -> Result<User, StoreError> {
        let email = new_user.email.clone();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            avatar: Set(new_user.avatar),
            created_at: Set(Utc::now()),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateEmail(email),
            _ => StoreError::Database(e),
        })?;

        debug!("Inserted user {} into {}", inserted.id, USERS_COLLECTION);
        Ok(inserted.into())
    }
}
