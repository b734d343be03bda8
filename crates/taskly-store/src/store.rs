//! The `users` collection as seen by the rest of Taskly

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::user;

/// Name of the collection (table) holding user records
pub const USERS_COLLECTION: &str = "users";

/// A stored user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Never leaves the process
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            avatar: model.avatar,
            created_at: model.created_at,
        }
    }
}

/// Everything needed to insert a user; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

impl NewUser {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            name,
            email,
            password_hash,
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }
}

/// Field-match filter for `find_one`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(Uuid),
    /// Exact, case-sensitive match
    Email(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Id(id) => user.id == *id,
            UserFilter::Email(email) => user.email == *email,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
}

/// Collection-scoped access to user records
///
/// Implementations are shared by every in-flight request and must not rely
/// on callers for locking. Failures are returned as-is; nothing retries.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// First user matching `filter`, if any
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError>;

    /// Insert a user, failing with `DuplicateEmail` if the email is taken
    async fn insert_one(&self, user: NewUser) -> Result<User, StoreError>;
}
