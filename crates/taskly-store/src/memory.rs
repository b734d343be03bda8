//! In-memory user store for tests and throwaway servers

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{NewUser, StoreError, User, UserFilter, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;

        let found = match filter {
            UserFilter::Id(id) => users.get(id).cloned(),
            UserFilter::Email(_) => users.values().find(|u| filter.matches(u)).cloned(),
        };

        Ok(found)
    }

    async fn insert_one(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar: new_user.avatar,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }
}
