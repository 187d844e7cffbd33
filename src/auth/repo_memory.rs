//! In-process `UserStore` used by the test-suite.

use std::collections::HashMap;

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::{StoreError, UserStore};
use crate::auth::repo_types::{NewUser, User, DEFAULT_ROLE};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            role: new_user.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            reset_token: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_reset_token(&self, id: Uuid, token: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::Missing(id))?;
        user.reset_token = Some(token.to_string());
        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        clear_reset_token: bool,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::Missing(id))?;
        user.password_hash = password_hash.to_string();
        if clear_reset_token {
            user.reset_token = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password_hash: "$argon2id$placeholder".into(),
            role: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_default_role_and_rejects_duplicates() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.role, DEFAULT_ROLE);

        let err = store.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_password_optionally_clears_reset_token() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ada@example.com")).await.unwrap();
        store.set_reset_token(user.id, "tok").await.unwrap();

        store.update_password(user.id, "h1", false).await.unwrap();
        let u = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(u.reset_token.as_deref(), Some("tok"));

        store.update_password(user.id, "h2", true).await.unwrap();
        let u = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(u.password_hash, "h2");
        assert!(u.reset_token.is_none());
    }

    #[tokio::test]
    async fn mutations_on_unknown_id_fail() {
        let store = MemoryUserStore::new();
        let err = store.set_reset_token(Uuid::new_v4(), "t").await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));
    }
}
