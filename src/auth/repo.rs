use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, DEFAULT_ROLE};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user {0} not found")]
    Missing(Uuid),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence of user records. Email uniqueness is enforced by the store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Insert a user; fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn set_reset_token(&self, id: Uuid, token: &str) -> Result<(), StoreError>;
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        clear_reset_token: bool,
    ) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, role, reset_token, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{DEFAULT_ROLE}'))
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_deref())
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_reset_token(&self, id: Uuid, token: &str) -> Result<(), StoreError> {
        let done = sqlx::query("UPDATE users SET reset_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        clear_reset_token: bool,
    ) -> Result<(), StoreError> {
        let done = sqlx::query(
            r#"
            UPDATE users
               SET password_hash = $2,
                   reset_token = CASE WHEN $3 THEN NULL ELSE reset_token END
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(clear_reset_token)
        .execute(&self.db)
        .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }
}
