use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role assigned by the store when the creator does not supply one.
pub const DEFAULT_ROLE: &str = "saler";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                        // unique user ID
    pub email: String,                   // normalized email
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,           // Argon2 hash, not exposed in JSON
    pub role: String,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,     // pending password-reset token
    pub created_at: OffsetDateTime,      // creation timestamp
}

impl User {
    /// Display name carried in token claims.
    pub fn username(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Option<String>,
}
