use serde::{Deserialize, Serialize};

use crate::auth::{
    errors::AuthError,
    repo_types::User,
    validation::{present, EmailAddress},
};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for Google login. `givenName` becomes the first name and
/// `familyName` the last name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Request body for Facebook login.
#[derive(Debug, Default, Deserialize)]
pub struct FacebookLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for asking a reset email.
#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for setting a new password.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub confirm_token: Option<String>,
    #[serde(default)]
    pub password_current: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// --- validated inputs ---

#[derive(Debug)]
pub struct LoginInput {
    pub email: EmailAddress,
    pub password: String,
}

#[derive(Debug)]
pub struct SocialProfile {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub role: Option<String>,
    pub password: String,
}

/// Which reset flow a request selects.
#[derive(Debug)]
pub enum ResetPasswordInput {
    /// Token received by email.
    ConfirmToken {
        token: String,
        password: Option<String>,
    },
    /// Logged-in user changing their own password.
    Bearer {
        token: String,
        password_current: Option<String>,
        password: Option<String>,
    },
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginInput, AuthError> {
        let (Some(email), Some(password)) = (present(self.email), present(self.password)) else {
            return Err(AuthError::validation(ALL_FIELDS_REQUIRED));
        };
        Ok(LoginInput {
            email: EmailAddress::parse(&email)?,
            password,
        })
    }
}

impl GoogleLoginRequest {
    pub fn validate(self) -> Result<SocialProfile, AuthError> {
        social_profile(self.email, self.given_name, self.family_name)
    }
}

impl FacebookLoginRequest {
    pub fn validate(self) -> Result<SocialProfile, AuthError> {
        social_profile(self.email, self.first_name, self.last_name)
    }
}

fn social_profile(
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<SocialProfile, AuthError> {
    let email = present(email).ok_or_else(|| AuthError::validation("Email is required"))?;
    Ok(SocialProfile {
        email: EmailAddress::parse(&email)?,
        first_name: first_name.unwrap_or_default().trim().to_string(),
        last_name: last_name.unwrap_or_default().trim().to_string(),
    })
}

impl RegisterRequest {
    pub fn validate(self) -> Result<RegisterInput, AuthError> {
        let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
            present(self.first_name),
            present(self.last_name),
            present(self.email),
            present(self.password),
        ) else {
            return Err(AuthError::validation(ALL_FIELDS_REQUIRED));
        };
        Ok(RegisterInput {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: EmailAddress::parse(&email)?,
            role: present(self.role).map(|r| r.trim().to_string()),
            password,
        })
    }
}

impl ForgotPasswordRequest {
    pub fn validate(self) -> Result<EmailAddress, AuthError> {
        EmailAddress::parse(self.email.as_deref().unwrap_or_default())
    }
}

impl ResetPasswordRequest {
    /// `bearer` is the token carried by the Authorization header, if any.
    pub fn validate(self, bearer: Option<String>) -> Result<ResetPasswordInput, AuthError> {
        if let Some(token) = self.confirm_token {
            return Ok(ResetPasswordInput::ConfirmToken {
                token,
                password: self.password,
            });
        }
        match bearer {
            Some(token) => Ok(ResetPasswordInput::Bearer {
                token,
                password_current: self.password_current,
                password: self.password,
            }),
            None => Err(AuthError::Unauthorized),
        }
    }
}

// --- responses ---

/// Response returned after login or social login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(rename = "_token")]
    pub raw_token: String,
    pub token: String,
    pub user: PublicUser,
}

impl AuthResponse {
    pub fn new(raw_token: String, user: &User) -> Self {
        Self {
            success: true,
            token: format!("Bearer {raw_token}"),
            raw_token,
            user: PublicUser::from(user),
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Acknowledgment without payload.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: &'static str,
}
