//! Account workflows: login, social login, registration and password reset.
//!
//! Every function takes already-validated input (see [`crate::auth::dto`]) and
//! returns either the response payload or an [`AuthError`]. Unexpected store,
//! hashing and signing failures surface as [`AuthError::Internal`] and are
//! logged once when rendered.

use std::fmt;

use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::{Subject, TokenKind},
        dto::{Ack, AuthResponse, LoginInput, RegisterInput, ResetPasswordInput, SocialProfile},
        errors::AuthError,
        jwt::JwtKeys,
        password::{hash_password, random_password, verify_password},
        repo::StoreError,
        repo_types::{NewUser, User},
        validation::{check_password_len, present, EmailAddress},
    },
    mail::{templates, MailMessage},
    state::AppState,
};

pub const REGISTERED: &str = "User successfully registered";
pub const RESET_MAIL_SENT: &str = "We've sent an email to reset password";
pub const PASSWORD_RESET: &str = "Password has been reset";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocialProvider::Google => f.write_str("google"),
            SocialProvider::Facebook => f.write_str("facebook"),
        }
    }
}

// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_off_thread(plain: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(AuthError::from)
}

async fn verify_off_thread(plain: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(anyhow::Error::from)?
}

fn session_subject(user: &User) -> Subject {
    Subject {
        user_id: user.id,
        email: user.email.clone(),
        role: Some(user.role.clone()),
        username: Some(user.username()),
    }
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, AuthError> {
    state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token refers to unknown user");
        AuthError::NotFound
    })
}

async fn find_by_email(state: &AppState, email: &EmailAddress) -> Result<User, AuthError> {
    state.users.find_by_email(email.as_str()).await?.ok_or_else(|| {
        warn!(%email, "unknown email");
        AuthError::NotFound
    })
}

pub async fn login(state: &AppState, input: LoginInput) -> Result<AuthResponse, AuthError> {
    let user = find_by_email(state, &input.email).await?;

    if !verify_off_thread(input.password, user.password_hash.clone()).await? {
        warn!(email = %input.email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredential);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign_session(session_subject(&user))?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthResponse::new(token, &user))
}

/// Signs in with a provider-verified profile, creating the account on first use.
pub async fn social_login(
    state: &AppState,
    provider: SocialProvider,
    profile: SocialProfile,
) -> Result<AuthResponse, AuthError> {
    let user = match state.users.find_by_email(profile.email.as_str()).await? {
        Some(user) => user,
        None => create_social_user(state, provider, &profile).await?,
    };

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign_social_session(session_subject(&user))?;

    info!(user_id = %user.id, %provider, "social login");
    Ok(AuthResponse::new(token, &user))
}

async fn create_social_user(
    state: &AppState,
    provider: SocialProvider,
    profile: &SocialProfile,
) -> Result<User, AuthError> {
    let password_hash = hash_off_thread(random_password()).await?;
    let new_user = NewUser {
        email: profile.email.as_str().to_string(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        password_hash,
        role: None,
    };

    match state.users.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, %provider, "social account created");
            Ok(user)
        }
        // Lost a race with a concurrent sign-in for the same email.
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %profile.email, %provider, "concurrent social sign-up; reusing account");
            state
                .users
                .find_by_email(profile.email.as_str())
                .await?
                .ok_or_else(|| anyhow::anyhow!("user {} vanished after duplicate insert", profile.email).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register(state: &AppState, input: RegisterInput) -> Result<Ack, AuthError> {
    check_password_len(&input.password)?;

    if state.users.find_by_email(input.email.as_str()).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AuthError::Conflict);
    }

    let password_hash = hash_off_thread(input.password).await?;
    let user = state
        .users
        .create(NewUser {
            email: input.email.as_str().to_string(),
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
            role: input.role,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok(Ack {
        success: REGISTERED,
    })
}

/// Stores a fresh reset token on the account and mails a link embedding it.
/// A delivery failure leaves the stored token in place.
pub async fn request_password_reset(
    state: &AppState,
    email: EmailAddress,
) -> Result<Ack, AuthError> {
    let user = find_by_email(state, &email).await?;

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign_reset(Subject {
        user_id: user.id,
        email: user.email.clone(),
        role: None,
        username: None,
    })?;
    state.users.set_reset_token(user.id, &token).await?;

    let message = MailMessage {
        to: user.email.clone(),
        subject: templates::RESET_PASSWORD_SUBJECT.to_string(),
        html: templates::reset_password_email(&state.config.reset_link_base, &token),
    };
    state
        .mailer
        .send(message)
        .await
        .map_err(AuthError::DeliveryFailure)?;

    info!(user_id = %user.id, "password reset requested");
    Ok(Ack {
        success: RESET_MAIL_SENT,
    })
}

fn new_password(password: Option<String>) -> Result<String, AuthError> {
    let password = present(password)
        .ok_or_else(|| AuthError::validation("New password is required"))?;
    check_password_len(&password)?;
    Ok(password)
}

pub async fn confirm_password_reset(
    state: &AppState,
    input: ResetPasswordInput,
) -> Result<Ack, AuthError> {
    let keys = JwtKeys::from_ref(state);
    let ack = Ack {
        success: PASSWORD_RESET,
    };

    match input {
        ResetPasswordInput::ConfirmToken { token, password } => {
            let claims = keys.verify_kind(&token, TokenKind::Reset)?;
            let user = load_user(state, claims.subject.user_id).await?;

            if user.reset_token.as_deref() != Some(token.as_str()) {
                warn!(user_id = %user.id, "reset token does not match the stored one; ignoring");
                return Ok(ack);
            }

            let password = new_password(password)?;
            let hash = hash_off_thread(password).await?;
            state.users.update_password(user.id, &hash, true).await?;
            info!(user_id = %user.id, "password reset by emailed token");
        }
        ResetPasswordInput::Bearer {
            token,
            password_current,
            password,
        } => {
            let claims = keys.verify_kind(&token, TokenKind::Session)?;
            let user = load_user(state, claims.subject.user_id).await?;

            let current = present(password_current)
                .ok_or_else(|| AuthError::validation("Current password is required"))?;
            if !verify_off_thread(current, user.password_hash.clone()).await? {
                warn!(user_id = %user.id, "current password mismatch; ignoring");
                return Ok(ack);
            }

            let password = new_password(password)?;
            let hash = hash_off_thread(password).await?;
            state.users.update_password(user.id, &hash, false).await?;
            info!(user_id = %user.id, "password changed by signed-in user");
        }
    }

    Ok(ack)
}
