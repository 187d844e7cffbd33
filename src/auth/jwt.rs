use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    auth::{
        claims::{Claims, Subject, TokenKind},
        errors::AuthError,
    },
    config::JwtConfig,
    state::AppState,
};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub reset_ttl: Duration,
    pub session_ttl: Duration,
    pub social_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            reset_ttl_secs,
            session_ttl_secs,
            social_ttl_secs,
        } = cfg.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            reset_ttl: Duration::from_secs(reset_ttl_secs.max(0) as u64),
            session_ttl: Duration::from_secs(session_ttl_secs.max(0) as u64),
            social_ttl: Duration::from_secs(social_ttl_secs.max(0) as u64),
        }
    }

    fn sign_at(
        &self,
        subject: Subject,
        kind: TokenKind,
        ttl: Duration,
        now: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let user_id = subject.user_id;
        let claims = Claims {
            subject,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, kind = ?kind, ttl_secs = ttl.as_secs(), "jwt signed");
        Ok(token)
    }

    pub fn sign(&self, subject: Subject, kind: TokenKind, ttl: Duration) -> anyhow::Result<String> {
        self.sign_at(subject, kind, ttl, OffsetDateTime::now_utc())
    }

    /// Token for email/password login.
    pub fn sign_session(&self, subject: Subject) -> anyhow::Result<String> {
        self.sign(subject, TokenKind::Session, self.session_ttl)
    }

    /// Token for Google/Facebook login.
    pub fn sign_social_session(&self, subject: Subject) -> anyhow::Result<String> {
        self.sign(subject, TokenKind::Session, self.social_ttl)
    }

    pub fn sign_reset(&self, subject: Subject) -> anyhow::Result<String> {
        self.sign(subject, TokenKind::Reset, self.reset_ttl)
    }

    /// Checks signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            warn!(error = %e, "jwt rejected");
            AuthError::InvalidToken
        })?;
        debug!(user_id = %data.claims.subject.user_id, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            warn!(expected = ?kind, actual = ?claims.kind, "jwt of wrong kind");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
pub(crate) fn expired_token(keys: &JwtKeys, subject: Subject, kind: TokenKind) -> String {
    let two_hours_ago = OffsetDateTime::now_utc() - TimeDuration::hours(2);
    keys.sign_at(subject, kind, Duration::from_secs(60 * 60), two_hours_ago)
        .expect("sign expired token")
}
