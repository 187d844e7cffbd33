use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of password-reset tokens.
    pub reset_ttl_secs: i64,
    /// Lifetime of tokens issued by email/password login.
    pub session_ttl_secs: i64,
    /// Lifetime of tokens issued by Google/Facebook login.
    pub social_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    /// Frontend origin that reset links point to.
    pub reset_link_base: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
        };
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "useraccounts".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "useraccounts-users".into()),
            reset_ttl_secs: env_or("JWT_RESET_TTL_SECS", 60 * 60),
            session_ttl_secs: env_or("JWT_SESSION_TTL_SECS", 60 * 60 * 24 * 30),
            social_ttl_secs: env_or("JWT_SOCIAL_TTL_SECS", 31_556_926),
        };
        let username = std::env::var("FROM_EMAIL")?;
        let mail = MailConfig {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            smtp_port: env_or("SMTP_PORT", 465),
            password: std::env::var("FROM_EMAIL_PASSWORD")?,
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| username.clone()),
            username,
        };
        let reset_link_base = std::env::var("RESET_LINK_BASE")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            server,
            database_url,
            jwt,
            mail,
            reset_link_base,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_unparsable_values() {
        assert_eq!(env_or("USERACCOUNTS_TEST_UNSET_KEY", 42_i64), 42);
        std::env::set_var("USERACCOUNTS_TEST_BAD_PORT", "not-a-port");
        assert_eq!(env_or("USERACCOUNTS_TEST_BAD_PORT", 465_u16), 465);
        std::env::set_var("USERACCOUNTS_TEST_GOOD_PORT", "587");
        assert_eq!(env_or("USERACCOUNTS_TEST_GOOD_PORT", 465_u16), 587);
    }

    #[test]
    fn listen_address_parses_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9090,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:9090");

        let bad = ServerConfig {
            host: "not a host".into(),
            port: 9090,
        };
        assert!(bad.socket_addr().is_err());
    }
}
