//! Outbound email. Workflows depend on the [`Mailer`] capability only.

mod smtp;
pub mod templates;

use axum::async_trait;

pub use smtp::SmtpMailer;

/// A single HTML message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()>;
}
