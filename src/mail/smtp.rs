use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox}, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{MailMessage, Mailer};
use crate::config::MailConfig;

/// Delivers through an authenticated SMTP relay over implicit TLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .with_context(|| format!("smtp relay {}", cfg.smtp_host))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(Duration::from_secs(10)))
            .build();
        Ok(Self {
            transport,
            from: cfg.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.parse::<Mailbox>().context("invalid from address")?)
            .to(message.to.parse::<Mailbox>().context("invalid to address")?)
            .subject(message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html)
            .context("build email")?;

        self.transport.send(email).await.context("smtp send")?;
        info!(to = %message.to, "email sent");
        Ok(())
    }
}
