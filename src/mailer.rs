// src/mailer.rs
//! Digest delivery over SMTP. Unlike every other stage, failure here is fatal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::app_log;
use crate::config::SmtpConfig;

#[async_trait]
pub trait DigestSender: Send + Sync {
    async fn send(&self, subject: &str, html: &str) -> Result<()>;
}

pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// The digest goes from the configured address to itself
    pub fn build_message(&self, subject: &str, html: &str) -> Result<Message> {
        let address = self
            .config
            .email
            .parse::<lettre::message::Mailbox>()
            .with_context(|| format!("Invalid email address: '{}'", self.config.email))?;

        Message::builder()
            .from(address.clone())
            .to(address)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .context("Failed to build email message")
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .with_context(|| format!("Failed to configure SMTP relay {}", self.config.host))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.email.clone(),
                self.config.password.clone(),
            ))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl DigestSender for SmtpMailer {
    async fn send(&self, subject: &str, html: &str) -> Result<()> {
        let result = async {
            let message = self.build_message(subject, html)?;
            self.transport()?
                .send(message)
                .await
                .context("SMTP delivery failed")?;
            Ok::<(), anyhow::Error>(())
        }
        .await;

        match &result {
            Ok(()) => app_log!(info, "Email sent to {}", self.config.email),
            Err(e) => app_log!(error, "Email failed: {:#}", e),
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message instead of sending it
    #[derive(Clone, Default)]
    pub struct RecordingSender {
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
        pub fail: bool,
    }

    #[async_trait]
    impl DigestSender for RecordingSender {
        async fn send(&self, subject: &str, html: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("535 authentication failed");
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), html.to_string()));
            Ok(())
        }
    }
}
