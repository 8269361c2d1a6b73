//! SMTP mailer implementation

use anyhow::Context;
use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendReceipt};

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[arg(long, env = "SMTP_HOST", default_value = "localhost")]
    pub smtp_host: String,

    /// The SMTP port
    #[arg(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// The SMTP username, empty for an unauthenticated relay
    #[arg(long, env = "SMTP_USER", default_value = "")]
    pub smtp_username: String,

    /// The SMTP password
    #[arg(long, env = "SMTP_PASSWORD", default_value = "")]
    pub smtp_password: String,

    /// Verify the TLS certificate
    #[arg(long, env = "SMTP_VERIFY_TLS", default_value = "true", action = ArgAction::Set)]
    pub smtp_verify_tls: bool,

    /// Upgrade the connection with STARTTLS instead of connecting over TLS
    #[arg(long, env = "SMTP_STARTTLS", default_value = "true", action = ArgAction::Set)]
    pub smtp_starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SMTPMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SMTPMailer {
    /// Creates an SMTP mailer sending as `sender`.
    pub fn new(config: &SMTPConfig, sender: &str) -> anyhow::Result<Self> {
        let sender: Mailbox = sender
            .parse()
            .with_context(|| format!("invalid sender address \"{sender}\""))?;

        let parameters = TlsParameters::builder(config.smtp_host.clone())
            .dangerous_accept_invalid_certs(!config.smtp_verify_tls)
            .build()
            .context("failed to build TLS parameters")?;

        let tls = if config.smtp_starttls {
            Tls::Required(parameters)
        } else {
            Tls::Wrapper(parameters)
        };

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .tls(tls);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    /// Builds the multipart email; the generated Message-ID doubles as the receipt.
    fn compose(&self, message: &Message) -> Result<(Email, SendReceipt), MailerError> {
        let id = Uuid::now_v7().to_string();
        let domain = self.sender.email.domain();

        let to: Mailbox = message
            .to
            .as_str()
            .parse()
            .map_err(|_| MailerError::InvalidEmail)?;

        let email = Email::builder()
            .message_id(Some(format!("<{id}@{domain}>")))
            .from(self.sender.clone())
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.plain_body.clone(),
                message.html_body.clone(),
            ))
            .context("failed to build email")?;

        Ok((email, SendReceipt { id }))
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError> {
        let (email, receipt) = self.compose(message)?;

        self.transport
            .send(email)
            .await
            .context("SMTP delivery failed")?;

        debug!(id = %receipt.id, "SMTP relay accepted the email");

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::email_address::EmailAddress;

    use super::*;

    fn config() -> SMTPConfig {
        SMTPConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_verify_tls: true,
            smtp_starttls: true,
        }
    }

    #[tokio::test]
    async fn test_compose() -> TestResult {
        let mailer = SMTPMailer::new(&config(), "Carol <reminder@carol-levtchenko.com>")?;

        let (email, receipt) = mailer.compose(&Message {
            to: EmailAddress::new("a@b.com")?,
            subject: "Olá".to_string(),
            html_body: "<p>Hi</p>".to_string(),
            plain_body: "Hi".to_string(),
        })?;

        let formatted = String::from_utf8(email.formatted())?;

        assert!(formatted.contains(&format!("<{}@carol-levtchenko.com>", receipt.id)));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("<p>Hi</p>"));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_sender() {
        assert!(SMTPMailer::new(&config(), "not a mailbox").is_err());
    }
}
