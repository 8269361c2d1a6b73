//! Email delivery backends

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendReceipt};

pub mod resend;
pub mod smtp;

use resend::{ResendConfig, ResendMailer};
use smtp::{SMTPConfig, SMTPMailer};

/// Which provider delivers the email
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MailTransport {
    /// The Resend HTTP API
    #[default]
    Resend,

    /// A plain SMTP relay
    Smtp,
}

/// Mail delivery configuration
#[derive(Clone, Debug, Parser)]
pub struct MailConfig {
    /// The delivery backend
    #[arg(long, env = "MAIL_TRANSPORT", value_enum, default_value_t = MailTransport::Resend)]
    pub transport: MailTransport,

    /// The sender, either `address` or `Name <address>`
    #[arg(long = "mail-from", env = "MAIL_FROM")]
    pub sender: String,

    /// Resend settings
    #[clap(flatten)]
    pub resend: ResendConfig,

    /// SMTP settings
    #[clap(flatten)]
    pub smtp: SMTPConfig,
}

/// The mailer selected at start-up
#[derive(Debug, Clone)]
pub enum DeliveryBackend {
    /// Delivers through Resend
    Resend(ResendMailer),

    /// Delivers through SMTP
    Smtp(SMTPMailer),
}

impl DeliveryBackend {
    /// Builds the backend named by `config.transport`.
    pub fn from_config(config: &MailConfig) -> anyhow::Result<Self> {
        info!(transport = ?config.transport, "configuring mail delivery");

        Ok(match config.transport {
            MailTransport::Resend => Self::Resend(ResendMailer::new(&config.resend, &config.sender)?),
            MailTransport::Smtp => Self::Smtp(SMTPMailer::new(&config.smtp, &config.sender)?),
        })
    }
}

#[async_trait]
impl Mailer for DeliveryBackend {
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError> {
        match self {
            Self::Resend(mailer) => mailer.send_email(message).await,
            Self::Smtp(mailer) => mailer.send_email(message).await,
        }
    }
}
