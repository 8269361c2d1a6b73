//! Mailer module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{Message, SendReceipt};

/// Email delivery provider
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to send, sender excluded.
    ///
    /// # Returns
    /// The provider's [`SendReceipt`], or a [`MailerError`] if the provider
    /// could not be reached or refused the message.
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError>;
    }
}
