//! Mailer errors

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The provider answered with an error status
    #[error("the email provider rejected the message ({status}): {body}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,

        /// Response body, for diagnostics
        body: String,
    },

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
