//! Reminder errors

use thiserror::Error;
use tracing::debug;

use crate::domain::{
    communication::{email_address::EmailAddressError, mailer::MailerError},
    formatting::RenderError,
    summaries::SummarizerError,
};

/// The request body does not describe a sendable email
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Required fields are absent or blank
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The recipient address is malformed
    #[error(transparent)]
    InvalidEmailAddress(#[from] EmailAddressError),
}

/// Errors that can occur while producing or delivering an email
#[derive(Debug, Error)]
pub enum SendEmailError {
    /// The document could not be assembled
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The conversation could not be summarised
    #[error("could not summarise the conversation: {0}")]
    Summary(SummarizerError),

    /// The provider did not accept the email
    #[error("could not deliver the email: {0}")]
    Delivery(MailerError),
}

impl From<SummarizerError> for SendEmailError {
    fn from(err: SummarizerError) -> Self {
        debug!("SummarizerError -> SendEmailError");

        SendEmailError::Summary(err)
    }
}

impl From<MailerError> for SendEmailError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> SendEmailError");

        SendEmailError::Delivery(err)
    }
}
