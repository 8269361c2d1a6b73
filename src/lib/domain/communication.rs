//! Outgoing email

pub mod email_address;
pub mod mailer;
