//! Reminder emails: request models, validation errors and the sending service

pub mod emails;
mod errors;
mod models;
mod service;

pub use errors::{RequestError, SendEmailError};
pub use models::{
    filled, ConversationSummary, DirectMessage, EmailRequest, Flow, RequestMode,
};
pub use service::{ReminderConfig, ReminderService, ReminderServiceImpl};

#[cfg(test)]
pub use service::MockReminderService;
