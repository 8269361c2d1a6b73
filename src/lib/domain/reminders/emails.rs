//! Email templates

pub mod conversation_summary;
pub mod direct_message;
