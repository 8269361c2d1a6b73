//! Email request models

use serde::{Deserialize, Serialize};

use crate::domain::communication::email_address::EmailAddress;

/// Which kind of email a request produced, echoed back to the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flow {
    /// A direct message with a link
    OriginalLink,

    /// A summarised conversation
    ConversationSummary,
}

/// Explicit request shape selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Message, link and signature
    Direct,

    /// Conversation transcript rendered into a caller template
    ConversationSummary,
}

/// A direct message with a link
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectMessage {
    /// The recipient
    pub to: EmailAddress,

    /// The message body, raw user text
    pub message: String,

    /// The link, with or without a scheme
    pub link: String,

    /// Caption shown above the link
    pub link_label: String,

    /// Visible text of the link, defaults to the link itself
    pub display_link: Option<String>,

    /// The signature, raw user text
    pub signature: String,
}

/// A conversation to summarise into a caller-supplied template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSummary {
    /// The recipient
    pub to: EmailAddress,

    /// HTML template with `{{conversation}}`, `{{summary}}` and `{{user_name}}` placeholders
    pub email_template: String,

    /// The transcript, turns prefixed with `User:` or `Assistant:`
    pub raw_conversation_text: String,

    /// Display name of the visitor
    pub user_name: Option<String>,
}

/// A validated request to send an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailRequest {
    /// See [`DirectMessage`]
    Direct(DirectMessage),

    /// See [`ConversationSummary`]
    ConversationSummary(ConversationSummary),
}

impl EmailRequest {
    /// The flow this request is processed with
    pub fn flow(&self) -> Flow {
        match self {
            Self::Direct(_) => Flow::OriginalLink,
            Self::ConversationSummary(_) => Flow::ConversationSummary,
        }
    }

    /// The recipient of the email
    pub fn recipient(&self) -> &EmailAddress {
        match self {
            Self::Direct(direct) => &direct.to,
            Self::ConversationSummary(conversation) => &conversation.to,
        }
    }
}

/// Returns the value if it holds anything besides whitespace.
pub fn filled(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
