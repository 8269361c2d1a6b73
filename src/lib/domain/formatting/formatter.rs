//! Message formatter

use askama::Template;
use chrono::{DateTime, Utc};
use css_inline::InlineError;
use thiserror::Error;

use crate::domain::reminders::{
    emails::{
        conversation_summary::{fill_template, ConversationSummaryValues},
        direct_message::DirectMessageTemplate,
    },
    ConversationSummary, DirectMessage,
};

use super::{
    anchors::{extract_anchors, restore_anchors},
    conversation::{split_turns, Role, Turn},
    html::{escape_html, SafeHtml},
    links::auto_link_urls,
    plain_text::{tidy_lines, to_plain_text},
};

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M UTC";

const TURN_STYLE: &str = "margin: 0 0 12px; padding: 12px 16px; border-radius: 12px;";
const USER_TURN_STYLE: &str = "background-color: #FFF1EC; border-left: 4px solid #F3663F;";
const ASSISTANT_TURN_STYLE: &str = "background-color: #F4F4F5; border-left: 4px solid #A1A1AA;";
const TURN_HEADER_STYLE: &str = "margin: 0 0 4px; font-size: 13px; color: #6B6B6B;";
const SUMMARY_STYLE: &str =
    "margin: 0 0 24px; padding: 16px; border-radius: 12px; background-color: #FAFAFA; border: 1px solid #E4E4E7;";

/// Errors raised while assembling an email document
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template could not be rendered
    #[error("could not render email template: {0}")]
    Template(#[from] askama::Error),

    /// The stylesheet could not be inlined
    #[error("could not inline email styles: {0}")]
    Inline(#[from] InlineError),
}

/// Display names used in conversation headers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Name shown on assistant turns
    pub assistant_name: String,

    /// Name shown on user turns when the request has none
    pub default_user_name: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            assistant_name: "Assistente".to_string(),
            default_user_name: "Você".to_string(),
        }
    }
}

/// A complete email, ready for delivery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailDocument {
    /// The HTML body
    pub html: String,

    /// The plain text alternative
    pub plain: String,
}

/// Turns raw user text into safe HTML and assembles email documents.
///
/// Pure: no I/O, no shared state.
#[derive(Clone, Debug, Default)]
pub struct MessageFormatter {
    config: FormatterConfig,
}

impl MessageFormatter {
    /// Creates a new formatter
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Runs raw text through the whole pipeline.
    ///
    /// Anchors are lifted out first, the rest is reduced to tidy plain text,
    /// escaped and autolinked, and the anchors are put back so their text is
    /// never linked twice.
    pub fn format_fragment(&self, raw: &str) -> SafeHtml {
        let (text, anchors) = extract_anchors(raw);
        let plain = tidy_lines(&to_plain_text(&text));
        let linked = auto_link_urls(&escape_html(&plain));

        restore_anchors(&linked, &anchors)
    }

    /// Reduces raw text to tidy plain text.
    pub fn plain_fragment(&self, raw: &str) -> String {
        tidy_lines(&to_plain_text(raw))
    }

    /// Renders a direct message into the fixed layout.
    pub fn assemble_direct(&self, direct: &DirectMessage) -> Result<EmailDocument, RenderError> {
        let template = DirectMessageTemplate::new(self, direct);
        let html = css_inline::inline(&template.render()?)?;

        Ok(EmailDocument {
            html,
            plain: template.render_plain(),
        })
    }

    /// Renders a conversation and its summary into the caller's template.
    pub fn assemble_conversation(
        &self,
        conversation: &ConversationSummary,
        summary: &str,
        now: DateTime<Utc>,
    ) -> EmailDocument {
        let user_name = self.user_name(conversation);
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let turns = split_turns(&conversation.raw_conversation_text);

        let values = ConversationSummaryValues {
            conversation: turns
                .iter()
                .map(|turn| self.render_turn(turn, &user_name, &timestamp))
                .collect::<Vec<_>>()
                .join("\n"),
            summary: self.render_summary(summary),
            user_name: escape_html(&user_name).to_string(),
        };

        let summary = self.plain_fragment(summary);
        let transcript = self.transcript(&turns, &user_name);

        let plain = [summary, transcript]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        EmailDocument {
            html: fill_template(&conversation.email_template, &values),
            plain,
        }
    }

    /// Plain `Name: text` rendering of a conversation, one paragraph per turn.
    pub fn plain_transcript(&self, conversation: &ConversationSummary) -> String {
        let user_name = self.user_name(conversation);

        self.transcript(&split_turns(&conversation.raw_conversation_text), &user_name)
    }

    fn transcript(&self, turns: &[Turn], user_name: &str) -> String {
        turns
            .iter()
            .map(|turn| {
                format!(
                    "{}: {}",
                    self.display_name(turn.role, user_name),
                    self.plain_fragment(&turn.text)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn user_name(&self, conversation: &ConversationSummary) -> String {
        conversation
            .user_name
            .as_deref()
            .map(|name| self.plain_fragment(name).replace('\n', " "))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.config.default_user_name.clone())
    }

    fn display_name<'a>(&'a self, role: Role, user_name: &'a str) -> &'a str {
        match role {
            Role::User => user_name,
            Role::Assistant => &self.config.assistant_name,
        }
    }

    fn render_turn(&self, turn: &Turn, user_name: &str, timestamp: &str) -> String {
        let role_style = match turn.role {
            Role::User => USER_TURN_STYLE,
            Role::Assistant => ASSISTANT_TURN_STYLE,
        };

        format!(
            r#"<div class="turn turn-{role}" style="{TURN_STYLE} {role_style}"><p style="{TURN_HEADER_STYLE}"><strong>{name}</strong> · {timestamp}</p><div style="white-space: pre-line;">{body}</div></div>"#,
            role = turn.role.as_str(),
            name = escape_html(self.display_name(turn.role, user_name)),
            body = self.format_fragment(&turn.text),
        )
    }

    fn render_summary(&self, summary: &str) -> String {
        let summary = self.format_fragment(summary);

        if summary.is_empty() {
            return String::new();
        }

        format!(
            r#"<div class="summary" style="{SUMMARY_STYLE} white-space: pre-line;">{summary}</div>"#
        )
    }
}
