//! Direct message template

use askama::Template;

use crate::domain::{
    formatting::{escape_html, normalize_url, MessageFormatter, SafeHtml},
    reminders::DirectMessage,
};

/// Direct message email template
///
/// Every field holds escaped HTML, so the template marks them `safe`.
#[derive(Debug, Template)]
#[template(path = "emails/direct_message.html")]
pub struct DirectMessageTemplate {
    /// The formatted message body
    pub message: SafeHtml,

    /// Caption above the link
    pub link_label: SafeHtml,

    /// Scheme-qualified link target
    pub link_href: SafeHtml,

    /// Visible link text
    pub link_text: SafeHtml,

    /// The formatted signature
    pub signature: SafeHtml,

    plain: String,
}

impl DirectMessageTemplate {
    /// Creates a new `DirectMessageTemplate`
    pub fn new(formatter: &MessageFormatter, direct: &DirectMessage) -> Self {
        let href = normalize_url(&direct.link);
        let label = formatter.plain_fragment(&direct.link_label);

        let link_text = direct
            .display_link
            .as_deref()
            .map(|text| formatter.plain_fragment(text))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| direct.link.trim().to_string());

        let plain = format!(
            "{message}\n\n{label}: {href}\n\n{signature}",
            message = formatter.plain_fragment(&direct.message),
            signature = formatter.plain_fragment(&direct.signature),
        );

        Self {
            message: formatter.format_fragment(&direct.message),
            link_label: escape_html(&label),
            link_href: escape_html(&href),
            link_text: escape_html(&link_text),
            signature: formatter.format_fragment(&direct.signature),
            plain,
        }
    }

    /// Renders the plain text version of the email
    pub fn render_plain(&self) -> String {
        self.plain.clone()
    }
}
