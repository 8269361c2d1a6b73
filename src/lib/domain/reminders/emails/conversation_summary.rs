//! Caller-supplied conversation summary template

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").unwrap();
}

/// Rendered values for the placeholders of a conversation summary template
#[derive(Debug, Default)]
pub struct ConversationSummaryValues {
    /// Rendered turn blocks, for `{{conversation}}`
    pub conversation: String,

    /// Rendered summary block, for `{{summary}}`
    pub summary: String,

    /// Escaped visitor name, for `{{user_name}}`
    pub user_name: String,
}

/// Substitutes `{{conversation}}`, `{{summary}}` and `{{user_name}}` into `template`.
///
/// Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &ConversationSummaryValues) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "conversation" => values.conversation.clone(),
            "summary" => values.summary.clone(),
            "user_name" => values.user_name.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}
