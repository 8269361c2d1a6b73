//! Text-to-safe-HTML formatting

mod anchors;
mod conversation;
mod formatter;
mod html;
mod links;
mod plain_text;

pub use conversation::{split_turns, Role, Turn};
pub use formatter::{EmailDocument, FormatterConfig, MessageFormatter, RenderError};
pub use html::{escape_html, SafeHtml};
pub use links::{auto_link_urls, normalize_url};
pub use plain_text::{tidy_lines, to_plain_text};
