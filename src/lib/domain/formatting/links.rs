//! URL normalization and autolinking

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::html::SafeHtml;

lazy_static! {
    // U+E000/U+E001 delimit anchor placeholders and always end a token.
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"(^|[\s>\x{E001}])([^\s<\x{E000}\x{E001}]+)").unwrap();
    static ref URL_REGEX: Regex = Regex::new(
        r"(?i)^(?:https?://[^\s<\x{E000}\x{E001}]+|www\.[^\s<\x{E000}\x{E001}]+|[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.[a-z]{2,}(?:[/?#:][^\s<\x{E000}\x{E001}]*)?)$"
    )
    .unwrap();
    static ref ENTITY_TAIL_REGEX: Regex = Regex::new(r"(?i)&(?:[a-z]+|#[0-9]+);$").unwrap();
}

/// Characters that close a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &[')', '.', ',', '!', '?', ';', ':'];

/// Returns `true` if `url` starts with `http://` or `https://`.
pub(crate) fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();

    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Trims `url` and gives it an `https://` scheme unless it already has an HTTP one.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();

    if url.is_empty() || has_http_scheme(url) {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Builds an anchor that opens in a new browsing context without leaking the opener or referrer.
///
/// Both arguments must already be escaped.
pub(crate) fn anchor(href: &str, text: &str) -> String {
    format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{text}</a>"#)
}

/// Wraps bare URLs in escaped text with anchors.
///
/// A candidate starts after whitespace, `>` or the start of the text and runs
/// until whitespace or `<`. Trailing sentence punctuation is kept out of the
/// link. Links without a scheme get `https://` in their `href` while the
/// visible text stays as written.
pub fn auto_link_urls(text: &SafeHtml) -> SafeHtml {
    let linked = TOKEN_REGEX.replace_all(text.as_str(), |caps: &Captures<'_>| {
        let boundary = &caps[1];
        let token = &caps[2];

        let (url, trailing) = split_trailing(token);

        if url.is_empty() || !URL_REGEX.is_match(url) {
            return caps[0].to_string();
        }

        let href = if has_http_scheme(url) {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        format!("{boundary}{}{trailing}", anchor(&href, url))
    });

    SafeHtml::from_trusted(linked.into_owned())
}

/// Splits trailing sentence punctuation off `token`, keeping the `;` of an escaped entity.
fn split_trailing(token: &str) -> (&str, &str) {
    let mut end = token.len();

    while let Some(c) = token[..end].chars().next_back() {
        if !TRAILING_PUNCTUATION.contains(&c) || (c == ';' && ENTITY_TAIL_REGEX.is_match(&token[..end])) {
            break;
        }

        end -= c.len_utf8();
    }

    token.split_at(end)
}
