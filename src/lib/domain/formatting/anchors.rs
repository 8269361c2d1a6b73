//! Extraction and restoration of anchors found in source HTML

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{
    html::{escape_html, unescape_basic, SafeHtml},
    links::{anchor, has_http_scheme, normalize_url},
    plain_text::{tidy_lines, to_plain_text},
};

const PLACEHOLDER_START: char = '\u{E000}';
const PLACEHOLDER_END: char = '\u{E001}';

lazy_static! {
    static ref ANCHOR_REGEX: Regex = Regex::new(
        r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))[^>]*>(.*?)</a\s*>"#
    )
    .unwrap();
    static ref PLACEHOLDER_REGEX: Regex = Regex::new("\u{E000}(\\d+)\u{E001}").unwrap();
    static ref SCHEME_REGEX: Regex = Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*:(?:[^0-9]|$)").unwrap();
}

/// Anchors lifted out of a text, in placeholder order.
#[derive(Debug, Default)]
pub(crate) struct ExtractedAnchors(Vec<String>);

/// Replaces every anchor in `raw` with a placeholder.
///
/// Each anchor is rebuilt from its `href` and plain inner text only, so
/// attributes from the source never survive. Anchors whose `href` uses a scheme
/// other than HTTP(S) are reduced to their escaped text.
pub(crate) fn extract_anchors(raw: &str) -> (String, ExtractedAnchors) {
    let raw: String = raw
        .chars()
        .filter(|c| *c != PLACEHOLDER_START && *c != PLACEHOLDER_END)
        .collect();

    let mut anchors = Vec::new();

    let replaced = ANCHOR_REGEX.replace_all(&raw, |caps: &Captures<'_>| {
        let href = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());

        let text = tidy_lines(&unescape_basic(&to_plain_text(&caps[4]))).replace('\n', " ");

        let html = match linkable_href(href) {
            Some(href) => {
                let visible: &str = if text.is_empty() { &href } else { &text };
                anchor(escape_html(&href).as_str(), escape_html(visible).as_str())
            }
            None => escape_html(&text).to_string(),
        };

        anchors.push(html);

        format!("{PLACEHOLDER_START}{}{PLACEHOLDER_END}", anchors.len() - 1)
    });

    (replaced.into_owned(), ExtractedAnchors(anchors))
}

/// Puts the extracted anchors back in place of their placeholders.
pub(crate) fn restore_anchors(html: &SafeHtml, anchors: &ExtractedAnchors) -> SafeHtml {
    if anchors.0.is_empty() {
        return html.clone();
    }

    let restored = PLACEHOLDER_REGEX.replace_all(html.as_str(), |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| anchors.0.get(index))
            .cloned()
            .unwrap_or_default()
    });

    SafeHtml::from_trusted(restored.into_owned())
}

/// Returns the scheme-qualified `href`, or `None` if it must not be linked.
fn linkable_href(href: &str) -> Option<String> {
    let href: String = unescape_basic(href)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    if href.is_empty() || href.starts_with('/') || href.starts_with('#') {
        return None;
    }

    if has_http_scheme(&href) {
        return Some(href);
    }

    if SCHEME_REGEX.is_match(&href) {
        return None;
    }

    Some(normalize_url(&href))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(raw: &str) -> String {
        let (text, anchors) = extract_anchors(raw);
        restore_anchors(&escape_html(&text), &anchors).to_string()
    }

    #[test]
    fn test_extract_anchors_replaces_with_placeholders() {
        let (text, anchors) = extract_anchors(r#"See <a href="https://example.com">this</a> and <a href='b.org'>that</a>"#);

        assert_eq!(text, "See \u{E000}0\u{E001} and \u{E000}1\u{E001}");
        assert_eq!(anchors.0.len(), 2);
    }

    #[test]
    fn test_restored_anchor_drops_source_attributes() {
        assert_eq!(
            round_trip(r#"<a class="btn" style="color:red" href="https://example.com" onclick="x()">Portfolio</a>"#),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">Portfolio</a>"#
        );
    }

    #[test]
    fn test_restored_anchor_gets_scheme() {
        assert_eq!(
            round_trip(r#"<a href="example.com/cv">CV</a>"#),
            r#"<a href="https://example.com/cv" target="_blank" rel="noopener noreferrer">CV</a>"#
        );
    }

    #[test]
    fn test_restored_anchor_keeps_encoded_query() {
        assert_eq!(
            round_trip(r#"<a href="https://example.com/?a=1&amp;b=2">q</a>"#),
            r#"<a href="https://example.com/?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">q</a>"#
        );
    }

    #[test]
    fn test_javascript_anchor_is_neutralised() {
        assert_eq!(round_trip(r#"<a href="javascript:alert(1)">click</a>"#), "click");
        assert_eq!(round_trip(r#"<a href=" java	script:alert(1)">click</a>"#), "click");
        assert_eq!(round_trip(r#"<a href="mailto:a@b.com">mail</a>"#), "mail");
    }

    #[test]
    fn test_anchor_with_port_is_kept() {
        assert_eq!(
            round_trip(r#"<a href="localhost:3000">dev</a>"#),
            r#"<a href="https://localhost:3000" target="_blank" rel="noopener noreferrer">dev</a>"#
        );
    }

    #[test]
    fn test_anchor_inner_markup_is_escaped_text() {
        assert_eq!(
            round_trip(r#"<a href="https://x.dev"><b>bold</b> &amp; "q"</a>"#),
            r#"<a href="https://x.dev" target="_blank" rel="noopener noreferrer">bold &amp; &quot;q&quot;</a>"#
        );
    }

    #[test]
    fn test_empty_anchor_text_shows_href() {
        assert_eq!(
            round_trip(r#"<a href="https://x.dev"></a>"#),
            r#"<a href="https://x.dev" target="_blank" rel="noopener noreferrer">https://x.dev</a>"#
        );
    }

    #[test]
    fn test_user_supplied_placeholders_are_removed() {
        let (text, anchors) = extract_anchors("fake \u{E000}0\u{E001}");

        assert_eq!(text, "fake 0");
        assert!(anchors.0.is_empty());
    }
}
