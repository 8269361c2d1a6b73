//! HTML escaping

use std::fmt;

/// A fragment of HTML that is safe to embed verbatim in a document.
///
/// The only markup it can contain is anchors generated by the formatter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Wraps markup produced inside the formatter.
    pub(crate) fn from_trusted(html: String) -> Self {
        Self(html)
    }

    /// Returns the fragment as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the fragment is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SafeHtml> for String {
    fn from(html: SafeHtml) -> Self {
        html.0
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
///
/// Must run after tag stripping, never before it.
pub fn escape_html(text: &str) -> SafeHtml {
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    SafeHtml(out)
}

/// Decodes the entities [`escape_html`] produces, for attribute values lifted from source HTML.
pub(crate) fn unescape_basic(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#).as_str(),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_html_escapes_existing_entities_once() {
        assert_eq!(escape_html("&amp;").as_str(), "&amp;amp;");
    }

    #[test]
    fn test_unescape_basic_round_trips_escaped_text() {
        let text = r#"a&b <c> "d" 'e' &amp;"#;

        assert_eq!(unescape_basic(escape_html(text).as_str()), text);
    }

    proptest! {
        #[test]
        fn escaped_output_has_no_raw_special_characters(text in r#"[a-z&<>"' ;#]{0,64}"#) {
            let escaped = escape_html(&text);

            prop_assert!(!escaped.as_str().contains(['<', '>', '"', '\'']));

            for (index, _) in escaped.as_str().match_indices('&') {
                let rest = &escaped.as_str()[index..];
                prop_assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
                        .iter()
                        .any(|entity| rest.starts_with(entity))
                );
            }
        }
    }
}
