//! Plain-text normalization

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BR_TAG_REGEX: Regex = Regex::new(r"(?i)<br\b[^<>]*>").unwrap();
    static ref ESCAPED_BR_REGEX: Regex = Regex::new(r"(?i)&lt;br\s*/?\s*&gt;").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<!--.*?-->|<[/!?]?[A-Za-z][^<>]*>").unwrap();
    static ref BLANK_RUN_REGEX: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Code points rendered as (or hiding) spaces that are replaced by an ordinary space.
const SPACE_LIKE: [char; 10] = [
    '\u{00A0}', // no-break space
    '\u{2007}', // figure space
    '\u{202F}', // narrow no-break space
    '\u{2009}', // thin space
    '\u{200A}', // hair space
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // zero width no-break space
];

/// Normalizes line endings to `\n` and turns `<br>` tags, literal or escaped, into newlines.
pub(crate) fn normalize_breaks(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = BR_TAG_REGEX.replace_all(&text, "\n");

    ESCAPED_BR_REGEX.replace_all(&text, "\n").into_owned()
}

/// Converts raw, possibly HTML-tainted text into plain text.
///
/// Line endings are normalized to `\n`, every `<br>` variant (including the
/// entity-escaped `&lt;br&gt;` forms) becomes a newline and all remaining tags
/// are removed.
pub fn to_plain_text(raw: &str) -> String {
    let mut text = normalize_breaks(raw);

    // Removing one tag can splice a new one together, e.g. `<<b>a>`.
    while TAG_REGEX.is_match(&text) {
        text = TAG_REGEX.replace_all(&text, "").into_owned();
    }

    text
}

/// Tidies the whitespace of plain text.
///
/// Space-like code points become ordinary spaces, every line is trimmed, runs
/// of three or more newlines collapse to a single blank line and blank lines
/// are removed from both ends. Applying it twice is the same as applying it
/// once.
pub fn tidy_lines(plain: &str) -> String {
    let spaced: String = plain
        .chars()
        .map(|c| if SPACE_LIKE.contains(&c) { ' ' } else { c })
        .collect();

    let trimmed = spaced
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_RUN_REGEX
        .replace_all(&trimmed, "\n\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_to_plain_text_normalizes_line_endings() {
        assert_eq!(to_plain_text("one\r\ntwo\rthree"), "one\ntwo\nthree");
    }

    #[test]
    fn test_to_plain_text_br_variants_are_equivalent() {
        let expected = "Hi\nthere";

        assert_eq!(to_plain_text("Hi<br/>there"), expected);
        assert_eq!(to_plain_text("Hi<BR>there"), expected);
        assert_eq!(to_plain_text("Hi<br />there"), expected);
        assert_eq!(to_plain_text("Hi&lt;br&gt;there"), expected);
        assert_eq!(to_plain_text("Hi&lt;BR /&gt;there"), expected);
    }

    #[test]
    fn test_to_plain_text_strips_tags() {
        assert_eq!(
            to_plain_text(r#"<p style="color: red">Hello <b>world</b></p><!-- note -->"#),
            "Hello world"
        );
    }

    #[test]
    fn test_to_plain_text_strips_spliced_tags() {
        assert_eq!(to_plain_text("<<b>script>alert(1)<</b>/script>"), "alert(1)");
    }

    #[test]
    fn test_to_plain_text_keeps_comparisons() {
        assert_eq!(to_plain_text("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_to_plain_text_empty_input() {
        assert_eq!(to_plain_text(""), "");
    }

    #[test]
    fn test_tidy_lines_replaces_space_like_characters() {
        assert_eq!(tidy_lines("a\u{00A0}b\u{200B}c\u{202F}d"), "a b c d");
    }

    #[test]
    fn test_tidy_lines_trims_each_line() {
        assert_eq!(tidy_lines("  one  \n\ttwo\u{00A0}\n"), "one\ntwo");
    }

    #[test]
    fn test_tidy_lines_collapses_blank_runs() {
        assert_eq!(tidy_lines("one\n\n\n\n\ntwo\n\nthree"), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_tidy_lines_collapses_whitespace_only_lines() {
        assert_eq!(tidy_lines("one\n \n\u{200B}\n  \ntwo"), "one\n\ntwo");
    }

    #[test]
    fn test_tidy_lines_trims_blank_edges() {
        assert_eq!(tidy_lines("\n\n  \nbody\n\n \n"), "body");
    }

    proptest! {
        #[test]
        fn tidy_lines_is_idempotent(text in r"(?s).{0,64}") {
            let once = tidy_lines(&text);
            prop_assert_eq!(tidy_lines(&once), once);
        }

        #[test]
        fn tidy_lines_is_idempotent_on_sparse_text(
            text in r"[ a\n\u{00A0}\u{200B}\t]{0,40}",
        ) {
            let once = tidy_lines(&text);
            prop_assert_eq!(tidy_lines(&once), once);
        }

        #[test]
        fn to_plain_text_leaves_no_tags(text in r"[<>/a-z =\x22]{0,48}") {
            let plain = to_plain_text(&text);
            prop_assert!(!TAG_REGEX.is_match(&plain));
        }
    }
}
