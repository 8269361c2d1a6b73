//! Conversation transcripts

use lazy_static::lazy_static;
use regex::Regex;

use super::plain_text::{normalize_breaks, tidy_lines, to_plain_text};

lazy_static! {
    static ref ROLE_PREFIX_REGEX: Regex =
        Regex::new(r"(?i)^\s*(?:<[^<>]*>\s*)*\[?\s*(user|assistant)\s*\]?\s*:").unwrap();
}

/// Who spoke a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The visitor
    User,

    /// The assistant
    Assistant,
}

impl Role {
    /// Lower-case name used in CSS classes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation, still raw text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// The speaker
    pub role: Role,

    /// What was said, without the role prefix
    pub text: String,
}

/// Splits a transcript into turns.
///
/// A line starting with `User:` or `Assistant:` (case-insensitive, optionally
/// bracketed as `[User]:`) opens a new turn. Other lines continue the current
/// turn; lines before the first prefix belong to the assistant. Turns with no
/// visible text are dropped.
pub fn split_turns(transcript: &str) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();

    for line in normalize_breaks(transcript).split('\n') {
        if let Some(caps) = ROLE_PREFIX_REGEX.captures(line) {
            let role = if caps[1].eq_ignore_ascii_case("user") {
                Role::User
            } else {
                Role::Assistant
            };

            turns.push(Turn {
                role,
                text: line[caps[0].len()..].to_string(),
            });

            continue;
        }

        match turns.last_mut() {
            Some(turn) => {
                turn.text.push('\n');
                turn.text.push_str(line);
            }
            None => turns.push(Turn {
                role: Role::Assistant,
                text: line.to_string(),
            }),
        }
    }

    turns.retain(|turn| !tidy_lines(&to_plain_text(&turn.text)).is_empty());
    turns
}
