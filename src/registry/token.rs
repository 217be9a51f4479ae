//! Identifier token embedded in display messages.
//!
//! The token is a textual sentinel, `[e#<id>] `, prepended to a record's
//! message so the record can be recovered later from nothing but plain text.
//! It is owned by the registry; every other component treats it as opaque.
//!
//! Recovering structured data from free text is inherently fragile. The
//! token scheme is a deliberate, minimal-surface shim for boundaries that
//! only preserve a message string; callers that can pass an
//! [`ErrorRecord`](crate::ErrorRecord) directly should do so and fall back
//! to the token only at such boundaries.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) const TOKEN_PREFIX: &str = "[e#";
pub(crate) const TOKEN_SUFFIX: &str = "] ";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[e#(\d+)\] ").expect("token pattern is a valid regex"));

/// Builds a display message: token followed by the raw message.
pub(crate) fn embed(id: usize, message: &str) -> String {
    format!("{TOKEN_PREFIX}{id}{TOKEN_SUFFIX}{message}")
}

/// Extracts the record id from the first token in `text`, if any.
///
/// Ids too large to represent are treated as "no token found".
pub(crate) fn first_id(text: &str) -> Option<usize> {
    let captures = TOKEN_PATTERN.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Removes the first token from `text`. Idempotent on token-free text.
pub(crate) fn strip(text: &str) -> String {
    TOKEN_PATTERN.replacen(text, 1, "").into_owned()
}
