//! Mention grammar
//!
//! A mention token is `@` followed by one or more word characters
//! (letters, digits, underscore). These functions back both highlighting
//! and autocomplete; they are pure and know nothing about storage.

use crate::core_store::model::Handle;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Extract mention tokens in order of appearance, duplicates preserved.
/// Trailing punctuation is not part of the token: `"hi @bob!"` yields
/// `["@bob"]`.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '@' {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(idx, next)) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            end = idx + next.len_utf8();
            chars.next();
        }
        if end > start + c.len_utf8() {
            mentions.push(text[start..end].to_string());
        }
    }

    mentions
}

/// Case-insensitive prefix match of `@partial` against the directory,
/// preserving directory order, truncated to `limit` entries. An empty
/// partial matches every handle.
pub fn suggest_mentions(partial: &str, directory: &[Handle], limit: usize) -> Vec<Handle> {
    let query = format!("@{}", partial.to_lowercase());
    directory
        .iter()
        .filter(|handle| handle.as_str().to_lowercase().starts_with(&query))
        .take(limit)
        .cloned()
        .collect()
}

/// The partial mention token being typed at `cursor`, if any: the text
/// between the last `@` before the cursor and the cursor itself, provided
/// it contains only word characters. Drives autocomplete.
pub fn partial_mention_at(text: &str, cursor: usize) -> Option<&str> {
    let before = &text[..cursor];
    let start = trailing_token_start(before)?;
    Some(&before[start + 1..])
}

/// Accept a suggestion mid-composition: replace the trailing partial
/// mention token before `cursor` with the full handle plus a trailing
/// space, leaving everything after the cursor unchanged. Returns the new
/// text and cursor position. Without a partial token the input comes back
/// untouched.
pub fn complete_mention(text: &str, cursor: usize, handle: &Handle) -> (String, usize) {
    let before = &text[..cursor];
    let Some(start) = trailing_token_start(before) else {
        return (text.to_string(), cursor);
    };

    let replaced = format!("{}{} ", &text[..start], handle);
    let new_cursor = replaced.len();
    (format!("{}{}", replaced, &text[cursor..]), new_cursor)
}

/// Byte offset of the `@` opening the token that runs to the end of
/// `before`, if the tail is `@` plus zero or more word characters
fn trailing_token_start(before: &str) -> Option<usize> {
    for (idx, c) in before.char_indices().rev() {
        if c == '@' {
            return Some(idx);
        }
        if !is_word_char(c) {
            return None;
        }
    }
    None
}
