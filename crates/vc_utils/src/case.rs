//! Identifier case conversion.
//!
//! Input may already be in any common convention (`snake_case`,
//! `camelCase`, `PascalCase`, `kebab-case`). It is first split into
//! words and then re-joined in the target convention.
//!
//! Word boundaries are `_`, `-`, whitespace, a lower-to-upper transition
//! (`userName`) and the end of an upper-case run followed by a lower-case
//! letter (`HTTPServer` → `HTTP`, `Server`). Digits stick to the word
//! they follow.
//!
//! # Examples
//!
//! ```
//! use vc_utils::case;
//!
//! assert_eq!(case::to_camel("user_name"), "userName");
//! assert_eq!(case::to_snake("HTTPServer"), "http_server");
//! assert_eq!(case::to_kebab("lastLogin2"), "last-login2");
//! ```

use alloc::string::String;
use alloc::vec::Vec;

/// Splits an identifier into its words.
///
/// ```
/// assert_eq!(vc_utils::case::words("parseJSONValue"), ["parse", "JSON", "Value"]);
/// ```
pub fn words(ident: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let chars: Vec<(usize, char)> = ident.char_indices().collect();
    let mut start: Option<usize> = None;

    for (pos, &(index, ch)) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(&ident[s..index]);
            }
            continue;
        }

        let Some(s) = start else {
            start = Some(index);
            continue;
        };

        if ch.is_uppercase() && pos > 0 {
            let prev = chars[pos - 1].1;
            let next_is_lower = chars.get(pos + 1).is_some_and(|&(_, c)| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push(&ident[s..index]);
                start = Some(index);
            }
        }
    }

    if let Some(s) = start {
        out.push(&ident[s..]);
    }
    out
}

fn push_capitalized(buf: &mut String, word: &str) {
    let mut it = word.chars();
    if let Some(first) = it.next() {
        buf.extend(first.to_uppercase());
        for ch in it {
            buf.extend(ch.to_lowercase());
        }
    }
}

fn push_lower(buf: &mut String, word: &str) {
    for ch in word.chars() {
        buf.extend(ch.to_lowercase());
    }
}

fn push_upper(buf: &mut String, word: &str) {
    for ch in word.chars() {
        buf.extend(ch.to_uppercase());
    }
}

fn join(ident: &str, sep: &str, mut push: impl FnMut(&mut String, usize, &str)) -> String {
    let mut buf = String::with_capacity(ident.len() + 4);
    for (index, word) in words(ident).into_iter().enumerate() {
        if index > 0 {
            buf.push_str(sep);
        }
        push(&mut buf, index, word);
    }
    buf
}

/// `camelCase`
pub fn to_camel(ident: &str) -> String {
    join(ident, "", |buf, index, word| {
        if index == 0 {
            push_lower(buf, word);
        } else {
            push_capitalized(buf, word);
        }
    })
}

/// `PascalCase`
pub fn to_pascal(ident: &str) -> String {
    join(ident, "", |buf, _, word| push_capitalized(buf, word))
}

/// `snake_case`
pub fn to_snake(ident: &str) -> String {
    join(ident, "_", |buf, _, word| push_lower(buf, word))
}

/// `kebab-case`
pub fn to_kebab(ident: &str) -> String {
    join(ident, "-", |buf, _, word| push_lower(buf, word))
}

/// `SCREAMING_SNAKE_CASE`
pub fn to_screaming_snake(ident: &str) -> String {
    join(ident, "_", |buf, _, word| push_upper(buf, word))
}

/// `lowercase`, words joined without separator.
pub fn to_lower(ident: &str) -> String {
    join(ident, "", |buf, _, word| push_lower(buf, word))
}

/// `lower.dot.case`
pub fn to_lower_dot(ident: &str) -> String {
    join(ident, ".", |buf, _, word| push_lower(buf, word))
}
