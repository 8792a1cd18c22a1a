//! Path codec: building fully-qualified keys (FQKs) and taking them apart.
//!
//! An FQK is the session prefix followed by the path segments joined with the
//! separator. The prefix touches the first segment directly:
//!
//! ```
//! use fqk_core::path::join;
//! use fqk_core::Key;
//!
//! let fqk = join("ns", &[Key::from("a"), Key::Index(0)], ".");
//! assert_eq!(fqk, "nsa.0");
//! ```

use crate::error::{FqkError, Result};
use crate::types::Key;
use std::fmt::Write;

/// Join `segments` with `separator` and prepend `prefix` without a separator.
pub fn join(prefix: &str, segments: &[Key], separator: &str) -> String {
    let mut path = String::new();
    for segment in segments {
        push_segment(&mut path, segment, separator);
    }
    let mut fqk = String::with_capacity(prefix.len() + path.len());
    fqk.push_str(prefix);
    fqk.push_str(&path);
    fqk
}

/// Append one segment to a prefix-less path. The separator is only emitted
/// when the path already has content.
pub(crate) fn push_segment(path: &mut String, segment: &Key, separator: &str) {
    if !path.is_empty() {
        path.push_str(separator);
    }
    match segment {
        Key::Index(n) => {
            // Writing into a String cannot fail.
            let _ = write!(path, "{n}");
        }
        Key::Name(s) => path.push_str(s),
    }
}

/// Remove `prefix` from the front of `fqk`. Keys that do not carry the prefix
/// are returned unchanged rather than rejected.
pub fn strip_prefix<'a>(fqk: &'a str, prefix: &str) -> &'a str {
    fqk.strip_prefix(prefix).unwrap_or(fqk)
}

/// Split on the first occurrence of `separator`.
///
/// Returns `(head, None)` when the separator does not occur. An empty
/// separator cannot split anything and is rejected.
pub fn split_first<'a>(text: &'a str, separator: &str) -> Result<(&'a str, Option<&'a str>)> {
    if separator.is_empty() {
        return Err(FqkError::EmptySeparator);
    }
    Ok(match text.split_once(separator) {
        Some((head, rest)) => (head, Some(rest)),
        None => (text, None),
    })
}

/// Decode a path segment into a key.
///
/// Canonical non-negative decimals (`"0"`, `"42"`, no sign, no leading zeros,
/// below `u64::MAX`) become [`Key::Index`]; everything else is a
/// [`Key::Name`]. `u64::MAX` itself stays a name so a following index always
/// exists.
pub fn decode_segment(segment: &str) -> Key {
    let canonical = match segment.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    };
    if canonical {
        if let Ok(n @ 0..u64::MAX) = segment.parse::<u64>() {
            return Key::Index(n);
        }
    }
    Key::Name(segment.to_string())
}
