//! Eager, non-merging inflate of flat entries into a nested container.
//!
//! Unlike [`materialize`](crate::merge::materialize), repeated keys never
//! accumulate here. Intermediate segments always end up as containers (a
//! scalar in the way is replaced), and a leaf is only written while its slot
//! is still vacant: absent, null, or an empty container.

use crate::error::{FqkError, Result};
use crate::path::decode_segment;
use crate::types::{Container, Key, Scalar, Value};

/// Inflate `entries` by splitting every key on `separator`. Keys are used
/// as-is; no prefix is stripped.
///
/// ```
/// use fqk_core::expand::expand;
/// use fqk_core::Value;
///
/// let entries = vec![("a.b", Value::from(1)), ("a.b", Value::from(2))];
/// let nested = expand(entries, ".").unwrap();
/// assert_eq!(nested.to_json(), serde_json::json!({"a": {"b": 1}}));
/// ```
///
/// # Errors
///
/// Returns [`FqkError::EmptySeparator`] for an empty separator.
pub fn expand<I, K>(entries: I, separator: &str) -> Result<Container>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    if separator.is_empty() {
        return Err(FqkError::EmptySeparator);
    }

    let mut root = Container::new();
    for (fqk, value) in entries {
        let fqk: String = fqk.into();
        let mut segments: Vec<Key> = fqk.split(separator).map(decode_segment).collect();
        let Some(leaf) = segments.pop() else {
            continue;
        };

        write_leaf(&mut root, &segments, leaf, value);
    }
    Ok(root)
}

/// Walk `path` below `parent`, creating containers (or replacing a scalar in
/// the way), then write `value` at `leaf` if that slot is vacant.
fn write_leaf(parent: &mut Container, path: &[Key], leaf: Key, value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        if is_vacant(parent.get(&leaf)) {
            parent.insert(leaf, value);
        }
        return;
    };

    if let Some(Value::Container(child)) = parent.get_mut(segment) {
        return write_leaf(child, rest, leaf, value);
    }
    let mut child = Container::new();
    write_leaf(&mut child, rest, leaf, value);
    parent.insert(segment.clone(), child);
}

fn is_vacant(slot: Option<&Value>) -> bool {
    match slot {
        None | Some(Value::Scalar(Scalar::Null)) => true,
        Some(Value::Container(c)) => c.is_empty(),
        Some(Value::Scalar(_)) => false,
    }
}
