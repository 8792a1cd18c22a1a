//! Unflattener: flat `(FQK, value)` pairs → lazy nested merge nodes.
//!
//! Each input entry turns into exactly one chain of nodes, one per path
//! segment. Entries are never merged with each other here; two entries that
//! share a leading segment simply yield two nodes with the same key, and
//! [`materialize`](crate::merge::materialize) reconciles them.
//!
//! Splitting is progressive: only the first segment of a key is split off
//! when the entry is pulled, and the remainder is split when the nested
//! sequence is pulled in turn.

use crate::merge::Node;
use crate::path::{decode_segment, split_first, strip_prefix};
use crate::types::{Key, Value};

/// Lazy iterator returned by [`Flattener::unflatten`](crate::Flattener::unflatten).
pub struct UnflattenIter<'s, I> {
    entries: I,
    prefix: &'s str,
    separator: &'s str,
    /// Key handed to the next entry whose stripped key is empty.
    next_root_index: u64,
}

impl<'s, I> UnflattenIter<'s, I> {
    /// `separator` must be non-empty; the session checks this before
    /// building the iterator.
    pub(crate) fn new(entries: I, prefix: &'s str, separator: &'s str) -> Self {
        UnflattenIter {
            entries,
            prefix,
            separator,
            next_root_index: 0,
        }
    }
}

impl<'s, I, K> Iterator for UnflattenIter<'s, I>
where
    I: Iterator<Item = (K, Value)>,
    K: Into<String>,
{
    type Item = (Key, Node<'s>);

    fn next(&mut self) -> Option<Self::Item> {
        let (fqk, value) = self.entries.next()?;
        let fqk: String = fqk.into();
        let path = strip_prefix(&fqk, self.prefix);

        // An empty path is a root-level value: it has no key of its own and
        // takes the next free top-level index.
        if path.is_empty() {
            let key = Key::Index(self.next_root_index);
            self.next_root_index = self.next_root_index.saturating_add(1);
            return Some((key, Node::Value(value)));
        }

        let (key, node) = split_step(path, value, self.separator);
        if let Key::Index(n) = key {
            self.next_root_index = self.next_root_index.max(n.saturating_add(1));
        }
        Some((key, node))
    }
}

/// The not-yet-split remainder of one key, holding the value for its leaf.
struct PathChain<'s> {
    path: String,
    value: Option<Value>,
    separator: &'s str,
}

impl<'s> Iterator for PathChain<'s> {
    type Item = (Key, Node<'s>);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.value.take()?;
        Some(split_step(&self.path, value, self.separator))
    }
}

/// Split off the first segment of `path`. With a remainder, `value` is pushed
/// one level down into a lazy one-entry sequence; without one it is the leaf.
fn split_step<'s>(path: &str, value: Value, separator: &'s str) -> (Key, Node<'s>) {
    // The separator was validated when the iterator was built.
    let (head, rest) = split_first(path, separator).unwrap_or((path, None));
    let key = decode_segment(head);
    match rest {
        Some(rest) => {
            let chain = PathChain {
                path: rest.to_string(),
                value: Some(value),
                separator,
            };
            (key, Node::Nested(Box::new(chain)))
        }
        None => (key, Node::Value(value)),
    }
}
