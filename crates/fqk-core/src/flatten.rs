//! Flattener: nested [`Value`] → lazy sequence of `(FQK, leaf)` pairs.
//!
//! The walk is depth-first and pre-order, visiting container entries in
//! insertion order. It keeps its own stack of open containers instead of
//! recursing, so nesting depth is bounded by memory rather than by the call
//! stack, and the consumer can stop at any point.
//!
//! # Numeric-key exclusion
//!
//! With [`Config::numeric_not_flattened`](crate::Config) set, the numeric-keyed
//! entries of each container are not walked. They are emitted together, as one
//! container value, at the container's own path. Named entries are walked as
//! usual. A container with no numeric keys and at least one named key emits
//! nothing for itself.

use crate::path::push_segment;
use crate::session::Config;
use crate::types::{Container, Key, Value};

/// One open container: its prefix-less path and the entries left to visit.
struct Frame {
    path: String,
    entries: indexmap::map::IntoIter<Key, Value>,
}

/// Lazy iterator returned by [`Flattener::flatten`](crate::Flattener::flatten).
pub struct FlattenIter<'s> {
    config: &'s Config,
    stack: Vec<Frame>,
    /// Next value to visit, with its prefix-less path.
    pending: Option<(String, Value)>,
}

impl<'s> FlattenIter<'s> {
    pub(crate) fn new(value: Value, config: &'s Config) -> Self {
        FlattenIter {
            config,
            stack: Vec::new(),
            pending: Some((String::new(), value)),
        }
    }

    fn fqk(&self, path: &str) -> String {
        let mut fqk = String::with_capacity(self.config.prefix.len() + path.len());
        fqk.push_str(&self.config.prefix);
        fqk.push_str(path);
        fqk
    }

    /// Visit one value. Returns an entry when the value produces one at its
    /// own path; containers otherwise just open a frame.
    fn visit(&mut self, path: String, value: Value) -> Option<(String, Value)> {
        let container = match value {
            Value::Scalar(_) => return Some((self.fqk(&path), value)),
            Value::Container(container) => container,
        };

        if !self.config.numeric_not_flattened {
            self.open(path, container);
            return None;
        }

        let (numeric, named) = partition_numeric(container);
        let emitted = if !numeric.is_empty() || named.is_empty() {
            tracing::trace!(path = %path, entries = numeric.len(), "grouping numeric entries");
            Some((self.fqk(&path), Value::Container(numeric)))
        } else {
            None
        };
        self.open(path, named);
        emitted
    }

    fn open(&mut self, path: String, container: Container) {
        if !container.is_empty() {
            self.stack.push(Frame {
                path,
                entries: container.into_iter(),
            });
        }
    }
}

impl Iterator for FlattenIter<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, value)) = self.pending.take() {
                if let Some(entry) = self.visit(path, value) {
                    return Some(entry);
                }
                continue;
            }

            let frame = self.stack.last_mut()?;
            match frame.entries.next() {
                Some((key, value)) => {
                    let mut path = frame.path.clone();
                    push_segment(&mut path, &key, &self.config.separator);
                    self.pending = Some((path, value));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Split a container into (numeric-keyed, named) parts, each keeping the
/// relative order of its entries.
fn partition_numeric(container: Container) -> (Container, Container) {
    let mut numeric = Container::new();
    let mut named = Container::new();
    for (key, value) in container {
        if key.is_index() {
            numeric.insert(key, value);
        } else {
            named.insert(key, value);
        }
    }
    (numeric, named)
}
