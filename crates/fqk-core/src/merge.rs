//! Merger: materialize a lazy, possibly key-duplicated nested sequence.
//!
//! The input is any iterator of `(Key, Node)` pairs, where a [`Node`] is
//! either a finished [`Value`] or another such iterator. Sibling pairs may
//! repeat a key; repeats accumulate instead of overwriting:
//!
//! - the first value for a key is stored as-is;
//! - on a repeat, the stored value becomes a list (`{0: prior}`) unless it
//!   already is a container;
//! - an incoming scalar is appended at the next free index;
//! - an incoming container is merged key by key, applying the same two rules
//!   to every sub-key both sides share.
//!
//! ```
//! use fqk_core::merge::{materialize, Node};
//! use fqk_core::{Key, Value};
//!
//! let nodes = vec![
//!     (Key::from("x"), Node::from(Value::from(1))),
//!     (Key::from("x"), Node::from(Value::from(2))),
//! ];
//! let merged = materialize(nodes);
//! assert_eq!(merged.to_json(), serde_json::json!({"x": [1, 2]}));
//! ```

use crate::types::{Container, Key, Value};
use std::fmt;
use std::mem;

/// A lazy sequence of merge nodes.
pub type Nodes<'a> = Box<dyn Iterator<Item = (Key, Node<'a>)> + 'a>;

/// The value half of a merge node.
pub enum Node<'a> {
    /// A finished value, inserted as-is (containers are not re-walked).
    Value(Value),
    /// A nested sequence, materialized into a container before insertion.
    Nested(Nodes<'a>),
}

impl<'a> Node<'a> {
    pub fn nested<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (Key, Node<'a>)>,
        I::IntoIter: 'a,
    {
        Node::Nested(Box::new(nodes.into_iter()))
    }
}

impl From<Value> for Node<'_> {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Node::Nested(_) => f.write_str("Nested(..)"),
        }
    }
}

/// A nested sequence that has been entered but not yet exhausted.
struct Open<'a> {
    key: Key,
    nodes: Nodes<'a>,
    out: Container,
}

/// Materialize `nodes` into an owned container, merging repeated keys.
///
/// Nested sequences are tracked on an explicit stack, so the depth of the
/// input does not grow the call stack.
pub fn materialize<'a, I>(nodes: I) -> Container
where
    I: IntoIterator<Item = (Key, Node<'a>)>,
    I::IntoIter: 'a,
{
    let mut root = Container::new();
    let mut root_nodes: Nodes<'a> = Box::new(nodes.into_iter());
    let mut stack: Vec<Open<'a>> = Vec::new();

    loop {
        let (nodes, out) = match stack.last_mut() {
            Some(open) => (&mut open.nodes, &mut open.out),
            None => (&mut root_nodes, &mut root),
        };

        match nodes.next() {
            Some((key, Node::Value(value))) => merge_entry(out, key, value),
            Some((key, Node::Nested(inner))) => stack.push(Open {
                key,
                nodes: inner,
                out: Container::new(),
            }),
            None => {
                let Some(done) = stack.pop() else {
                    return root;
                };
                let parent = match stack.last_mut() {
                    Some(open) => &mut open.out,
                    None => &mut root,
                };
                merge_entry(parent, done.key, Value::Container(done.out));
            }
        }
    }
}

/// Insert `value` under `key`, accumulating when the key is already taken.
pub(crate) fn merge_entry(out: &mut Container, key: Key, value: Value) {
    match out.get_mut(&key) {
        None => {
            out.insert(key, value);
        }
        Some(slot) => {
            tracing::trace!(%key, "accumulating repeated key");
            let prior = mem::replace(slot, Value::null());
            *slot = accumulate(prior, value);
        }
    }
}

/// Combine a stored value with a repeat. The result is always a container.
fn accumulate(prior: Value, incoming: Value) -> Value {
    let mut list = into_list(prior);
    match incoming {
        Value::Scalar(_) => list.push(incoming),
        Value::Container(container) => merge_containers(&mut list, container),
    }
    Value::Container(list)
}

fn into_list(value: Value) -> Container {
    match value {
        Value::Container(container) => container,
        scalar @ Value::Scalar(_) => {
            let mut list = Container::new();
            list.push(scalar);
            list
        }
    }
}

fn merge_containers(acc: &mut Container, incoming: Container) {
    for (key, value) in incoming {
        match acc.get_mut(&key) {
            None => {
                acc.insert(key, value);
            }
            Some(slot) => {
                let prior = mem::replace(slot, Value::null());
                *slot = accumulate(prior, value);
            }
        }
    }
}
