//! Value model shared by every transform: keys, scalars, and ordered containers.
//!
//! There is a single composite type, [`Container`], an insertion-ordered
//! mapping from [`Key`] to [`Value`]. A "list" is simply a container whose keys
//! happen to be `Index(0..n)`; the engine never distinguishes the two.
//!
//! Conversions to and from `serde_json::Value` live here too, so callers can
//! move between JSON documents and the engine without a custom walker.

use indexmap::IndexMap;
use serde_json::{Map, Number};
use std::fmt;

/// A container key. Numeric-ness is a property of the variant chosen when the
/// container was built, never inferred later from the text of a named key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Integer index, e.g. a position in a sequence-like container.
    Index(u64),
    /// Arbitrary text label.
    Name(String),
}

impl Key {
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(n) => write!(f, "{n}"),
            Key::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        Key::Index(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Index(n) => n.to_string(),
            Key::Name(s) => s,
        }
    }
}

/// Leaf payload. Carried through every transform untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A node of the tree: either a leaf or an ordered container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Container(Container),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Container(_))
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(c) => Some(c),
            Value::Scalar(_) => None,
        }
    }

    /// Render as JSON, see [`Container::to_json`] for the container rules.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(s) => scalar_to_json(s),
            Value::Container(c) => c.to_json(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Container> for Value {
    fn from(c: Container) -> Self {
        Value::Container(c)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Integer(n.into()))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

/// Insertion-ordered mapping from [`Key`] to [`Value`].
///
/// Equality is order-sensitive: two containers with the same entries in a
/// different order are not equal, since entry order drives flatten output.
#[derive(Debug, Clone, Default)]
pub struct Container {
    entries: IndexMap<Key, Value>,
    next_index: u64,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        self.note_key(&key);
        self.entries.insert(key, value.into())
    }

    /// Append at the next free numeric index: one past the largest
    /// `Key::Index` present, or 0 when there is none.
    pub fn push(&mut self, value: impl Into<Value>) {
        let index = self.next_index();
        self.insert(Key::Index(index), value);
    }

    /// One past the largest `Key::Index` present, saturating at `u64::MAX`.
    /// Kept up to date on insert.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    fn note_key(&mut self, key: &Key) {
        if let Key::Index(n) = key {
            self.next_index = self.next_index.max(n.saturating_add(1));
        }
    }

    /// True when the keys are exactly `Index(0)..Index(len - 1)` in order.
    /// The empty container counts as sequence-like.
    pub fn is_sequence(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, k)| *k == Key::Index(i as u64))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    /// Render as a JSON object keyed by the displayed key text, whatever the
    /// keys are. Flat FQK maps use this so an empty result stays `{}`.
    pub fn to_json_object(&self) -> Map<String, serde_json::Value> {
        let mut map = Map::with_capacity(self.len());
        for (key, value) in &self.entries {
            map.insert(key.to_string(), value.to_json());
        }
        map
    }

    /// Render as JSON. Sequence-like containers (including the empty one)
    /// become arrays; anything else becomes an object keyed by the displayed
    /// key text.
    pub fn to_json(&self) -> serde_json::Value {
        if self.is_sequence() {
            return serde_json::Value::Array(self.entries.values().map(Value::to_json).collect());
        }
        serde_json::Value::Object(self.to_json_object())
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut container = Container::new();
        container.extend(iter);
        container
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Container {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Container {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// JSON bridge
// ---------------------------------------------------------------------------

/// Arrays get `Index` keys, objects get `Name` keys. An object key such as
/// `"0"` stays a name: only arrays produce numeric keys.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(number_to_scalar(&n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Array(arr) => Value::Container(
                arr.into_iter()
                    .enumerate()
                    .map(|(i, v)| (Key::Index(i as u64), Value::from(v)))
                    .collect(),
            ),
            serde_json::Value::Object(map) => Value::Container(
                map.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        value.to_json()
    }
}

impl From<Container> for serde_json::Value {
    fn from(container: Container) -> Self {
        container.to_json()
    }
}

fn number_to_scalar(n: &Number) -> Scalar {
    match (n.as_i64(), n.as_f64()) {
        (Some(i), _) => Scalar::Integer(i),
        (None, Some(f)) => Scalar::Float(f),
        (None, None) => Scalar::Null,
    }
}

fn scalar_to_json(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Null => serde_json::Value::Null,
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Integer(i) => serde_json::Value::Number((*i).into()),
        // NaN and infinities have no JSON form.
        Scalar::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Scalar::String(s) => serde_json::Value::String(s.clone()),
    }
}
