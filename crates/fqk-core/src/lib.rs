//! # fqk-core
//!
//! Flatten nested, keyed structures into one-level sequences of
//! **fully-qualified keys** (FQKs), and turn such sequences back into nested
//! structures.
//!
//! An FQK is the path from the root to a leaf, with segments joined by a
//! configurable separator and an optional prefix glued to the front.
//! Unflattening may see the same key more than once; repeated keys are merged
//! into lists instead of overwriting each other.
//!
//! ## Quick start
//!
//! ```rust
//! use fqk_core::{Config, Flattener, Value};
//! use serde_json::json;
//!
//! let flattener = Flattener::new(Config::default());
//! let nested = Value::from(json!({"a": 1, "c": {"d": [3, 4]}}));
//!
//! let flat: Vec<(String, Value)> = flattener.flatten(nested.clone()).collect();
//! let keys: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
//! assert_eq!(keys, ["a", "c.d.0", "c.d.1"]);
//!
//! let back = flattener.unflatten_to_container(flat).unwrap();
//! assert_eq!(Value::from(back), nested);
//! ```
//!
//! ## Modules
//!
//! - [`path`] - FQK joining, prefix stripping, segment splitting and decoding
//! - [`flatten`] - nested value → lazy `(FQK, leaf)` pairs
//! - [`unflatten`] - flat pairs → lazy nested merge nodes
//! - [`merge`] - merge nodes → container, accumulating repeated keys
//! - [`expand`] - eager first-write-wins inflate
//! - [`session`] - [`Config`] and the [`Flattener`] session
//! - [`json`] - JSON string helpers
//! - [`types`] - [`Key`], [`Scalar`], [`Value`], [`Container`]
//! - [`error`] - error types

pub mod error;
pub mod expand;
pub mod flatten;
pub mod json;
pub mod merge;
pub mod path;
pub mod session;
pub mod types;
pub mod unflatten;

pub use error::FqkError;
pub use merge::{materialize, Node, Nodes};
pub use session::{Config, Flattener};
pub use types::{Container, Key, Scalar, Value};
