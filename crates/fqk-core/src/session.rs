//! Session configuration and the [`Flattener`] entry point.

use crate::error::{FqkError, Result};
use crate::expand;
use crate::flatten::FlattenIter;
use crate::merge::materialize;
use crate::path::strip_prefix;
use crate::types::{Container, Value};
use crate::unflatten::UnflattenIter;
use serde::{Deserialize, Serialize};

/// Settings for one flatten/unflatten session.
///
/// Deserializes from a partial document; missing fields take their defaults:
///
/// ```
/// use fqk_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"prefix": "app_"}"#).unwrap();
/// assert_eq!(config.separator, ".");
/// assert_eq!(config.prefix, "app_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placed between path segments. May be empty for flatten only.
    pub separator: String,

    /// Prepended to every key, with no separator after it.
    pub prefix: String,

    /// Emit numeric-keyed entries of each container as one grouped value
    /// instead of walking them. Has no effect on unflatten.
    pub numeric_not_flattened: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            separator: String::from("."),
            prefix: String::new(),
            numeric_not_flattened: false,
        }
    }
}

impl Config {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_numeric_not_flattened(mut self, enabled: bool) -> Self {
        self.numeric_not_flattened = enabled;
        self
    }
}

/// A flatten/unflatten session. Holds a [`Config`] that stays fixed for the
/// lifetime of the session; every iterator it hands out borrows it.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: Config,
}

impl Flattener {
    pub fn new(config: Config) -> Self {
        tracing::debug!(
            separator = %config.separator,
            prefix = %config.prefix,
            numeric_not_flattened = config.numeric_not_flattened,
            "created flattener session"
        );
        Flattener { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lazily flatten `value` into `(FQK, leaf)` pairs, in depth-first
    /// pre-order. A scalar input yields one pair keyed by the prefix alone.
    pub fn flatten(&self, value: Value) -> FlattenIter<'_> {
        FlattenIter::new(value, &self.config)
    }

    /// Flatten eagerly into a one-level container keyed by FQK.
    pub fn flatten_to_container(&self, value: Value) -> Container {
        self.flatten(value).collect()
    }

    /// Lazily split flat `(FQK, value)` entries into nested merge nodes.
    ///
    /// Accepts any sequence of pairs whose key converts into a `String`,
    /// including a [`Container`]. The result may repeat keys; feed it to
    /// [`materialize`] to reconcile them.
    ///
    /// # Errors
    ///
    /// Returns [`FqkError::EmptySeparator`] if the configured separator is
    /// empty. No entry is consumed in that case.
    pub fn unflatten<I, K>(&self, entries: I) -> Result<UnflattenIter<'_, I::IntoIter>>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.check_separator()?;
        Ok(UnflattenIter::new(
            entries.into_iter(),
            &self.config.prefix,
            &self.config.separator,
        ))
    }

    /// Unflatten and materialize in one step, merging repeated keys.
    pub fn unflatten_to_container<'s, I, K>(&'s self, entries: I) -> Result<Container>
    where
        I: IntoIterator<Item = (K, Value)>,
        I::IntoIter: 's,
        K: Into<String>,
    {
        Ok(materialize(self.unflatten(entries)?))
    }

    /// Eagerly inflate flat entries without merging: the first meaningful
    /// write to a key wins. The session prefix is stripped first.
    /// See [`expand::expand`].
    pub fn expand<I, K>(&self, entries: I) -> Result<Container>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.check_separator()?;
        let prefix = self.config.prefix.as_str();
        let stripped = entries.into_iter().map(|(fqk, value)| {
            let fqk: String = fqk.into();
            (strip_prefix(&fqk, prefix).to_string(), value)
        });
        expand::expand(stripped, &self.config.separator)
    }

    fn check_separator(&self) -> Result<()> {
        if self.config.separator.is_empty() {
            tracing::debug!("rejected unflatten: separator is empty");
            return Err(FqkError::EmptySeparator);
        }
        Ok(())
    }
}
