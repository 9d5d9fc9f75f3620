//! Request options and event metadata.
//!
//! [`RequestOptions`] is the free-form option set an inbound request carries,
//! whether it came from CLI flags or from a decoded bus signal. [`Metadata`]
//! is what survives of it once the keys promoted to first-class event fields
//! have been removed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Option keys the translator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Image variant, e.g. `slim`.
    Variant,
    /// Python version baked into the image.
    PythonVersion,
    /// Version tag of the image.
    ImageVersion,
    /// Registry the image is pushed to.
    DockerRegistryUrl,
    /// Version of the Azure base image.
    AzureBaseVersion,
}

impl OptionKey {
    /// The key as it appears in the option mapping.
    pub const fn as_str(self) -> &'static str {
        match self {
            OptionKey::Variant => "variant",
            OptionKey::PythonVersion => "python_version",
            OptionKey::ImageVersion => "image_version",
            OptionKey::DockerRegistryUrl => "docker_registry_url",
            OptionKey::AzureBaseVersion => "azure_base_version",
        }
    }
}

/// A command-line option that is not of the form `key=value`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected key=value, got `{input}`")]
pub struct ParsePairError {
    input: String,
}

/// Mapping from option key to a possibly-null string value.
///
/// A key mapped to `None` is present but null. The typed accessors report
/// absent and null keys the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestOptions {
    entries: BTreeMap<String, Option<String>>,
}

impl RequestOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a non-null value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a non-null value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Some(value.into()));
    }

    /// Insert a key whose value is null.
    pub fn insert_null(&mut self, key: impl Into<String>) {
        self.entries.insert(key.into(), None);
    }

    /// Parse a `key=value` pair, as given on the command line.
    ///
    /// Everything after the first `=` is the value, so values may contain `=`.
    pub fn parse_pair(pair: &str) -> Result<(String, String), ParsePairError> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_owned(), value.to_owned()))
            }
            _ => Err(ParsePairError {
                input: pair.to_owned(),
            }),
        }
    }

    /// Look up a raw key. Null values are reported as `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_deref())
    }

    /// Look up a known key.
    pub fn value(&self, key: OptionKey) -> Option<&str> {
        self.get(key.as_str())
    }

    /// The `variant` option.
    pub fn variant(&self) -> Option<&str> {
        self.value(OptionKey::Variant)
    }

    /// The `python_version` option.
    pub fn python_version(&self) -> Option<&str> {
        self.value(OptionKey::PythonVersion)
    }

    /// The `image_version` option.
    pub fn image_version(&self) -> Option<&str> {
        self.value(OptionKey::ImageVersion)
    }

    /// The `docker_registry_url` option.
    pub fn docker_registry_url(&self) -> Option<&str> {
        self.value(OptionKey::DockerRegistryUrl)
    }

    /// The `azure_base_version` option.
    pub fn azure_base_version(&self) -> Option<&str> {
        self.value(OptionKey::AzureBaseVersion)
    }

    /// Whether the key is present, null or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of keys, null ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestOptions
where
    K: Into<String>,
    V: Into<Option<String>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Options safe to attach to a domain event.
///
/// Only [`sanitize`] creates metadata from options, so its keys are always a
/// subset of the source keys with the exclusion set removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, Option<String>>,
}

impl Metadata {
    /// Empty metadata.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a key. Null values are reported as `None`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_deref())
    }

    /// Whether the key is present, null or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Copy `options`, dropping every key in `exclude`.
///
/// Unknown keys pass through untouched, null values included.
pub fn sanitize<'a, I>(options: &RequestOptions, exclude: I) -> Metadata
where
    I: IntoIterator<Item = &'a str>,
{
    let exclude: BTreeSet<&str> = exclude.into_iter().collect();
    Metadata {
        entries: options
            .entries
            .iter()
            .filter(|(key, _)| !exclude.contains(key.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}
