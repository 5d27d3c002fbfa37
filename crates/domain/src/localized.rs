use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language tags the storefront ships translations for.
///
/// Any other tag is still accepted and stored as-is.
pub const SUPPORTED_LANGUAGE_TAGS: &[&str] = &["en", "vi", "ja"];

/// Display text keyed by language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Creates an empty translation map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the map with one translation added or replaced.
    #[must_use]
    pub fn with(mut self, language_tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(language_tag, text);
        self
    }

    /// Adds or replaces one translation.
    pub fn insert(&mut self, language_tag: impl Into<String>, text: impl Into<String>) {
        self.0.insert(language_tag.into(), text.into());
    }

    /// Returns the translation for a language tag.
    #[must_use]
    pub fn get(&self, language_tag: &str) -> Option<&str> {
        self.0.get(language_tag).map(String::as_str)
    }

    /// Returns the translation for a tag, or the fallback when missing.
    #[must_use]
    pub fn display<'a>(&'a self, language_tag: &str, fallback: &'a str) -> &'a str {
        self.get(language_tag).unwrap_or(fallback)
    }

    /// Returns true when no translation is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates translations ordered by language tag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(tag, text)| (tag.as_str(), text.as_str()))
    }
}

impl FromIterator<(String, String)> for LocalizedText {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
