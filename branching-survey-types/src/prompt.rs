use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display text keyed by locale code, e.g., `{"english": "What is your name?"}`.
///
/// The engine never interprets the text. Locales keep the order in which they were authored,
/// and the first one is the fallback when a requested locale is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptText {
    texts: IndexMap<String, String>,
}

impl PromptText {
    /// The locale key used by the bundled survey content.
    pub const DEFAULT_LOCALE: &'static str = "english";

    /// Create prompt text with a single locale.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self::empty().with(locale, text)
    }

    /// Create prompt text in the default locale.
    pub fn english(text: impl Into<String>) -> Self {
        Self::new(Self::DEFAULT_LOCALE, text)
    }

    /// Create prompt text with no locales. Rejected when a graph is loaded.
    pub fn empty() -> Self {
        Self {
            texts: IndexMap::new(),
        }
    }

    /// Add (or replace) the text for a locale.
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(locale.into(), text.into());
        self
    }

    /// Get the text for exactly this locale.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.texts.get(locale).map(String::as_str)
    }

    /// Get the text for this locale, falling back to the first authored locale.
    pub fn localized(&self, locale: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.texts.first().map(|(_, text)| text.as_str()))
    }

    /// Iterate over the locale codes in authoring order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.texts.keys().map(String::as_str)
    }

    /// Check if no locale is present.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
