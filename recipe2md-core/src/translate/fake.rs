//! Fake translator for testing.
//!
//! Returns canned translations so tests run without network access.

use super::{TextTransform, TranslateError};
use async_trait::async_trait;
use std::collections::HashMap;

/// A fake translator with exact-match lookups.
///
/// Text without a registered translation is either passed through with a
/// marker (see `with_fallback_prefix`) or rejected with an error.
#[derive(Debug, Default)]
pub struct FakeTranslator {
    translations: HashMap<String, String>,
    fallback_prefix: Option<String>,
}

impl FakeTranslator {
    /// Create a translator that knows nothing and fails on every lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translation for an exact input.
    pub fn with_translation(mut self, text: &str, translated: &str) -> Self {
        self.translations
            .insert(text.to_string(), translated.to_string());
        self
    }

    /// Translate unknown text as `<prefix><text>` instead of failing.
    pub fn with_fallback_prefix(mut self, prefix: &str) -> Self {
        self.fallback_prefix = Some(prefix.to_string());
        self
    }
}

#[async_trait]
impl TextTransform for FakeTranslator {
    async fn transform(&self, text: &str) -> Result<String, TranslateError> {
        if let Some(translated) = self.translations.get(text) {
            return Ok(translated.clone());
        }
        match &self.fallback_prefix {
            Some(prefix) => Ok(format!("{}{}", prefix, text)),
            None => Err(TranslateError::RequestFailed(format!(
                "FakeTranslator: no translation configured for: {}",
                text
            ))),
        }
    }
}
