//! Text transforms applied to recipe text before rendering.
//!
//! Translation is the only transform shipped today, but the synthesizer only
//! sees the `TextTransform` trait, so anything of the shape `text -> text`
//! (unit conversion, spelling normalization) can be plugged in.

mod fake;
mod google;

pub use fake::FakeTranslator;
pub use google::GoogleTranslator;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for text transforms.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    RequestFailed(String),

    #[error("Translation service returned HTTP {status}")]
    ApiError { status: u16 },

    #[error("Failed to parse translation response: {0}")]
    ParseError(String),
}

/// A text-in, text-out capability.
#[async_trait]
pub trait TextTransform: Send + Sync + fmt::Debug {
    async fn transform(&self, text: &str) -> Result<String, TranslateError>;
}

/// Leaves text untouched. Used when translation is not requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

#[async_trait]
impl TextTransform for Identity {
    async fn transform(&self, text: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// Apply a transform to every line, keeping order. Stops at the first failure.
pub async fn transform_all<T: TextTransform + ?Sized>(
    transform: &T,
    lines: &[String],
) -> Result<Vec<String>, TranslateError> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        out.push(transform.transform(line).await?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_keeps_text() {
        assert_eq!(Identity.transform("Mélanger").await.unwrap(), "Mélanger");
    }

    #[tokio::test]
    async fn test_transform_all_preserves_order() {
        let translator = FakeTranslator::new()
            .with_translation("un", "one")
            .with_translation("deux", "two");
        let lines = vec!["deux".to_string(), "un".to_string()];
        let out = transform_all(&translator, &lines).await.unwrap();
        assert_eq!(out, vec!["two", "one"]);
    }

    #[tokio::test]
    async fn test_transform_all_stops_on_failure() {
        let translator = FakeTranslator::new().with_translation("un", "one");
        let lines = vec!["un".to_string(), "trois".to_string()];
        assert!(transform_all(&translator, &lines).await.is_err());
    }
}
