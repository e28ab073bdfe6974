//! Google Translate via the public `translate_a/single` endpoint.

use super::{TextTransform, TranslateError};
use async_trait::async_trait;
use std::time::Duration;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translates from an auto-detected language into a fixed target language.
#[derive(Debug)]
pub struct GoogleTranslator {
    source: String,
    target: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    /// Auto-detect the source language and translate to English.
    pub fn to_english(timeout: Duration) -> Result<Self, TranslateError> {
        Self::new("auto", "en", timeout)
    }

    pub fn new(source: &str, target: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::RequestFailed(e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
            client,
        })
    }

    fn request_url(&self, text: &str) -> Result<url::Url, TranslateError> {
        url::Url::parse_with_params(
            ENDPOINT,
            &[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| TranslateError::RequestFailed(e.to_string()))
    }
}

/// The response is a nested array; the first element holds one
/// `[translated, original, ...]` entry per sentence.
fn parse_response(body: &str) -> Result<String, TranslateError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TranslateError::ParseError(e.to_string()))?;

    let sentences = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::ParseError("missing sentence list".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(|v| v.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslateError::ParseError(
            "no translated text in response".to_string(),
        ));
    }
    Ok(translated)
}

#[async_trait]
impl TextTransform for GoogleTranslator {
    async fn transform(&self, text: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let url = self.request_url(text)?;
        tracing::debug!(chars = text.len(), target = %self.target, "translating");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranslateError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(TranslateError::ApiError { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::RequestFailed(e.to_string()))?;

        parse_response(&body)
    }
}
