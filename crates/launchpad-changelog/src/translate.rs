//! Changelog translation
//!
//! The generated block can be translated by a generative-text API and kept
//! in a second changelog file. Links and Markdown structure must survive the
//! round trip, which the prompt asks for explicitly.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use launchpad_core::error::{ChangelogError, Result};

use crate::writer::prepend_changelog;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Gemini API base URL
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Translates changelog text
pub trait Translator {
    /// Translate `text`, keeping Markdown links and layout
    fn translate(&self, text: &str) -> Result<String>;
}

/// Prompt sent for a changelog block
pub fn translation_prompt(changelog: &str) -> String {
    format!(
        "Translate the following text to Chinese and keep the {{by [author](url) and in [pr](url)}} \
         in the latest and keep the original format:\n\n {}",
        changelog
    )
}

/// Translate `block` and prepend the result to the changelog at `path`
#[instrument(skip(translator, block), fields(path = %path.display()))]
pub fn translate_changelog(translator: &dyn Translator, block: &str, path: &Path) -> Result<()> {
    let translated = translator.translate(block)?;
    if translated.trim().is_empty() {
        return Err(ChangelogError::TranslationFailed("empty response".to_string()).into());
    }
    prepend_changelog(path, &translated)?;
    info!(path = %path.display(), "wrote translated changelog");
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        Some(text)
    }
}

/// Translator backed by the Gemini `generateContent` endpoint
pub struct GeminiTranslator {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranslator {
    /// Create a translator with an API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ChangelogError::TranslationFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Translator for GeminiTranslator {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    fn translate(&self, text: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let prompt = translation_prompt(text);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig::default(),
        };

        debug!("Gemini API request: POST {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| ChangelogError::TranslationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(ChangelogError::TranslationFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            ))
            .into());
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ChangelogError::TranslationFailed(e.to_string()))?;
        let translated = parsed
            .text()
            .ok_or_else(|| ChangelogError::TranslationFailed("no candidates in response".to_string()))?;

        info!(
            duration_ms = start.elapsed().as_millis(),
            "translated changelog"
        );
        Ok(translated)
    }
}
