//! Google Gemini completion client (Generative Language REST API)

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{APOLOGY, Completer, Completion, EMPTY_REPLY};
use crate::config::LlmConfig;
use crate::prompt::fallback_prompt;
use crate::{Error, Result};

/// Harm categories sent with every request, all unblocked
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
];

const BLOCK_NONE: &str = "BLOCK_NONE";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    /// Pre-aggregated reply text, when the endpoint provides one
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// The aggregated `text` member, if present and non-blank
    fn aggregated_text(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
    }

    /// Text fragments of the first candidate that has any, joined by spaces
    fn candidate_text(&self) -> Option<String> {
        self.candidates.iter().find_map(|candidate| {
            let texts: Vec<&str> = candidate
                .content
                .as_ref()?
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .filter(|t| !t.is_empty())
                .collect();

            if texts.is_empty() {
                None
            } else {
                Some(texts.join(" ").trim().to_string())
            }
        })
    }

    fn log_empty(&self) {
        let block_reason = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref());
        let finish_reasons: Vec<&str> = self
            .candidates
            .iter()
            .filter_map(|c| c.finish_reason.as_deref())
            .collect();
        tracing::debug!(
            ?block_reason,
            ?finish_reasons,
            candidates = self.candidates.len(),
            "completion response carried no text"
        );
    }
}

/// Completion client for Gemini models
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url` (e.g. `https://generativelanguage.googleapis.com`)
    #[must_use]
    pub fn new(api_key: SecretString, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Create a client from the loaded configuration
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )
    }

    /// Model identifier requests are sent to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the extraction chain: aggregated text, candidate parts, then one retry read the same way
    async fn try_complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Result<Completion> {
        let response = self.generate(prompt, temperature, max_tokens).await?;

        if let Some(text) = response.aggregated_text() {
            return Ok(Completion::Reply(text));
        }
        if let Some(text) = response.candidate_text() {
            return Ok(Completion::Reply(text));
        }
        response.log_empty();

        tracing::warn!(model = %self.model, "empty completion, retrying with fallback prompt");
        let retry = self
            .generate(&fallback_prompt(prompt), temperature, max_tokens)
            .await?;

        if let Some(text) = retry.aggregated_text().or_else(|| retry.candidate_text()) {
            return Ok(Completion::Reply(text));
        }
        retry.log_empty();

        Ok(Completion::Fallback(EMPTY_REPLY.to_string()))
    }

    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: BLOCK_NONE,
                })
                .collect(),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            temperature,
            max_tokens,
            "requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Completion(format!("Gemini API error {status}: {body}")));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Completer for GeminiClient {
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Completion {
        match self.try_complete(prompt, temperature, max_tokens).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "completion failed");
                Completion::Fallback(APOLOGY.to_string())
            }
        }
    }
}
