//! Text-to-speech (TTS) via ElevenLabs

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncWriteExt;

use super::Synthesizer;
use crate::config::VoiceConfig;
use crate::{Error, Result};

/// Voice stability sent with every request
pub const DEFAULT_STABILITY: f32 = 0.5;

/// Voice similarity boost sent with every request
pub const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

/// Upper bound on a synthesis request, body included
pub const TTS_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

#[derive(serde::Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(serde::Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// Synthesizes speech with the ElevenLabs text-to-speech API
pub struct ElevenLabsTts {
    client: reqwest::Client,
    api_key: SecretString,
    voice_id: String,
    model_id: String,
    base_url: String,
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsTts {
    /// Create a TTS instance for `voice_id` at `base_url` (e.g. `https://api.elevenlabs.io`)
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(
        api_key: SecretString,
        voice_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timeout(api_key, voice_id, base_url, TTS_TIMEOUT)
    }

    /// Create a TTS instance with a custom request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_timeout(
        api_key: SecretString,
        voice_id: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Tts(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            voice_id: voice_id.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: base_url.into(),
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
        })
    }

    /// Create a TTS instance from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn from_config(config: &VoiceConfig) -> Result<Self> {
        let mut tts = Self::new(
            config.api_key.clone(),
            config.voice_id.clone(),
            config.base_url.clone(),
        )?;
        tts.model_id.clone_from(&config.model_id);
        tts.stability = config.stability;
        tts.similarity_boost = config.similarity_boost;
        Ok(tts)
    }

    /// Voice identifier requests are sent for
    #[must_use]
    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    async fn try_synthesize(&self, text: &str, out_path: &Path) -> Result<PathBuf> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: self.stability,
                similarity_boost: self.similarity_boost,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        tracing::debug!(%status, %content_type, "TTS response");

        // Only the content type decides success; status is informational
        if !content_type.contains("audio") {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %content_type, %body, "TTS returned non-audio response");
            return Err(Error::Tts(format!(
                "ElevenLabs returned {content_type:?} ({status})"
            )));
        }

        let abs_path = std::path::absolute(out_path)?;
        let mut file = tokio::fs::File::create(&abs_path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::debug!(path = %abs_path.display(), bytes = written, "audio saved");
        Ok(abs_path)
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsTts {
    async fn synthesize(&self, text: &str, out_path: &Path) -> Option<PathBuf> {
        match self.try_synthesize(text, out_path).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(error = %e, voice_id = %self.voice_id, "speech synthesis failed");
                None
            }
        }
    }
}
