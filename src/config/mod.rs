//! Configuration management for the Riverwood agent
//!
//! Values are resolved once at startup with priority env > toml > default and
//! then handed to each component by reference.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::{Error, Result};
use file::RiverwoodConfigFile;

/// Default ElevenLabs voice ("Clyde", available on the free tier)
pub const DEFAULT_VOICE_ID: &str = "2EiwWnXFnvU5JabPnv8n";

/// Default number of past exchanges kept in the prompt
pub const DEFAULT_MEMORY_SIZE: usize = 3;

/// Default file the synthesized reply is written to
pub const DEFAULT_OUTPUT_AUDIO: &str = "agent_reply.mp3";

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_ELEVEN_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_ELEVEN_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_PLAYER: &str = "ffplay -nodisp -autoexit";

/// Riverwood agent configuration
#[derive(Debug)]
pub struct Config {
    /// Completion service configuration
    pub llm: LlmConfig,

    /// Speech synthesis and playback configuration
    pub voice: VoiceConfig,

    /// Memory window size (past exchanges included in each prompt)
    pub memory_size: usize,

    /// Output audio file, overwritten every turn
    pub output_audio: PathBuf,
}

/// Gemini completion configuration
#[derive(Debug)]
pub struct LlmConfig {
    pub api_key: SecretString,

    /// Model identifier (e.g. "gemini-2.5-pro")
    pub model: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    pub temperature: f32,
    pub max_tokens: u32,
}

/// ElevenLabs synthesis and local playback configuration
#[derive(Debug)]
pub struct VoiceConfig {
    pub api_key: SecretString,

    /// ElevenLabs voice identifier
    pub voice_id: String,

    /// ElevenLabs model identifier
    pub model_id: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    pub stability: f32,
    pub similarity_boost: f32,

    /// Media player command line; the audio path is appended as the last argument
    pub player: String,
}

impl Config {
    /// Load configuration from the process environment and the config file
    ///
    /// A `.env` file in the working directory is merged into the environment first.
    ///
    /// # Errors
    ///
    /// Returns error if a required credential is missing or a value is malformed
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        let fc = file::load_config_file()?;
        Self::from_sources(|key| std::env::var(key).ok(), fc)
    }

    /// Build configuration from an environment lookup and a parsed config file
    ///
    /// # Errors
    ///
    /// Returns error if a required credential is missing or a value is malformed
    pub fn from_sources<F>(env: F, fc: RiverwoodConfigFile) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_key = env("GEMINI_API_KEY")
            .or(fc.api_keys.gemini)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        let eleven_key = env("ELEVEN_API_KEY")
            .or(fc.api_keys.elevenlabs)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("ELEVEN_API_KEY is not set".to_string()))?;

        let memory_size = match env("MEMORY_SIZE") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("MEMORY_SIZE must be a non-negative integer, got {raw:?}: {e}"))
            })?,
            None => fc.session.memory_size.unwrap_or(DEFAULT_MEMORY_SIZE),
        };

        let output_audio = env("OUTPUT_AUDIO")
            .or(fc.session.output_audio)
            .unwrap_or_else(|| DEFAULT_OUTPUT_AUDIO.to_string());

        let llm = LlmConfig {
            api_key: SecretString::from(gemini_key),
            model: env("GEMINI_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: trim_base_url(
                env("GEMINI_BASE_URL")
                    .or(fc.llm.base_url)
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            ),
            temperature: fc.llm.temperature.unwrap_or(crate::completion::DEFAULT_TEMPERATURE),
            max_tokens: fc.llm.max_tokens.unwrap_or(crate::completion::DEFAULT_MAX_TOKENS),
        };

        let voice = VoiceConfig {
            api_key: SecretString::from(eleven_key),
            voice_id: env("ELEVEN_VOICE_ID")
                .or(fc.voice.voice_id)
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            model_id: env("ELEVEN_MODEL_ID")
                .or(fc.voice.model_id)
                .unwrap_or_else(|| DEFAULT_ELEVEN_MODEL.to_string()),
            base_url: trim_base_url(
                env("ELEVEN_BASE_URL")
                    .or(fc.voice.base_url)
                    .unwrap_or_else(|| DEFAULT_ELEVEN_BASE_URL.to_string()),
            ),
            stability: fc.voice.stability.unwrap_or(crate::voice::DEFAULT_STABILITY),
            similarity_boost: fc
                .voice
                .similarity_boost
                .unwrap_or(crate::voice::DEFAULT_SIMILARITY_BOOST),
            player: env("RIVERWOOD_PLAYER")
                .or(fc.voice.player)
                .unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
        };

        Ok(Self {
            llm,
            voice,
            memory_size,
            output_audio: PathBuf::from(output_audio),
        })
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
