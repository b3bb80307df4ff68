//! TOML configuration file loading
//!
//! Supports `~/.config/riverwood/config.toml` as a persistent config source.
//! All fields are optional, the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct RiverwoodConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis and playback configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Conversation session configuration
    #[serde(default)]
    pub session: SessionFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Completion-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-2.5-pro")
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Maximum output tokens per reply
    pub max_tokens: Option<u32>,

    /// API base URL override
    pub base_url: Option<String>,
}

/// Voice configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// ElevenLabs voice identifier
    pub voice_id: Option<String>,

    /// ElevenLabs synthesis model (e.g. "eleven_multilingual_v2")
    pub model_id: Option<String>,

    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,

    /// Media player command line (e.g. "ffplay -nodisp -autoexit")
    pub player: Option<String>,

    /// API base URL override
    pub base_url: Option<String>,
}

/// Session configuration
#[derive(Debug, Default, Deserialize)]
pub struct SessionFileConfig {
    /// Number of past exchanges included in each prompt
    pub memory_size: Option<usize>,

    /// File the synthesized reply is written to
    pub output_audio: Option<String>,
}

/// Default config file location (`~/.config/riverwood/config.toml` on Linux)
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RIVERWOOD_CONFIG") {
        return Some(PathBuf::from(path));
    }

    directories::BaseDirs::new().map(|d| d.config_dir().join("riverwood").join("config.toml"))
}

/// Load the config file from its default location
///
/// A missing file yields defaults. A file that exists but cannot be read or
/// parsed is an error, so typos are not silently ignored.
///
/// # Errors
///
/// Returns error if the file exists but is unreadable or invalid TOML
pub fn load_config_file() -> Result<RiverwoodConfigFile> {
    match config_file_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(RiverwoodConfigFile::default()),
    }
}

/// Parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file is unreadable or invalid TOML
pub fn load_from(path: &Path) -> Result<RiverwoodConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let parsed = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(parsed)
}
