//! Voice output
//!
//! Speech synthesis via ElevenLabs and playback through an external media player.
//! Both degrade instead of failing: synthesis yields no path, playback yields `false`.

mod playback;
mod tts;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use playback::CommandPlayer;
pub use tts::{DEFAULT_SIMILARITY_BOOST, DEFAULT_STABILITY, ElevenLabsTts, TTS_TIMEOUT};

/// Turns text into an audio file
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into `out_path`, returning the absolute path on success
    async fn synthesize(&self, text: &str, out_path: &Path) -> Option<PathBuf>;
}

/// Plays an audio file
#[async_trait]
pub trait Player: Send + Sync {
    /// Play the file at `path` to completion, returning whether it played
    async fn play(&self, path: &Path) -> bool;
}
