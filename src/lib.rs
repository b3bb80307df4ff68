//! Riverwood Agent - text-in, voice-out real-estate assistant
//!
//! Each turn reads a typed message, asks a Gemini model for a reply with a
//! short window of conversation history, speaks the reply through ElevenLabs
//! and plays it with a local media player.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Session loop                      │
//! │   stdin → prompt → completion → speech → playback    │
//! └──────┬──────────────┬──────────────┬─────────────────┘
//!        │              │              │
//! ┌──────▼─────┐ ┌──────▼──────┐ ┌─────▼────────────────┐
//! │   Memory   │ │   Gemini    │ │ ElevenLabs │ ffplay  │
//! │  (window)  │ │ (REST API)  │ │   (TTS)    │ (local) │
//! └────────────┘ └─────────────┘ └──────────────────────┘
//! ```

pub mod agent;
pub mod completion;
pub mod config;
pub mod error;
pub mod prompt;
pub mod voice;

pub use agent::{Exchange, Memory, Session, SessionSettings};
pub use completion::{Completer, Completion, GeminiClient};
pub use config::Config;
pub use error::{Error, Result};
pub use voice::{CommandPlayer, ElevenLabsTts, Player, Synthesizer};
