//! Text completion
//!
//! Completion never fails from the caller's point of view: errors and empty
//! responses degrade to a fixed fallback sentence, tagged so callers can
//! tell a real reply from a degraded one.

mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default cap on output tokens per reply
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Reply used when the service or transport fails
pub const APOLOGY: &str =
    "Maaf kijiye, mujhe thodi dikkat aa rahi hai. Kya aap apna sawaal dobara bata sakte hain?";

/// Reply used when the service answers but yields no usable text, even on retry
pub const EMPTY_REPLY: &str =
    "Namaste! Main theek hoon, batayein, aapko kis cheez mein madad chahiye?";

/// Outcome of a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Text produced by the model
    Reply(String),
    /// Canned text substituted after a failure
    Fallback(String),
}

impl Completion {
    /// Reply text, whatever its origin
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Fallback(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Reply(text) | Self::Fallback(text) => text,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A text completion backend
#[async_trait]
pub trait Completer: Send + Sync {
    /// Complete `prompt` with the given sampling parameters
    async fn complete(&self, prompt: &str, temperature: f32, max_tokens: u32) -> Completion;
}
