//! Interactive conversation session
//!
//! Drives one turn at a time: read a line, compose the prompt, complete it,
//! speak the reply, then remember the exchange.

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::memory::{Exchange, Memory};
use crate::Result;
use crate::completion::{Completer, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::config::{Config, DEFAULT_MEMORY_SIZE, DEFAULT_OUTPUT_AUDIO};
use crate::prompt;
use crate::voice::{Player, Synthesizer};

/// Spoken before the first prompt
pub const GREETING: &str =
    "Namaste Sir, chai pee li? Main Riverwood se bol raha hoon, kaise madad kar sakta hoon aaj?";

/// Printed when the session ends
pub const FAREWELL: &str = "Goodbye, best of luck with the challenge!";

/// Inputs that end the session (case-insensitive)
pub const EXIT_KEYWORDS: [&str; 2] = ["exit", "quit"];

const BANNER: &str = "Riverwood AI Voice Agent - prototype (text mode). Type 'exit' to quit.";

/// Tunables for a session, usually derived from [`Config`]
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Memory window size
    pub memory_size: usize,
    /// File each reply is synthesized into
    pub output_audio: PathBuf,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            output_audio: PathBuf::from(DEFAULT_OUTPUT_AUDIO),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            memory_size: config.memory_size,
            output_audio: config.output_audio.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        }
    }
}

#[derive(Debug)]
enum SessionState {
    Greeting,
    Listening,
    Processing(String),
    Speaking { input: String, reply: String },
    Terminated,
}

/// Whether `input` asks to end the session
#[must_use]
pub fn is_exit_keyword(input: &str) -> bool {
    let input = input.trim();
    EXIT_KEYWORDS
        .iter()
        .any(|keyword| input.eq_ignore_ascii_case(keyword))
}

/// A single-user conversation over a line-oriented reader and writer
pub struct Session {
    completer: Box<dyn Completer>,
    synthesizer: Box<dyn Synthesizer>,
    player: Box<dyn Player>,
    memory: Memory,
    settings: SessionSettings,
}

impl Session {
    #[must_use]
    pub fn new(
        completer: Box<dyn Completer>,
        synthesizer: Box<dyn Synthesizer>,
        player: Box<dyn Player>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            completer,
            synthesizer,
            player,
            memory: Memory::new(settings.memory_size),
            settings,
        }
    }

    /// Exchanges currently remembered, oldest first
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Run the conversation until an exit keyword or end of input
    ///
    /// Returns the number of completed turns. Backend failures never end the
    /// session; they surface as a fallback reply or skipped audio.
    ///
    /// # Errors
    ///
    /// Returns error only if reading input or writing output fails
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut state = SessionState::Greeting;
        let mut turns = 0usize;

        loop {
            tracing::trace!(?state, "session state");

            state = match state {
                SessionState::Greeting => {
                    output.write_all(format!("{BANNER}\nAgent: {GREETING}\n").as_bytes()).await?;
                    output.flush().await?;
                    self.speak(GREETING, output).await?;
                    SessionState::Listening
                }
                SessionState::Listening => {
                    output.write_all(b"\nYou: ").await?;
                    output.flush().await?;

                    match lines.next_line().await? {
                        None => SessionState::Terminated,
                        Some(line) => {
                            let line = line.trim();
                            if line.is_empty() {
                                SessionState::Listening
                            } else if is_exit_keyword(line) {
                                SessionState::Terminated
                            } else {
                                SessionState::Processing(line.to_string())
                            }
                        }
                    }
                }
                SessionState::Processing(input) => {
                    output
                        .write_all(b"...calling the model for a response (this may take a sec)...\n")
                        .await?;
                    output.flush().await?;

                    let prompt = prompt::compose(&input, &self.memory);
                    let completion = self
                        .completer
                        .complete(&prompt, self.settings.temperature, self.settings.max_tokens)
                        .await;

                    if completion.is_fallback() {
                        tracing::warn!("using fallback reply");
                    }

                    let reply = completion.into_text();
                    output
                        .write_all(format!("\nAgent (text): {reply}\n").as_bytes())
                        .await?;
                    SessionState::Speaking { input, reply }
                }
                SessionState::Speaking { input, reply } => {
                    self.speak(&reply, output).await?;
                    self.memory.push(Exchange::new(input, reply));
                    turns += 1;
                    tracing::debug!(turns, remembered = self.memory.len(), "turn complete");
                    SessionState::Listening
                }
                SessionState::Terminated => {
                    output.write_all(format!("{FAREWELL}\n").as_bytes()).await?;
                    output.flush().await?;
                    return Ok(turns);
                }
            };
        }
    }

    /// Synthesize and play `text`, reporting skipped audio to the user
    async fn speak<W>(&self, text: &str, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let out_path = &self.settings.output_audio;

        let Some(path) = self.synthesizer.synthesize(text, out_path).await else {
            output
                .write_all(b"TTS failed - skipping audio playback.\n")
                .await?;
            return Ok(());
        };

        output
            .write_all(format!("Audio saved to {} - playing...\n", path.display()).as_bytes())
            .await?;
        output.flush().await?;

        if !self.player.play(&path).await {
            output
                .write_all(
                    format!("Could not auto-play audio. Open {} manually.\n", path.display())
                        .as_bytes(),
                )
                .await?;
        }

        Ok(())
    }
}
