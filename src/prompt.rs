//! Prompt composition for the completion service
//!
//! The prompt is plain text: persona, an optional transcript of recent
//! exchanges, then the new user message and an empty assistant turn.

use std::fmt::Write as _;

use crate::agent::Memory;

/// Persona instruction placed at the top of every prompt
pub const PERSONA: &str = "You are Riverwood AI, a warm, friendly real-estate voice assistant. \
Greet politely, use casual Hindi/English phrases occasionally (e.g., 'Namaste Sir, chai pee li?'), \
and provide short concise updates. Keep tone warm and slightly local.";

/// Header for the transcript block
pub const TRANSCRIPT_HEADER: &str = "Previous brief conversation:";

/// Instruction prepended to the retry prompt
pub const FALLBACK_INSTRUCTION: &str = "Please respond politely and briefly to this user message:";

/// Characters of the original prompt carried into the retry prompt
pub const FALLBACK_TAIL_CHARS: usize = 1000;

/// Compose the prompt for a new user message using the default persona
#[must_use]
pub fn compose(user_message: &str, memory: &Memory) -> String {
    compose_with_persona(PERSONA, user_message, memory)
}

/// Compose a prompt with a custom persona instruction
#[must_use]
pub fn compose_with_persona(persona: &str, user_message: &str, memory: &Memory) -> String {
    let mut prompt = String::with_capacity(persona.len() + user_message.len() + 64);
    prompt.push_str(persona);
    prompt.push('\n');

    if !memory.is_empty() {
        prompt.push_str(TRANSCRIPT_HEADER);
        prompt.push('\n');
        for exchange in memory {
            // Writing to a String cannot fail
            let _ = writeln!(prompt, "User: {}", exchange.user());
            let _ = writeln!(prompt, "Assistant: {}", exchange.assistant());
        }
        prompt.push('\n');
    }

    let _ = write!(prompt, "User: {user_message}\nAssistant:");
    prompt
}

/// Build the retry prompt from the tail of a prompt that produced no text
#[must_use]
pub fn fallback_prompt(prompt: &str) -> String {
    format!("{FALLBACK_INSTRUCTION}\n{}", tail_chars(prompt, FALLBACK_TAIL_CHARS))
}

/// Last `n` characters of `s`, never splitting a multi-byte character
fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    let start = s
        .char_indices()
        .nth(count - n)
        .map_or(0, |(idx, _)| idx);
    &s[start..]
}
