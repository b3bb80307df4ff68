//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use riverwood_agent::{Completer, Completion, Player, Synthesizer};
use secrecy::SecretString;

/// Secret for test clients
#[must_use]
pub fn test_key() -> SecretString {
    SecretString::from("test-key".to_string())
}

/// Completer returning scripted replies and recording every prompt
#[derive(Clone, Default)]
pub struct ScriptedCompleter {
    replies: Arc<Mutex<VecDeque<Completion>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedCompleter {
    pub fn new(replies: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            prompts: Arc::default(),
        }
    }

    /// Replies "a1", "a2", ... for `n` turns
    pub fn numbered(n: usize) -> Self {
        Self::new((1..=n).map(|i| Completion::Reply(format!("a{i}"))))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(&self, prompt: &str, _temperature: f32, _max_tokens: u32) -> Completion {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Completion::Reply("ok".to_string()))
    }
}

/// Synthesizer that either "succeeds" without network or always fails
#[derive(Clone, Default)]
pub struct FakeSynthesizer {
    pub fail: bool,
    pub texts: Arc<Mutex<Vec<String>>>,
}

impl FakeSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            texts: Arc::default(),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, out_path: &Path) -> Option<PathBuf> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail {
            None
        } else {
            Some(std::path::absolute(out_path).unwrap())
        }
    }
}

/// Player that records played paths and reports a fixed outcome
#[derive(Clone)]
pub struct FakePlayer {
    pub succeed: bool,
    pub played: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakePlayer {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed,
            played: Arc::default(),
        }
    }

    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl Player for FakePlayer {
    async fn play(&self, path: &Path) -> bool {
        self.played.lock().unwrap().push(path.to_path_buf());
        self.succeed
    }
}
