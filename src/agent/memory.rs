//! Bounded conversation memory
//!
//! Keeps the most recent exchanges, oldest first, capped at a fixed window.

use std::collections::VecDeque;

/// One user message and the assistant reply it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    user: String,
    assistant: String,
}

impl Exchange {
    /// Create an exchange
    #[must_use]
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn assistant(&self) -> &str {
        &self.assistant
    }
}

/// Sliding window of the most recent exchanges
///
/// Invariant: `len() <= window()` at all times.
#[derive(Debug, Clone)]
pub struct Memory {
    window: usize,
    exchanges: VecDeque<Exchange>,
}

impl Memory {
    /// Create an empty memory holding at most `window` exchanges
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            exchanges: VecDeque::new(),
        }
    }

    /// Append an exchange, discarding the oldest ones beyond the window
    pub fn push(&mut self, exchange: Exchange) {
        self.exchanges.push_back(exchange);
        while self.exchanges.len() > self.window {
            self.exchanges.pop_front();
        }
    }

    /// Exchanges in chronological order (oldest first)
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Maximum number of exchanges retained
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a Exchange;
    type IntoIter = std::collections::vec_deque::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.exchanges.iter()
    }
}
