//! Input debouncing
//!
//! Coalesces rapid keystrokes into a single signal once the input has been
//! quiet for the configured delay. The debouncer only keeps state; the caller
//! waits on [`QueryDebouncer::deadline`] and then calls
//! [`QueryDebouncer::poll_ready`].

use crate::suggest::is_queryable;
use std::time::Duration;
use tokio::time::Instant;

/// What settled input turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceSignal {
    /// Long enough to look up; carries the raw text
    Commit(String),
    /// Empty or below the minimum length; clear the panel
    Suppressed,
}

#[derive(Debug)]
pub struct QueryDebouncer {
    pub delay: Duration,
    pub min_chars: usize,
    pending: Option<String>,
    last_input: Option<Instant>,
}

impl QueryDebouncer {
    pub fn new(delay: Duration, min_chars: usize) -> Self {
        Self {
            delay,
            min_chars,
            pending: None,
            last_input: None,
        }
    }

    /// Record a keystroke, replacing any pending text and restarting the timer
    pub fn input(&mut self, raw: &str) {
        self.input_at(raw, Instant::now());
    }

    pub fn input_at(&mut self, raw: &str, now: Instant) {
        self.pending = Some(raw.to_string());
        self.last_input = Some(now);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_input = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending input settles, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_input.map(|t| t + self.delay)
    }

    /// Take the settled input once the delay has elapsed since the last keystroke
    pub fn poll_ready(&mut self, now: Instant) -> Option<DebounceSignal> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let raw = self.pending.take()?;
        self.last_input = None;

        if is_queryable(&raw, self.min_chars) {
            Some(DebounceSignal::Commit(raw))
        } else {
            Some(DebounceSignal::Suppressed)
        }
    }
}
