//! Token usage accounting
//!
//! Backends report token counts with each successful response. The engine
//! forwards them to a [`UsageSink`] so hosts can surface consumption in a
//! status bar or budget view. [`UsageTracker`] is the default in-memory
//! accumulator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sink for token usage reported by completion backends
///
/// Called once per successful backend response that carries usage. Cache
/// hits never reach the sink.
pub trait UsageSink: Send + Sync {
    /// Record usage for one backend response
    fn record_usage(&self, prompt_tokens: u64, completion_tokens: u64);
}

/// Point-in-time view of accumulated usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Total prompt tokens across all recorded responses
    pub prompt_tokens: u64,
    /// Total completion tokens across all recorded responses
    pub completion_tokens: u64,
    /// Number of responses recorded
    pub responses: u64,
    /// When usage was last recorded
    pub last_recorded_at: Option<DateTime<Utc>>,
}

impl UsageSnapshot {
    /// Total tokens across prompt and completion
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Default in-memory usage accumulator
#[derive(Debug, Default)]
pub struct UsageTracker {
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    responses: AtomicU64,
    last_recorded_at: Mutex<Option<DateTime<Utc>>>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated totals
    pub fn snapshot(&self) -> UsageSnapshot {
        let last_recorded_at = self
            .last_recorded_at
            .lock()
            .map(|guard| *guard)
            .unwrap_or(None);
        UsageSnapshot {
            prompt_tokens: self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
            responses: self.responses.load(Ordering::Relaxed),
            last_recorded_at,
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.prompt_tokens.store(0, Ordering::Relaxed);
        self.completion_tokens.store(0, Ordering::Relaxed);
        self.responses.store(0, Ordering::Relaxed);
        if let Ok(mut last) = self.last_recorded_at.lock() {
            *last = None;
        }
    }
}

impl UsageSink for UsageTracker {
    fn record_usage(&self, prompt_tokens: u64, completion_tokens: u64) {
        self.prompt_tokens.fetch_add(prompt_tokens, Ordering::Relaxed);
        self.completion_tokens
            .fetch_add(completion_tokens, Ordering::Relaxed);
        self.responses.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_recorded_at.lock() {
            *last = Some(Utc::now());
        }
    }
}
