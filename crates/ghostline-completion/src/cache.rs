//! Time-expiring suggestion cache
//!
//! Keys embed the document identity, cursor position, and the exact typed
//! prefix, so any edit produces a fresh key and old entries are never reused.
//! Expired entries are therefore swept actively (on write, and lazily on
//! read) instead of waiting for key collisions that will never come.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

/// How long a cached suggestion stays servable
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(30_000);

/// One cached suggestion
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub suggestion_text: String,
    pub created_at: Instant,
    /// The prompt context the suggestion was produced from
    pub context_snapshot: String,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// Counter snapshot for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded, time-expiring store of completion suggestions
///
/// Thread-safe; the inner map is guarded by a `Mutex` held only for short
/// synchronous sections.
pub struct CompletionCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    /// Cache with a custom time-to-live
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Bound the store; at capacity the oldest entry is evicted first
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Live suggestion for a key
    ///
    /// An expired entry found on read is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.suggestion_text.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a suggestion, sweeping expired entries first
    pub fn insert(&self, key: &str, suggestion: &str, context_snapshot: &str) {
        let ttl = self.ttl;
        let mut entries = self.lock_entries();
        entries.retain(|_, entry| !entry.is_expired(ttl));

        if let Some(max) = self.max_entries {
            if !entries.contains_key(key) {
                while entries.len() >= max {
                    let oldest = entries
                        .iter()
                        .min_by_key(|(_, entry)| entry.created_at)
                        .map(|(key, _)| key.clone());
                    match oldest {
                        Some(oldest_key) => {
                            entries.remove(&oldest_key);
                            self.evictions.fetch_add(1, Ordering::Relaxed);
                            debug!("Completion cache at capacity, evicted oldest entry");
                        }
                        None => break,
                    }
                }
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                suggestion_text: suggestion.to_string(),
                created_at: Instant::now(),
                context_snapshot: context_snapshot.to_string(),
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(ttl));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for CompletionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache key for a completion request
///
/// The typed prefix is part of the key, so any keystroke on the current line
/// produces a fresh key and stale suggestions are never served for it.
pub fn request_key(uri: &str, line: u32, character: u32, prefix: &str) -> String {
    format!("{}:{}:{}:{}", uri, line, character, prefix)
}
