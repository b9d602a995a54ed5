//! Inline completion core for Ghostline
//!
//! This crate implements the editor-agnostic half of inline AI completion:
//! a regex-driven context analyzer, a per-language pattern registry, a
//! time-expiring suggestion cache, a per-key request debouncer, and the
//! engine that composes them in front of a completion backend.
//!
//! Hosts supply the other half through traits: a [`Document`] view of the
//! buffer, a [`SettingsSource`] for live configuration, and a
//! `CompletionBackend` (from `ghostline-providers`) that talks to the model.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ghostline_completion::{
//!     CompletionEngine, InlineCompletionEngine, LanguageConfigRegistry, Position,
//!     RegexContextAnalyzer, StaticSettings, TextBuffer,
//! };
//! use ghostline_providers::UsageTracker;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo(backend: Arc<dyn ghostline_providers::CompletionBackend>) {
//! let registry = Arc::new(LanguageConfigRegistry::with_builtin_languages().unwrap());
//! let engine = InlineCompletionEngine::new(
//!     backend,
//!     Arc::new(RegexContextAnalyzer::new(registry)),
//!     Arc::new(StaticSettings::default()),
//!     Arc::new(UsageTracker::new()),
//! );
//!
//! let document = TextBuffer::new("file:///demo.py", "python", "def add(a, b):\n    ");
//! let suggestions = engine
//!     .request_suggestions(&document, Position::new(1, 4), &CancellationToken::new())
//!     .await;
//! # }
//! ```

pub mod cache;
pub mod context;
pub mod debounce;
pub mod document;
pub mod engine;
pub mod format;
pub mod language;
pub mod settings;
pub mod types;

pub use cache::{request_key, CacheEntry, CacheStats, CompletionCache, DEFAULT_CACHE_TTL};
pub use context::{ContextAnalyzer, RegexContextAnalyzer, CONTEXT_WINDOW_LINES};
pub use debounce::RequestDebouncer;
pub use document::{Document, TextBuffer};
pub use engine::{CompletionEngine, InlineCompletionEngine};
pub use format::indent_continuation_lines;
pub use language::{
    builtin_patterns, ConfigFormat, ConfigLoader, LanguageConfig, LanguageConfigRegistry,
    LanguageDetector, LanguagePatterns,
};
pub use settings::{
    CompletionSettings, SettingsSource, StaticSettings, DEFAULT_DEBOUNCE_DELAY_MS,
    MAX_DEBOUNCE_DELAY_MS, MIN_DEBOUNCE_DELAY_MS,
};
pub use types::{
    ClassScope, CodeContext, CompletionError, CompletionResult, FunctionScope, LineKind, Position,
    VariableInfo, VariableScope,
};
