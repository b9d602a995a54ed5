//! Completion backend abstraction for Ghostline
//!
//! This crate defines the seam between the completion engine and whatever
//! large-language-model API serves suggestions. The engine only ever sees:
//!
//! - [`CompletionBackend`]: one async call, [`CompletionRequest`] in,
//!   [`CompletionResponse`] or [`BackendError`] out
//! - [`UsageSink`]: token accounting for successful responses
//!
//! Transport, request encoding, authentication, and vendor-specific response
//! shapes all live behind `CompletionBackend` implementations, which are
//! supplied by the host. [`UsageTracker`] is provided as the default
//! in-memory sink.

pub mod backend;
pub mod error;
pub mod models;
pub mod usage;

pub use backend::CompletionBackend;
pub use error::BackendError;
pub use models::{CompletionRequest, CompletionResponse, TokenUsage};
pub use usage::{UsageSink, UsageSnapshot, UsageTracker};
