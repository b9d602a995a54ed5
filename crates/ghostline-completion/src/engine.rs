//! Completion request pipeline
//!
//! `InlineCompletionEngine` ties the pieces together: settings gate the
//! request, the analyzer snapshots the context, the cache answers repeats,
//! and the debouncer holds the backend call until typing pauses. The caller
//! contract is suggestions or nothing; backend failures are logged and
//! swallowed, never surfaced.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ghostline_providers::{CompletionBackend, CompletionRequest, UsageSink};

use crate::cache::{request_key, CacheStats, CompletionCache};
use crate::context::ContextAnalyzer;
use crate::debounce::RequestDebouncer;
use crate::document::Document;
use crate::format::indent_continuation_lines;
use crate::settings::SettingsSource;
use crate::types::{CodeContext, Position};

/// Produces editor-ready suggestions for a cursor position
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// Returns suggestion strings ranked by arrival order, or empty
    ///
    /// Never returns an error; disabled configuration, cancellation, backend
    /// failures, and empty prompts all resolve to an empty list.
    async fn request_suggestions(
        &self,
        document: &dyn Document,
        position: Position,
        token: &CancellationToken,
    ) -> Vec<String>;
}

/// Production pipeline: settings gate, cache, debounce, backend call
pub struct InlineCompletionEngine {
    backend: Arc<dyn CompletionBackend>,
    analyzer: Arc<dyn ContextAnalyzer>,
    settings: Arc<dyn SettingsSource>,
    usage: Arc<dyn UsageSink>,
    cache: Arc<CompletionCache>,
    debouncer: RequestDebouncer,
}

impl InlineCompletionEngine {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        analyzer: Arc<dyn ContextAnalyzer>,
        settings: Arc<dyn SettingsSource>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        Self::with_cache(backend, analyzer, settings, usage, CompletionCache::new())
    }

    /// Engine with a caller-provided cache (custom TTL or capacity)
    pub fn with_cache(
        backend: Arc<dyn CompletionBackend>,
        analyzer: Arc<dyn ContextAnalyzer>,
        settings: Arc<dyn SettingsSource>,
        usage: Arc<dyn UsageSink>,
        cache: CompletionCache,
    ) -> Self {
        Self {
            backend,
            analyzer,
            settings,
            usage,
            cache: Arc::new(cache),
            debouncer: RequestDebouncer::new(),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Scheduled executions not yet fired or finished
    pub fn pending_requests(&self) -> usize {
        self.debouncer.pending_count()
    }

    /// Cancel every scheduled execution, for host teardown
    pub fn shutdown(&self) {
        self.debouncer.cancel_all();
    }
}

#[async_trait]
impl CompletionEngine for InlineCompletionEngine {
    async fn request_suggestions(
        &self,
        document: &dyn Document,
        position: Position,
        token: &CancellationToken,
    ) -> Vec<String> {
        let settings = self.settings.current();
        if !settings.enabled {
            debug!("Inline completion disabled, skipping request");
            return Vec::new();
        }
        if token.is_cancelled() {
            debug!("Completion request cancelled before analysis");
            return Vec::new();
        }

        // One snapshot per request. The snapshot taken by the last request
        // for a key is the one its fired execution sends to the backend.
        let context = self.analyzer.analyze(document, position);
        let key = request_key(
            document.uri(),
            position.line,
            position.character,
            &context.current_line_prefix,
        );

        if settings.cache_enabled {
            if let Some(text) = self.cache.get(&key) {
                debug!("Serving completion from cache for key {}", key);
                return vec![indent_continuation_lines(&text, &context.indentation)];
            }
        }

        let job = FetchJob {
            backend: self.backend.clone(),
            cache: self.cache.clone(),
            usage: self.usage.clone(),
            key: key.clone(),
            context,
            cache_enabled: settings.cache_enabled,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            token: token.clone(),
        };
        let receiver = self
            .debouncer
            .schedule(&key, settings.effective_delay(), job.run());

        tokio::select! {
            _ = token.cancelled() => {
                debug!("Completion request cancelled while pending");
                Vec::new()
            }
            result = receiver => result.unwrap_or_default(),
        }
    }
}

/// One debounced backend fetch, owning everything it needs to outlive the
/// request that scheduled it
struct FetchJob {
    backend: Arc<dyn CompletionBackend>,
    cache: Arc<CompletionCache>,
    usage: Arc<dyn UsageSink>,
    key: String,
    context: CodeContext,
    cache_enabled: bool,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    token: CancellationToken,
}

impl FetchJob {
    async fn run(self) -> Vec<String> {
        if self.token.is_cancelled() {
            debug!("Completion fetch cancelled before backend call");
            return Vec::new();
        }

        let prompt = self.context.current_line_prefix.clone();
        if prompt.trim().is_empty() {
            debug!("Empty completion prompt, skipping backend call");
            return Vec::new();
        }

        let prompt_context = build_prompt_context(&self.context);
        let request = CompletionRequest {
            prompt,
            language: self.context.language.clone(),
            context: prompt_context.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let started = Instant::now();
        let response = match self.backend.complete(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "Completion backend {} failed after {}ms: {}",
                    self.backend.id(),
                    started.elapsed().as_millis(),
                    err
                );
                return Vec::new();
            }
        };

        // A result arriving after cancellation is dropped without touching
        // the cache or the usage counters.
        if self.token.is_cancelled() {
            debug!("Completion result dropped after cancellation");
            return Vec::new();
        }

        if response.text.is_empty() {
            debug!(
                "Completion backend {} returned empty text",
                self.backend.id()
            );
            return Vec::new();
        }

        if let Some(usage) = response.usage {
            self.usage
                .record_usage(usage.prompt_tokens, usage.completion_tokens);
        }

        if self.cache_enabled {
            self.cache.insert(&self.key, &response.text, &prompt_context);
        }

        debug!(
            "Completion backend {} answered in {}ms for language {}",
            self.backend.id(),
            started.elapsed().as_millis(),
            self.context.language
        );

        vec![indent_continuation_lines(
            &response.text,
            &self.context.indentation,
        )]
    }
}

/// Surrounding lines joined into the prompt context block
fn build_prompt_context(context: &CodeContext) -> String {
    context
        .preceding_lines
        .iter()
        .chain(context.following_lines.iter())
        .cloned()
        .collect::<Vec<String>>()
        .join("\n")
}
