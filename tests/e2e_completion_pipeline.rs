//! End-to-end tests for the inline completion pipeline
//!
//! Assembles the real engine, analyzer, registry, cache, and usage tracker
//! against scripted backends the way an editor host would, then drives
//! keystroke-level scenarios through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use ghostline_completion::{
    CompletionEngine, CompletionSettings, InlineCompletionEngine, LanguageConfigRegistry, Position,
    RegexContextAnalyzer, StaticSettings, TextBuffer,
};
use ghostline_providers::{
    BackendError, CompletionBackend, CompletionRequest, CompletionResponse, TokenUsage,
    UsageTracker,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Backend that records the prompts it is asked to complete
struct ScriptedBackend {
    prompts: Mutex<Vec<String>>,
    text: String,
    usage: Option<TokenUsage>,
}

impl ScriptedBackend {
    fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            text: text.to_string(),
            usage: None,
        })
    }

    fn with_usage(text: &str, usage: TokenUsage) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            text: text.to_string(),
            usage: Some(usage),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        self.prompts.lock().unwrap().push(request.prompt);
        let mut response = CompletionResponse::new(self.text.clone());
        response.model = Some("scripted-model".to_string());
        response.usage = self.usage;
        Ok(response)
    }
}

/// Backend that is currently unreachable
struct OutageBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionBackend for OutageBackend {
    fn id(&self) -> &str {
        "outage"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::RateLimited(30))
    }
}

struct Host {
    engine: InlineCompletionEngine,
    usage: Arc<UsageTracker>,
}

fn build_host(backend: Arc<dyn CompletionBackend>, settings: CompletionSettings) -> Result<Host> {
    let registry = LanguageConfigRegistry::with_builtin_languages()?;
    let usage = Arc::new(UsageTracker::new());
    let engine = InlineCompletionEngine::new(
        backend,
        Arc::new(RegexContextAnalyzer::new(Arc::new(registry))),
        Arc::new(StaticSettings::new(settings)),
        usage.clone(),
    );
    Ok(Host { engine, usage })
}

fn python_buffer(body_line: &str) -> TextBuffer {
    TextBuffer::new(
        "file:///add.py",
        "python",
        &format!("def add(a, b):\n{}", body_line),
    )
}

/// A burst of keystrokes, each cancelling the previous request the way an
/// editor does, reaches the backend exactly once with the final prefix.
#[tokio::test]
async fn test_typing_burst_reaches_backend_once() -> Result<()> {
    init_tracing();
    let backend = ScriptedBackend::with_usage("al = a + b", TokenUsage::new(12, 4));
    let settings = CompletionSettings {
        delay_ms: 150,
        ..CompletionSettings::default()
    };
    let host = Arc::new(build_host(backend.clone(), settings)?);

    let token1 = CancellationToken::new();
    let task_token1 = token1.clone();
    let host1 = host.clone();
    let request1 = tokio::spawn(async move {
        let document = python_buffer("    t");
        host1
            .engine
            .request_suggestions(&document, Position::new(1, 5), &task_token1)
            .await
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    token1.cancel();
    let token2 = CancellationToken::new();
    let task_token2 = token2.clone();
    let host2 = host.clone();
    let request2 = tokio::spawn(async move {
        let document = python_buffer("    to");
        host2
            .engine
            .request_suggestions(&document, Position::new(1, 6), &task_token2)
            .await
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    token2.cancel();
    let token3 = CancellationToken::new();
    let host3 = host.clone();
    let request3 = tokio::spawn(async move {
        let document = python_buffer("    tot");
        host3
            .engine
            .request_suggestions(&document, Position::new(1, 7), &token3)
            .await
    });

    assert!(request1.await?.is_empty());
    assert!(request2.await?.is_empty());
    assert_eq!(request3.await?, vec!["al = a + b".to_string()]);

    // Only the final keystroke's prompt ever reached the backend.
    assert_eq!(backend.prompts(), vec!["    tot".to_string()]);

    let usage = host.usage.snapshot();
    assert_eq!(usage.responses, 1);
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, 4);
    Ok(())
}

/// A full round trip: analysis, backend call, usage accounting, caching,
/// and multi-line re-indentation, then a cache hit on the identical request.
#[tokio::test]
async fn test_suggestion_round_trip_with_cache_and_usage() -> Result<()> {
    init_tracing();
    let backend = ScriptedBackend::with_usage("urn total\nprint(total)", TokenUsage::new(18, 6));
    let settings = CompletionSettings {
        delay_ms: 100,
        ..CompletionSettings::default()
    };
    let host = build_host(backend.clone(), settings)?;

    let document = TextBuffer::new(
        "file:///add.py",
        "python",
        "def add(a, b):\n    total = a + b\n    ret",
    );
    let position = Position::new(2, 7);
    let token = CancellationToken::new();

    let first = host
        .engine
        .request_suggestions(&document, position, &token)
        .await;
    assert_eq!(first, vec!["urn total\n    print(total)".to_string()]);

    let second = host
        .engine
        .request_suggestions(&document, position, &token)
        .await;
    assert_eq!(second, first);

    assert_eq!(backend.prompts(), vec!["    ret".to_string()]);
    assert_eq!(host.engine.cache_stats().hits, 1);

    let usage = host.usage.snapshot();
    assert_eq!(usage.responses, 1);
    assert_eq!(usage.prompt_tokens, 18);
    assert_eq!(usage.completion_tokens, 6);
    assert!(usage.last_recorded_at.is_some());
    Ok(())
}

/// Disabled configuration and backend outages both degrade to empty
/// suggestion lists without panics or stray accounting.
#[tokio::test]
async fn test_host_degrades_gracefully() -> Result<()> {
    init_tracing();

    let backend = ScriptedBackend::returning("never");
    // Hosts hand settings over as JSON; absent fields take their defaults.
    let disabled: CompletionSettings = serde_json::from_str(r#"{ "enabled": false }"#)?;
    assert_eq!(disabled.delay_ms, 500);
    let host = build_host(backend.clone(), disabled)?;
    let document = python_buffer("    ret");
    let suggestions = host
        .engine
        .request_suggestions(&document, Position::new(1, 7), &CancellationToken::new())
        .await;
    assert!(suggestions.is_empty());
    assert!(backend.prompts().is_empty());

    let failing = Arc::new(OutageBackend {
        calls: AtomicUsize::new(0),
    });
    let settings = CompletionSettings {
        delay_ms: 100,
        ..CompletionSettings::default()
    };
    let host = build_host(failing.clone(), settings)?;
    let suggestions = host
        .engine
        .request_suggestions(&document, Position::new(1, 7), &CancellationToken::new())
        .await;
    assert!(suggestions.is_empty());
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    assert_eq!(host.usage.snapshot().responses, 0);
    Ok(())
}
