//! Completion backend trait

use async_trait::async_trait;

use crate::{
    error::BackendError,
    models::{CompletionRequest, CompletionResponse},
};

/// Core trait that all completion backends must implement
///
/// A backend owns its transport, authentication, retry policy, and timeouts.
/// Callers treat it as opaque: one request in, one response or typed failure
/// out. Implementations must be safe to call concurrently.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Get the backend's unique identifier
    fn id(&self) -> &str;

    /// Send a completion request
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock backend for testing
    struct EchoBackend;

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        fn id(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, BackendError> {
            Ok(CompletionResponse::new(request.prompt))
        }
    }

    #[tokio::test]
    async fn test_backend_is_object_safe() {
        let backend: std::sync::Arc<dyn CompletionBackend> = std::sync::Arc::new(EchoBackend);
        assert_eq!(backend.id(), "echo");

        let response = backend
            .complete(CompletionRequest::new(
                "let x = ".to_string(),
                "rust".to_string(),
                String::new(),
            ))
            .await
            .unwrap();
        assert_eq!(response.text, "let x = ");
    }
}
