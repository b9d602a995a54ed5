//! Data models for completion backends

use serde::{Deserialize, Serialize};

/// A single inline completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Text already typed on the current line, up to the cursor
    pub prompt: String,
    /// Language identifier (e.g. "python", "typescript")
    pub language: String,
    /// Surrounding source lines joined with newlines
    pub context: String,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a request with no token or temperature overrides
    pub fn new(prompt: String, language: String, context: String) -> Self {
        Self {
            prompt,
            language,
            context,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Backend response for a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated suggestion text
    pub text: String,
    /// Model that produced the suggestion
    pub model: Option<String>,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a response carrying only suggestion text
    pub fn new(text: String) -> Self {
        Self {
            text,
            model: None,
            usage: None,
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u64,
    /// Number of tokens in the completion
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Total tokens used
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 48);
        assert_eq!(usage.total(), 168);
    }

    #[test]
    fn test_request_defaults_leave_overrides_unset() {
        let request = CompletionRequest::new(
            "let x = ".to_string(),
            "typescript".to_string(),
            "function main() {".to_string(),
        );
        assert!(request.max_tokens.is_none());
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_response_deserializes_without_usage() {
        let json = r#"{"text": "return total", "model": null, "usage": null}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text, "return total");
        assert!(response.usage.is_none());
    }
}
