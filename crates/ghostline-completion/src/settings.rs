//! Engine configuration surface

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lower bound for the debounce delay in milliseconds
pub const MIN_DEBOUNCE_DELAY_MS: u64 = 100;
/// Upper bound for the debounce delay in milliseconds
pub const MAX_DEBOUNCE_DELAY_MS: u64 = 5000;
/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 500;

/// User-facing completion settings
///
/// The engine polls these through a [`SettingsSource`] at the start of every
/// request, so host-side changes apply to the next keystroke without any
/// restart or reload step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Whether inline completion is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Debounce delay in milliseconds, clamped to 100..=5000 at point of use
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Whether suggestion caching is enabled
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Maximum tokens forwarded to the backend, when set
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature forwarded to the backend, when set
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_enabled() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    DEFAULT_DEBOUNCE_DELAY_MS
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            delay_ms: default_delay_ms(),
            cache_enabled: default_cache_enabled(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl CompletionSettings {
    /// Debounce delay with the configured bounds applied
    pub fn effective_delay(&self) -> Duration {
        let clamped = self
            .delay_ms
            .clamp(MIN_DEBOUNCE_DELAY_MS, MAX_DEBOUNCE_DELAY_MS);
        Duration::from_millis(clamped)
    }
}

/// Live source of completion settings
///
/// Implementations must return the current values on every call; the engine
/// never caches a settings snapshot beyond a single request.
pub trait SettingsSource: Send + Sync {
    /// Current settings
    fn current(&self) -> CompletionSettings;
}

/// Fixed settings for hosts without live configuration
pub struct StaticSettings {
    settings: CompletionSettings,
}

impl StaticSettings {
    pub fn new(settings: CompletionSettings) -> Self {
        Self { settings }
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new(CompletionSettings::default())
    }
}

impl SettingsSource for StaticSettings {
    fn current(&self) -> CompletionSettings {
        self.settings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CompletionSettings::default();
        assert!(settings.enabled);
        assert!(settings.cache_enabled);
        assert_eq!(settings.delay_ms, 500);
        assert!(settings.max_tokens.is_none());
        assert!(settings.temperature.is_none());
    }

    #[test]
    fn test_effective_delay_clamps_low() {
        let settings = CompletionSettings {
            delay_ms: 10,
            ..CompletionSettings::default()
        };
        assert_eq!(settings.effective_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_effective_delay_clamps_high() {
        let settings = CompletionSettings {
            delay_ms: 60_000,
            ..CompletionSettings::default()
        };
        assert_eq!(settings.effective_delay(), Duration::from_millis(5000));
    }

    #[test]
    fn test_effective_delay_passes_in_range_values() {
        let settings = CompletionSettings {
            delay_ms: 750,
            ..CompletionSettings::default()
        };
        assert_eq!(settings.effective_delay(), Duration::from_millis(750));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: CompletionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, CompletionSettings::default());
    }

    #[test]
    fn test_partial_config_overrides_only_named_fields() {
        let settings: CompletionSettings =
            serde_json::from_str(r#"{"delay_ms": 300, "cache_enabled": false}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.delay_ms, 300);
        assert!(!settings.cache_enabled);
    }

    #[test]
    fn test_static_source_returns_fixed_values() {
        let source = StaticSettings::new(CompletionSettings {
            enabled: false,
            ..CompletionSettings::default()
        });
        assert!(!source.current().enabled);
        assert!(!source.current().enabled);
    }
}
