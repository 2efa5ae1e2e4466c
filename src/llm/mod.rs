//! LLM client abstraction.
//!
//! The advisor only needs free-text replies, so the provider surface is a
//! single completion call with an optional system prompt.

mod openai;

pub use openai::OpenAiClient;

use crate::Result;
use crate::config::{LlmBackend, LlmConfig};
use std::sync::Arc;
use std::time::Duration;

/// Trait for LLM providers.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates a completion with a system prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    ///
    /// Default implementation concatenates system and user prompts.
    /// Providers should override this to use native system prompt support.
    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        let combined = format!("{system}\n\n---\n\nUser message:\n{user}");
        self.complete(&combined)
    }
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl LlmHttpConfig {
    /// Takes timeouts from LLM settings.
    #[must_use]
    pub const fn from_config(config: &LlmConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Builds the configured provider, or `None` when replies should be heuristic.
///
/// A provider that is selected but has no API key is treated as disabled.
#[must_use]
pub fn provider_from_config(config: &LlmConfig) -> Option<Arc<dyn LlmProvider>> {
    match config.provider {
        LlmBackend::None => None,
        LlmBackend::OpenAi if config.is_enabled() => {
            Some(Arc::new(OpenAiClient::from_config(config)))
        },
        LlmBackend::OpenAi => {
            tracing::warn!("No OpenAI API key configured; using heuristic replies");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_http_config_from_settings() {
        let config = LlmConfig {
            timeout_ms: 1_500,
            connect_timeout_ms: 250,
            ..LlmConfig::default()
        };
        let http = LlmHttpConfig::from_config(&config);
        assert_eq!(http.timeout_ms, 1_500);
        assert_eq!(http.connect_timeout_ms, 250);
    }

    #[test]
    fn test_provider_requires_key() {
        let config = LlmConfig::default();
        assert!(provider_from_config(&config).is_none());

        let config = LlmConfig {
            api_key: Some(SecretString::from("sk-test".to_string())),
            ..LlmConfig::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_provider_none_backend() {
        let config = LlmConfig {
            provider: LlmBackend::None,
            api_key: Some(SecretString::from("sk-test".to_string())),
            ..LlmConfig::default()
        };
        assert!(provider_from_config(&config).is_none());
    }

    struct Echo;

    impl LlmProvider for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn complete(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_default_complete_with_system_combines_prompts() {
        let reply = Echo.complete_with_system("SYSTEM", "hello").unwrap();
        assert!(reply.starts_with("SYSTEM"));
        assert!(reply.ends_with("User message:\nhello"));
    }
}
