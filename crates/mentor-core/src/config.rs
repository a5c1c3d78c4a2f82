//! Application configuration model (`config.toml`).

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct:free";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MentorConfig {
    pub assistant: AssistantSettings,
    pub extraction: RetryPolicy,
    pub prompt: PromptSettings,
}

/// Remote completion settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssistantSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    /// Sent as `X-Title`.
    pub app_title: String,
    /// Sent as `HTTP-Referer` when set.
    pub referer: Option<String>,
    /// Environment variable consulted when no override is stored.
    pub api_key_env: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            request_timeout_secs: 60,
            app_title: "LeetCode Assistant".to_string(),
            referer: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
        }
    }
}

impl AssistantSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Bounded retry policy for page-data extraction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Factor applied to the delay after every failed attempt.
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 1500,
            backoff_multiplier: 1.5,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            retry_delay_ms,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let multiplier = if self.backoff_multiplier.is_finite() && self.backoff_multiplier >= 1.0 {
            self.backoff_multiplier
        } else {
            1.0
        };
        let scaled = self.retry_delay_ms as f64 * multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay_ms.max(self.retry_delay_ms) as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Prompt rendering settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptSettings {
    /// Characters of the problem description embedded in the system turn.
    pub description_excerpt_chars: usize,
    /// Replaces the built-in greeting. Rendered with `title` and `difficulty`.
    pub welcome_template: Option<String>,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            description_excerpt_chars: 500,
            welcome_template: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            retry_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 3000,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(3000));
        assert_eq!(policy.delay_after(4), Duration::from_millis(3000));
    }

    #[test]
    fn test_shrinking_multiplier_is_ignored() {
        let policy = RetryPolicy {
            backoff_multiplier: 0.1,
            ..RetryPolicy::new(3, 500)
        };
        assert_eq!(policy.delay_after(3), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MentorConfig = toml::from_str(
            r#"
            [assistant]
            model = "openai/gpt-4o-mini"

            [extraction]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.assistant.model, "openai/gpt-4o-mini");
        assert_eq!(config.assistant.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.extraction.max_attempts, 5);
        assert_eq!(config.extraction.retry_delay_ms, 1500);
        assert_eq!(config.prompt.description_excerpt_chars, 500);
        assert_eq!(config.prompt.welcome_template, None);
    }
}
