// Configuration structs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::*;
use crate::errors::ConfigurationError;

/// Completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Loop bound and stop signal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementSettings {
    /// Reviewer/generator rounds after the seed draft (0 = seed only)
    pub max_iterations: usize,
    /// Literal the reviewer emits when the draft is final
    pub termination_marker: String,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            termination_marker: DEFAULT_TERMINATION_MARKER.to_string(),
        }
    }
}

/// Retry around individual completion calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts per call, including the first (1 = fail fast)
    pub max_attempts: u32,
    /// First back-off delay in milliseconds
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

/// Optional persona template overrides. Each must contain `{{$input}}` exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleTemplates {
    pub generator: Option<String>,
    pub reviewer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Provider credential, taken from the environment only
    pub api_key: String,
    pub provider: ProviderSettings,
    pub refinement: RefinementSettings,
    pub retry: RetrySettings,
    pub roles: RoleTemplates,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: ProviderSettings::default(),
            refinement: RefinementSettings::default(),
            retry: RetrySettings::default(),
            roles: RoleTemplates::default(),
        }
    }

    /// Reject values that would make a run meaningless.
    ///
    /// Role templates are validated later, when the role specs are built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential {
                var: API_KEY_ENV.to_string(),
            });
        }
        if self.refinement.termination_marker.is_empty() {
            return Err(invalid("refinement.termination_marker", "must not be empty"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(invalid("provider.base_url", "must not be empty"));
        }
        if self.provider.model.trim().is_empty() {
            return Err(invalid("provider.model", "must not be empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(invalid("provider.timeout_secs", "must be at least 1"));
        }
        if self.provider.max_tokens == 0 {
            return Err(invalid("provider.max_tokens", "must be at least 1"));
        }
        if let Some(t) = self.provider.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(invalid("provider.temperature", "must be between 0.0 and 2.0"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
