// Role functions - a persona template bound to a completion provider

use async_trait::async_trait;
use std::sync::Arc;

use super::template::RoleSpec;
use super::Role;
use crate::config::ProviderSettings;
use crate::errors::CompletionError;
use crate::providers::{LlmProvider, Message, ProviderRequest};

/// Stateless text-to-text transformation backed by one completion call per run.
#[derive(Clone)]
pub struct RoleFunction {
    spec: RoleSpec,
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl RoleFunction {
    pub fn new(spec: RoleSpec, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            spec,
            provider,
            model: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Bind with the model, token limit and temperature from the `[provider]` section.
    pub fn from_settings(spec: RoleSpec, provider: Arc<dyn LlmProvider>, settings: &ProviderSettings) -> Self {
        let role = Self::new(spec, provider)
            .with_model(settings.model.clone())
            .with_max_tokens(settings.max_tokens);
        match settings.temperature {
            Some(temperature) => role.with_temperature(temperature),
            None => role,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn spec(&self) -> &RoleSpec {
        &self.spec
    }

    fn build_request(&self, input: &str) -> ProviderRequest {
        let mut request = ProviderRequest::new(vec![Message::user(self.spec.render(input))]);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

#[async_trait]
impl Role for RoleFunction {
    fn name(&self) -> &str {
        self.spec.name()
    }

    async fn run(&self, input: &str) -> Result<String, CompletionError> {
        let request = self.build_request(input);

        tracing::debug!(
            role = self.spec.name(),
            provider = self.provider.name(),
            input_chars = input.len(),
            "Invoking role"
        );

        let response = self
            .provider
            .send_message(&request)
            .await
            .map_err(|source| CompletionError::Request {
                role: self.spec.name().to_string(),
                source,
            })?;

        if response.text.trim().is_empty() {
            return Err(CompletionError::Empty {
                role: self.spec.name().to_string(),
            });
        }

        Ok(response.text)
    }
}
