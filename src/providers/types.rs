// Request/response types shared by providers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Provider-agnostic request
///
/// Each provider transforms this into its own wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// Conversation messages
    pub messages: Vec<Message>,

    /// Model name; empty means the provider's default
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Create a new request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(), // Will be set by provider
            max_tokens: crate::config::constants::DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Provider-agnostic response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderResponse {
    /// Response ID (provider-specific)
    pub id: String,

    /// Model that generated the response
    pub model: String,

    /// Generated text; empty when the provider returned no content
    pub text: String,

    /// Why the model stopped generating
    pub stop_reason: Option<String>,

    /// Provider name (e.g., "openai")
    pub provider: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_request_defaults() {
        let req = ProviderRequest::new(vec![Message::user("Hello")]);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.model, "");
        assert_eq!(req.max_tokens, 2048);
        assert!(req.temperature.is_none());
    }

    #[test]
    fn test_provider_request_builder_chain() {
        let req = ProviderRequest::new(vec![Message::user("Hello")])
            .with_model("gpt-4o-mini")
            .with_max_tokens(512)
            .with_temperature(0.2);

        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.max_tokens, 512);
        assert_eq!(req.temperature, Some(0.2));
    }

    #[test]
    fn test_user_message() {
        let message = Message::user("a");
        assert_eq!(message.role, "user");
        assert_eq!(message.content, "a");
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let req = ProviderRequest::new(vec![Message::user("x")]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
    }
}
