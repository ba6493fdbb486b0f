// Role persona templates

use crate::config::constants::INPUT_PLACEHOLDER;
use crate::errors::ConfigurationError;

/// An immutable persona prompt with exactly one `{{$input}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    name: String,
    template: String,
}

impl RoleSpec {
    /// Build a role spec, rejecting templates without exactly one placeholder.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let template = template.into();
        let placeholders = template.matches(INPUT_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ConfigurationError::InvalidTemplate {
                role: name,
                placeholders,
            });
        }
        Ok(Self { name, template })
    }

    /// The generator persona: writes a short news article from a topic or from editor feedback.
    pub fn reporter() -> Self {
        Self {
            name: "reporter".to_string(),
            template: format!(
                "You are a helpful AI assistant that writes news articles based on the given topic: \
                 {INPUT_PLACEHOLDER}. Keep the article short."
            ),
        }
    }

    /// The reviewer persona: polishes a draft and appends `marker` once it is final.
    ///
    /// Fails only if `marker` itself contains the input placeholder.
    pub fn editor(marker: &str) -> Result<Self, ConfigurationError> {
        Self::new(
            "editor",
            format!(
                "You are a helpful AI assistant that rewrites and refines the news article for \
                 clarity, grammar, tone, and style. Your task is to produce a polished final draft \
                 based on the text: {INPUT_PLACEHOLDER}. If this is the final draft, include the \
                 message '{marker}' at the end."
            ),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute `input` for the placeholder. The input is inserted verbatim and not re-scanned.
    pub fn render(&self, input: &str) -> String {
        self.template.replacen(INPUT_PLACEHOLDER, input, 1)
    }
}
