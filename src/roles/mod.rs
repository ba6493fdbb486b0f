// Roles - the generator (reporter) and reviewer (editor) personas
//
// A role is a fixed prompt template bound to a completion provider. Roles keep
// no state between calls, so the same instance is reused for every iteration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::{CompletionError, ConfigurationError};
use crate::providers::LlmProvider;

pub mod function;
pub mod template;

pub use function::RoleFunction;
pub use template::RoleSpec;

/// One text-to-text operation backed by exactly one completion call.
#[async_trait]
pub trait Role: Send + Sync {
    /// Name used in logs, transcripts and errors
    fn name(&self) -> &str;

    /// Transform `input` into a new draft
    async fn run(&self, input: &str) -> Result<String, CompletionError>;
}

/// The two roles of a run
pub struct RolePair {
    pub generator: RoleFunction,
    pub reviewer: RoleFunction,
}

/// Build both roles from config, applying any template overrides.
pub fn build_roles(config: &Config, provider: Arc<dyn LlmProvider>) -> Result<RolePair, ConfigurationError> {
    let generator_spec = match &config.roles.generator {
        Some(template) => RoleSpec::new("reporter", template.clone())?,
        None => RoleSpec::reporter(),
    };
    let reviewer_spec = match &config.roles.reviewer {
        Some(template) => RoleSpec::new("editor", template.clone())?,
        None => RoleSpec::editor(&config.refinement.termination_marker)?,
    };

    Ok(RolePair {
        generator: RoleFunction::from_settings(generator_spec, provider.clone(), &config.provider),
        reviewer: RoleFunction::from_settings(reviewer_spec, provider, &config.provider),
    })
}
