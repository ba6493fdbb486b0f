// Error taxonomy
//
// ConfigurationError is fatal before any completion call is made.
// CompletionError describes one failed role invocation.
// RefineError is what a run returns when it does not reach a terminal state;
// it always carries the last good draft so nothing is silently dropped.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Startup-time configuration problems.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{var} is not set (or is empty); export it before running")]
    MissingCredential { var: String },

    #[error("{role} template must contain exactly one {{{{$input}}}} placeholder (found {placeholders})")]
    InvalidTemplate { role: String, placeholders: usize },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A single completion call made on behalf of a role failed.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{role} completion request failed")]
    Request {
        role: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{role} returned an empty completion")]
    Empty { role: String },
}

impl CompletionError {
    pub fn role(&self) -> &str {
        match self {
            CompletionError::Request { role, .. } | CompletionError::Empty { role } => role,
        }
    }
}

/// Where in the run a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Seed,
    /// `iteration` is 1-based, matching the transcript labels.
    Review { iteration: usize },
    Regenerate { iteration: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Seed => write!(f, "seed generation"),
            Stage::Review { iteration } => write!(f, "review (iteration {iteration})"),
            Stage::Regenerate { iteration } => write!(f, "regeneration (iteration {iteration})"),
        }
    }
}

/// A refinement run that ended without reaching a terminal state.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("{stage} failed")]
    Completion {
        stage: Stage,
        #[source]
        source: CompletionError,
        last_draft: Option<String>,
    },

    #[error("run cancelled during {stage}")]
    Cancelled {
        stage: Stage,
        last_draft: Option<String>,
    },
}

impl RefineError {
    pub fn stage(&self) -> Stage {
        match self {
            RefineError::Completion { stage, .. } | RefineError::Cancelled { stage, .. } => *stage,
        }
    }

    /// This error followed by each underlying cause, joined with ": ".
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }

    /// The most recent draft produced before the failure, if the seed call succeeded.
    pub fn last_draft(&self) -> Option<&str> {
        match self {
            RefineError::Completion { last_draft, .. } | RefineError::Cancelled { last_draft, .. } => {
                last_draft.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_is_one_based() {
        assert_eq!(Stage::Seed.to_string(), "seed generation");
        assert_eq!(Stage::Review { iteration: 1 }.to_string(), "review (iteration 1)");
        assert_eq!(
            Stage::Regenerate { iteration: 3 }.to_string(),
            "regeneration (iteration 3)"
        );
    }

    #[test]
    fn test_invalid_template_message_names_placeholder() {
        let err = ConfigurationError::InvalidTemplate {
            role: "reviewer".to_string(),
            placeholders: 0,
        };
        assert_eq!(
            err.to_string(),
            "reviewer template must contain exactly one {{$input}} placeholder (found 0)"
        );
    }

    #[test]
    fn test_refine_error_identifies_role_and_stage() {
        let err = RefineError::Completion {
            stage: Stage::Review { iteration: 2 },
            source: CompletionError::Empty {
                role: "editor".to_string(),
            },
            last_draft: Some("draft v2".to_string()),
        };
        assert_eq!(err.to_string(), "review (iteration 2) failed");
        assert_eq!(
            err.chain_message(),
            "review (iteration 2) failed: editor returned an empty completion"
        );
        assert_eq!(err.last_draft(), Some("draft v2"));
        assert_eq!(err.stage(), Stage::Review { iteration: 2 });
    }

    #[test]
    fn test_completion_error_role() {
        let err = CompletionError::Request {
            role: "reporter".to_string(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(err.role(), "reporter");
        assert_eq!(err.to_string(), "reporter completion request failed");
    }

    #[test]
    fn test_cause_appears_once_in_chain() {
        let err = RefineError::Completion {
            stage: Stage::Regenerate { iteration: 1 },
            source: CompletionError::Request {
                role: "reporter".to_string(),
                source: anyhow::anyhow!("HTTP 500: internal error"),
            },
            last_draft: None,
        };
        let message = err.chain_message();
        assert_eq!(
            message,
            "regeneration (iteration 1) failed: reporter completion request failed: HTTP 500: internal error"
        );

        let rendered = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(rendered.matches("HTTP 500").count(), 1);
        assert_eq!(rendered.matches("completion request failed").count(), 1);
    }
}
