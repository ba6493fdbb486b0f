// Command-line arguments
//
// Flags override the config file; the credential only ever comes from the environment.

use clap::Parser;
use std::path::PathBuf;

use crate::config::constants::DEFAULT_TOPIC;
use crate::config::Config;
use crate::errors::ConfigurationError;

#[derive(Parser, Debug)]
#[command(
    name = "copydesk",
    version,
    about = "A reporter and an editor model refine one article until the editor signs off",
    after_help = "Environment:\n  OPENAI_API_KEY   Provider credential (required)\n  RUST_LOG         Log filter (overrides -v)\n\nExamples:\n  copydesk\n  copydesk \"Is remote work the future?\" --max-iterations 3\n  copydesk \"Four-day work week\" --marker APPROVED --json"
)]
pub struct Args {
    /// Topic for the first draft
    #[arg(value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Review rounds after the first draft (0 = first draft only)
    #[arg(short = 'n', long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Literal the editor emits when the article is final
    #[arg(long, value_name = "TEXT")]
    pub marker: Option<String>,

    /// Chat model name
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Attempts per completion call, including the first (1 = fail fast)
    #[arg(long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Config file (default: ~/.copydesk/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the outcome and transcript as JSON instead of the console transcript
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The topic to write about, falling back to the built-in default.
    pub fn topic(&self) -> Result<String, ConfigurationError> {
        match &self.topic {
            Some(topic) if topic.trim().is_empty() => Err(ConfigurationError::InvalidValue {
                field: "topic".to_string(),
                reason: "must not be empty".to_string(),
            }),
            Some(topic) => Ok(topic.clone()),
            None => Ok(DEFAULT_TOPIC.to_string()),
        }
    }

    /// Apply flag overrides and re-validate.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<(), ConfigurationError> {
        if let Some(n) = self.max_iterations {
            config.refinement.max_iterations = n;
        }
        if let Some(marker) = &self.marker {
            config.refinement.termination_marker = marker.clone();
        }
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        if let Some(url) = &self.base_url {
            config.provider.base_url = url.clone();
        }
        if let Some(attempts) = self.attempts {
            config.retry.max_attempts = attempts;
        }
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_uses_default_topic() {
        let args = Args::try_parse_from(["copydesk"]).unwrap();
        assert_eq!(args.topic().unwrap(), DEFAULT_TOPIC);
        assert!(!args.json);
    }

    #[test]
    fn test_blank_topic_rejected() {
        let args = Args::try_parse_from(["copydesk", "  "]).unwrap();
        assert!(args.topic().is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = Args::try_parse_from([
            "copydesk",
            "Four-day work week",
            "-n",
            "0",
            "--marker",
            "APPROVED",
            "--model",
            "gpt-4o",
            "--attempts",
            "3",
        ])
        .unwrap();
        let mut config = Config::new("sk-test");
        args.apply_overrides(&mut config).unwrap();

        assert_eq!(args.topic().unwrap(), "Four-day work week");
        assert_eq!(config.refinement.max_iterations, 0);
        assert_eq!(config.refinement.termination_marker, "APPROVED");
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::try_parse_from(["copydesk", "--marker", ""]).unwrap();
        let mut config = Config::new("sk-test");
        assert!(args.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn test_negative_iterations_rejected_by_parser() {
        assert!(Args::try_parse_from(["copydesk", "-n", "-1"]).is_err());
    }
}
