// Project-wide constants
//
// Centralised here so defaults have one source of truth.
// Import via `use crate::config::constants::*;`.

/// Environment variable holding the completion-provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default OpenAI-compatible endpoint (the `/v1/chat/completions` path is appended).
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default maximum tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default bound on reviewer/generator rounds after the seed draft.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Default literal the reviewer appends when it considers the draft final.
pub const DEFAULT_TERMINATION_MARKER: &str = "TERMINATE";

/// Default attempts per completion call. 1 means fail fast (no retry).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Base back-off delay; doubles after every failed attempt.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Placeholder substituted with the role's input text.
pub const INPUT_PLACEHOLDER: &str = "{{$input}}";

/// Topic used when none is given on the command line.
pub const DEFAULT_TOPIC: &str = "Is remote work the future, or are we losing workplace culture?";

/// Config directory under the user's home.
pub const CONFIG_DIR_NAME: &str = ".copydesk";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";
