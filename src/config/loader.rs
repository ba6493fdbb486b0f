// Configuration loader
// Reads ~/.copydesk/config.toml (optional) and the API key from the environment

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::constants::{API_KEY_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::settings::{Config, ProviderSettings, RefinementSettings, RetrySettings, RoleTemplates};
use crate::errors::ConfigurationError;

/// On-disk shape. Every section is optional; missing keys take defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TomlConfig {
    provider: ProviderSettings,
    refinement: RefinementSettings,
    retry: RetrySettings,
    roles: RoleTemplates,
}

/// Default config file location, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from `path` (or the default location) and the environment.
///
/// An explicit `path` must exist; the default location is skipped when absent.
/// The credential is checked before anything else is validated.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigurationError> {
    let api_key = std::env::var(API_KEY_ENV).ok();

    let contents = match path {
        Some(p) => Some((p.to_path_buf(), read_file(p)?)),
        None => match default_config_path() {
            Some(p) if p.exists() => {
                let contents = read_file(&p)?;
                Some((p, contents))
            }
            _ => None,
        },
    };

    match contents {
        Some((p, text)) => {
            tracing::debug!("Loading configuration from {}", p.display());
            resolve(api_key, Some((p.as_path(), text.as_str())))
        }
        None => {
            tracing::debug!("No config file found, using defaults");
            resolve(api_key, None)
        }
    }
}

/// Combine the credential and optional file contents into a validated `Config`.
pub fn resolve(
    api_key: Option<String>,
    file: Option<(&Path, &str)>,
) -> Result<Config, ConfigurationError> {
    let api_key = match api_key {
        Some(key) if !key.trim().is_empty() => key,
        _ => {
            return Err(ConfigurationError::MissingCredential {
                var: API_KEY_ENV.to_string(),
            })
        }
    };

    let toml_config = match file {
        Some((path, text)) => toml::from_str::<TomlConfig>(text).map_err(|source| {
            ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?,
        None => TomlConfig::default(),
    };

    let mut config = Config::new(api_key);
    config.provider = toml_config.provider;
    config.refinement = toml_config.refinement;
    config.retry = toml_config.retry;
    config.roles = toml_config.roles;

    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigurationError> {
    fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })
}
