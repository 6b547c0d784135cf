//! Layered settings: built-in defaults, TOML file, `CG2GLSL_*` environment
//! variables, then command-line flags.

use crate::config::AppConfig;
use crate::error::AppError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cg2glsl.toml";
pub const ENV_PREFIX: &str = "CG2GLSL_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Explicit cgc location; auto-detected when unset.
    pub cgc_path: Option<PathBuf>,
    /// Limit on one cgc run, as a humantime duration.
    pub timeout: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cgc_path: None,
            timeout: "60s".to_owned(),
        }
    }
}

impl Settings {
    /// Builds the provider stack for `config`.
    pub fn figment(config: &AppConfig) -> Result<Figment, AppError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        figment = match &config.config_file {
            Some(path) if !path.is_file() => {
                return Err(AppError::Config(format!(
                    "settings file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => figment.merge(Toml::file(path)),
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        if let Some(cgc) = &config.cgc {
            figment = figment.merge(Serialized::default("cgc_path", cgc));
        }
        if let Some(timeout) = config.timeout {
            figment = figment.merge(Serialized::default(
                "timeout",
                humantime::format_duration(timeout).to_string(),
            ));
        }
        Ok(figment)
    }

    /// Resolves the settings for `config`.
    pub fn load(config: &AppConfig) -> Result<Self, AppError> {
        let settings: Self = Self::figment(config)?
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        log::debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }

    /// The configured per-run timeout.
    pub fn timeout(&self) -> Result<Duration, AppError> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| AppError::Config(format!("invalid timeout '{}': {e}", self.timeout)))
    }
}
