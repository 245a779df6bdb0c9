//! Configuration management for Studiocast
//!
//! Only non-secret settings live here. Credentials come from the process
//! environment, see [`crate::credentials`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub linkedin: LinkedInConfig,
    pub twitter: TwitterConfig,
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout applied by the shared HTTP client
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("studiocast/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    pub api_base: String,
    /// Value of the `LinkedIn-Version` header (YYYYMM)
    pub api_version: String,
    /// Largest image the upload pipeline will download; bigger ones post as text
    pub max_image_bytes: usize,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.linkedin.com".to_string(),
            api_version: "202411".to_string(),
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    pub api_base: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.twitter.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: every setting has a default.
    /// `STUDIOCAST_BIND` overrides `server.bind`.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        if let Ok(bind) = std::env::var("STUDIOCAST_BIND") {
            if !bind.trim().is_empty() {
                config.server.bind = bind.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let bases = [
            ("linkedin.api_base", &self.linkedin.api_base),
            ("twitter.api_base", &self.twitter.api_base),
            ("openai.api_base", &self.openai.api_base),
        ];
        for (field, value) in bases {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(field, format!("must be an http(s) URL (got '{}')", value)));
            }
        }

        let version = self.linkedin.api_version.trim();
        if version.is_empty() {
            return Err(ConfigError::MissingField("linkedin.api_version".to_string()).into());
        }
        if version.len() != 6 || !version.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(
                "linkedin.api_version",
                format!("expected YYYYMM (got '{}')", version),
            ));
        }

        if self.linkedin.max_image_bytes == 0 {
            return Err(invalid(
                "linkedin.max_image_bytes",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> crate::error::StudiocastError {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason,
    }
    .into()
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("STUDIOCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("studiocast").join("config.toml"))
}
