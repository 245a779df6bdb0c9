//! Platform credentials for Studiocast
//!
//! Credentials are read once from a [`CredentialSource`] (the process
//! environment in production) and validated into typed per-platform states.
//! A platform with missing values is not an error until something tries to
//! publish to it, at which point [`CredentialState::require`] fails before any
//! network access.
//!
//! Secret values are held in [`SecretString`] so they never show up in
//! `Debug` output or logs.
//!
//! # Example
//!
//! ```no_run
//! use libstudiocast::credentials::{Credentials, EnvSource};
//!
//! # fn example() -> libstudiocast::Result<()> {
//! let credentials = Credentials::load(&EnvSource::new());
//! let twitter = credentials.twitter.require("Twitter")?;
//! println!("Twitter consumer key has {} chars", twitter.consumer_key().len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Result, StudiocastError};

pub const LINKEDIN_ACCESS_TOKEN: &str = "LINKEDIN_ACCESS_TOKEN";
pub const LINKEDIN_USER_ID: &str = "LINKEDIN_USER_ID";
pub const TWITTER_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const TWITTER_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const TWITTER_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Where credential values are read from
pub trait CredentialSource: Send + Sync {
    /// Retrieve a value by variable name
    ///
    /// Blank values must be reported as `None`.
    fn retrieve(&self, key: &str) -> Option<String>;

    /// Name of the source, for log messages
    fn source_name(&self) -> &str;
}

/// Reads credentials from the process environment
///
/// A `.env` file in the working directory is loaded first when present.
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvSource {
    fn retrieve(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn source_name(&self) -> &str {
        "environment"
    }
}

/// In-memory credential source
///
/// Useful for tests and for embedding callers that manage secrets themselves.
#[derive(Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl CredentialSource for MapSource {
    fn retrieve(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}

/// A usable credential bundle, the variables that are missing, or why the
/// values present could not be used
#[derive(Debug)]
pub enum CredentialState<T> {
    Ready(Arc<T>),
    Missing(Vec<&'static str>),
    Invalid(String),
}

impl<T> CredentialState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, CredentialState::Ready(_))
    }

    /// Get the credentials or fail with a configuration error naming the gaps
    pub fn require(&self, platform: &str) -> Result<Arc<T>> {
        match self {
            CredentialState::Ready(creds) => Ok(Arc::clone(creds)),
            CredentialState::Missing(vars) => Err(ConfigError::MissingCredentials {
                platform: platform.to_string(),
                vars: vars.iter().map(|v| v.to_string()).collect(),
            }
            .into()),
            CredentialState::Invalid(reason) => Err(ConfigError::InvalidCredentials {
                platform: platform.to_string(),
                reason: reason.clone(),
            }
            .into()),
        }
    }
}

/// Fetch every key, returning the values in order or the names that were absent
fn collect<const N: usize>(
    source: &dyn CredentialSource,
    keys: [&'static str; N],
) -> std::result::Result<[String; N], Vec<&'static str>> {
    let mut missing = Vec::new();
    let values = keys.map(|key| match source.retrieve(key) {
        Some(value) => value,
        None => {
            missing.push(key);
            String::new()
        }
    });

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(missing)
    }
}

/// OAuth 1.0a consumer and token credentials
#[derive(Debug)]
pub struct OAuth1Credentials {
    consumer_key: SecretString,
    consumer_secret: SecretString,
    access_token: SecretString,
    access_token_secret: SecretString,
}

impl OAuth1Credentials {
    /// Build a credential set, rejecting any blank value
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            consumer_key: non_blank("consumer_key", consumer_key.into())?,
            consumer_secret: non_blank("consumer_secret", consumer_secret.into())?,
            access_token: non_blank("access_token", access_token.into())?,
            access_token_secret: non_blank("access_token_secret", access_token_secret.into())?,
        })
    }

    pub fn consumer_key(&self) -> &str {
        self.consumer_key.expose_secret()
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn access_token_secret(&self) -> &str {
        self.access_token_secret.expose_secret()
    }
}

/// LinkedIn member token and the member id posts are authored as
#[derive(Debug)]
pub struct LinkedInCredentials {
    access_token: SecretString,
    user_id: String,
}

impl LinkedInCredentials {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(ConfigError::MissingField("user_id".to_string()).into());
        }
        let access_token = non_blank("access_token", access_token.into())?;

        // Sent verbatim as `Authorization: Bearer <token>` on every call
        let bearer = format!("Bearer {}", access_token.expose_secret());
        if reqwest::header::HeaderValue::from_str(&bearer).is_err() {
            return Err(ConfigError::InvalidField {
                field: "access_token".to_string(),
                reason: "not a valid HTTP header value".to_string(),
            }
            .into());
        }

        Ok(Self {
            access_token,
            user_id: user_id.trim().to_string(),
        })
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Person URN used as post author and image owner
    pub fn author_urn(&self) -> String {
        format!("urn:li:person:{}", self.user_id)
    }
}

#[derive(Debug)]
pub struct OpenAiCredentials {
    api_key: SecretString,
}

impl OpenAiCredentials {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: non_blank("api_key", api_key.into())?,
        })
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn non_blank(field: &str, value: String) -> Result<SecretString> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field.to_string()).into());
    }
    Ok(SecretString::from(value))
}

/// Credentials for every integration, loaded once at startup
#[derive(Debug)]
pub struct Credentials {
    pub linkedin: CredentialState<LinkedInCredentials>,
    pub twitter: CredentialState<OAuth1Credentials>,
    pub openai: CredentialState<OpenAiCredentials>,
}

impl Credentials {
    /// Load and validate credentials from a source
    ///
    /// Never fails: platforms with gaps are recorded as
    /// [`CredentialState::Missing`] and logged at warn level.
    pub fn load(source: &dyn CredentialSource) -> Self {
        let linkedin = match collect(source, [LINKEDIN_ACCESS_TOKEN, LINKEDIN_USER_ID]) {
            Ok([token, user_id]) => ready(LinkedInCredentials::new(token, user_id)),
            Err(missing) => CredentialState::Missing(missing),
        };

        let twitter = match collect(
            source,
            [
                TWITTER_CONSUMER_KEY,
                TWITTER_CONSUMER_SECRET,
                TWITTER_ACCESS_TOKEN,
                TWITTER_ACCESS_TOKEN_SECRET,
            ],
        ) {
            Ok([key, secret, token, token_secret]) => {
                ready(OAuth1Credentials::new(key, secret, token, token_secret))
            }
            Err(missing) => CredentialState::Missing(missing),
        };

        let openai = match collect(source, [OPENAI_API_KEY]) {
            Ok([key]) => ready(OpenAiCredentials::new(key)),
            Err(missing) => CredentialState::Missing(missing),
        };

        let credentials = Self {
            linkedin,
            twitter,
            openai,
        };
        credentials.log_summary(source.source_name());
        credentials
    }

    fn log_summary(&self, source: &str) {
        log_state("linkedin", source, &self.linkedin);
        log_state("twitter", source, &self.twitter);
        log_state("openai", source, &self.openai);
    }
}

fn log_state<T>(platform: &str, source: &str, state: &CredentialState<T>) {
    match state {
        CredentialState::Ready(_) => {
            tracing::info!("{} credentials loaded from {}", platform, source)
        }
        CredentialState::Missing(vars) => tracing::warn!(
            "{} credentials incomplete in {} (missing: {})",
            platform,
            source,
            vars.join(", ")
        ),
        CredentialState::Invalid(reason) => {
            tracing::warn!("{} credentials invalid in {}: {}", platform, source, reason)
        }
    }
}

fn ready<T>(built: Result<T>) -> CredentialState<T> {
    match built {
        Ok(creds) => CredentialState::Ready(Arc::new(creds)),
        Err(StudiocastError::Config(e)) => CredentialState::Invalid(e.to_string()),
        Err(e) => CredentialState::Invalid(e.to_string()),
    }
}
