//! Publish dispatch
//!
//! [`Publisher`] is the single entry point the front ends call. It turns a
//! [`PublishRequest`] into a platform client call and collapses every path
//! into a [`PublishOutcome`] or a [`StudiocastError`]. Unsupported platforms,
//! blank content and missing credentials are all rejected before any
//! network access.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::compose::Composer;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::{PlatformError, Result, StudiocastError};
use crate::oauth1::SigningParams;
use crate::platforms::{linkedin::LinkedInClient, twitter::TwitterClient, Platform};
use crate::types::{PlatformKind, Post, PublishOutcome, PublishRequest};

/// Build the shared HTTP client from configuration
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .user_agent(config.http.user_agent.clone())
        .build()
        .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)).into())
}

/// Dispatches publish requests to the platform clients
pub struct Publisher {
    http: reqwest::Client,
    config: Arc<Config>,
    credentials: Arc<Credentials>,
    twitter_signing: Option<SigningParams>,
}

impl Publisher {
    /// Create a publisher with its own HTTP client
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libstudiocast::{Config, Publisher, PublishRequest};
    /// use libstudiocast::credentials::{Credentials, EnvSource};
    ///
    /// # async fn example() -> libstudiocast::Result<()> {
    /// let publisher = Publisher::new(Config::load()?, Credentials::load(&EnvSource::new()))?;
    /// let outcome = publisher
    ///     .publish(&PublishRequest::new("twitter", "Hello world"))
    ///     .await?;
    /// assert!(outcome.success);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::with_http_client(http, config, credentials))
    }

    pub fn with_http_client(http: reqwest::Client, config: Config, credentials: Credentials) -> Self {
        Self {
            http,
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            twitter_signing: None,
        }
    }

    /// Pin the OAuth nonce/timestamp used for Twitter requests (tests only)
    pub fn with_fixed_twitter_signing(mut self, signing: SigningParams) -> Self {
        self.twitter_signing = Some(signing);
        self
    }

    /// Platforms whose credentials are complete
    pub fn configured_platforms(&self) -> Vec<PlatformKind> {
        let mut ready = Vec::new();
        if self.credentials.linkedin.is_ready() {
            ready.push(PlatformKind::LinkedIn);
        }
        if self.credentials.twitter.is_ready() {
            ready.push(PlatformKind::Twitter);
        }
        ready
    }

    /// Build the client for a platform, failing if its credentials are incomplete
    pub fn platform(&self, kind: PlatformKind) -> Result<Box<dyn Platform>> {
        match kind {
            PlatformKind::LinkedIn => {
                let creds = self.credentials.linkedin.require(kind.display_name())?;
                Ok(Box::new(LinkedInClient::new(
                    self.http.clone(),
                    &self.config.linkedin,
                    creds,
                )))
            }
            PlatformKind::Twitter => {
                let creds = self.credentials.twitter.require(kind.display_name())?;
                let mut client =
                    TwitterClient::new(self.http.clone(), &self.config.twitter, creds);
                if let Some(signing) = &self.twitter_signing {
                    client = client.with_fixed_signing(signing.clone());
                }
                Ok(Box::new(client))
            }
        }
    }

    /// Draft composer sharing this publisher's HTTP client
    pub fn composer(&self) -> Result<Composer> {
        let creds = self.credentials.openai.require("OpenAI")?;
        Ok(Composer::new(self.http.clone(), &self.config.openai, creds))
    }

    /// Publish one request
    ///
    /// # Errors
    ///
    /// - `UnsupportedPlatform` for an unknown platform name
    /// - `InvalidInput` for blank content
    /// - `Config` when the platform's credentials are incomplete
    /// - `Platform` for validation, transport and provider failures
    #[instrument(skip(self, request), fields(platform = %request.platform))]
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome> {
        if request.platform.trim().is_empty() {
            return Err(StudiocastError::InvalidInput(
                "Platform and content are required".to_string(),
            ));
        }
        let kind: PlatformKind = request.platform.parse()?;

        if request.content.trim().is_empty() {
            return Err(StudiocastError::InvalidInput(
                "Platform and content are required".to_string(),
            ));
        }

        let platform = self.platform(kind)?;
        platform.validate_content(&request.content)?;

        let mut post = Post::new(request.content.clone());
        if let Some(image_url) = request.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if platform.supports_attachments() {
                post = post.with_image(image_url);
            } else {
                warn!("{} posts do not carry images, dropping imageUrl", platform.display_name());
            }
        }

        info!(
            content_length = post.content.chars().count(),
            has_image = post.image_url.is_some(),
            "Publishing to {}",
            platform.display_name()
        );

        match platform.publish(&post).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!("Publishing to {} failed: {}", platform.display_name(), e);
                Err(e)
            }
        }
    }
}
