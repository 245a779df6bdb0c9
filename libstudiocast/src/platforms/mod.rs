//! Platform abstraction and implementations
//!
//! Each platform client owns its publish sequence end to end: building
//! request bodies, authenticating, optional media handling, and mapping
//! provider responses into [`PublishOutcome`] or a [`PlatformError`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use libstudiocast::config::TwitterConfig;
//! use libstudiocast::credentials::OAuth1Credentials;
//! use libstudiocast::platforms::{Platform, twitter::TwitterClient};
//! use libstudiocast::types::Post;
//!
//! # async fn example() -> libstudiocast::Result<()> {
//! let creds = Arc::new(OAuth1Credentials::new("ck", "cs", "at", "ats")?);
//! let client = TwitterClient::new(reqwest::Client::new(), &TwitterConfig::default(), creds);
//!
//! let post = Post::new("Hello, world!");
//! client.validate_content(&post.content)?;
//! let outcome = client.publish(&post).await?;
//! println!("Posted: {:?}", outcome.post_id);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::types::{Post, PublishOutcome};

pub mod linkedin;
pub mod twitter;

/// Unified interface over the supported social platforms
#[async_trait]
pub trait Platform: Send + Sync {
    /// Run the platform's full publish sequence for one post
    ///
    /// # Errors
    ///
    /// - `PlatformError::Api` when the final publish call returns non-2xx
    /// - `PlatformError::Network` when a required request cannot be sent
    async fn publish(&self, post: &Post) -> Result<PublishOutcome>;

    /// Check content against platform rules before any request is made
    fn validate_content(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PlatformError::Validation("Content cannot be empty".to_string()).into());
        }

        if let Some(limit) = self.character_limit() {
            let char_count = content.chars().count();
            if char_count > limit {
                return Err(PlatformError::Validation(format!(
                    "Content exceeds {}'s {} character limit (current: {} characters)",
                    self.display_name(),
                    limit,
                    char_count
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Lowercase identifier (e.g. "linkedin", "twitter")
    fn name(&self) -> &str;

    /// Capitalized name for messages
    fn display_name(&self) -> &str;

    fn character_limit(&self) -> Option<usize>;

    /// Whether `Post::image_url` is honoured
    fn supports_attachments(&self) -> bool {
        false
    }
}

/// Read a response body as text, tolerating unreadable bodies
pub(crate) async fn read_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => format!("<unreadable response body: {}>", e),
    }
}

/// Map a transport failure into a network error with context
pub(crate) fn network_error(platform: &str, context: &str, error: reqwest::Error) -> PlatformError {
    PlatformError::Network(format!(
        "{} request failed ({}): {}",
        platform, context, error
    ))
}

/// Turn a non-2xx response into a provider error carrying the raw body
///
/// JSON bodies are re-rendered compactly so the detail stays on one line.
pub(crate) async fn api_error(platform: &str, response: reqwest::Response) -> PlatformError {
    let status = response.status().as_u16();
    let body = read_body(response).await;
    let body = match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => json.to_string(),
        Err(_) => body,
    };

    PlatformError::Api {
        platform: platform.to_string(),
        status,
        body,
    }
}
