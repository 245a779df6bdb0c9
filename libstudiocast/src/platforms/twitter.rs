//! Twitter/X platform implementation
//!
//! Posts through API v2 (`POST /2/tweets`) with OAuth 1.0a user-context
//! signing. Media is not supported on this path.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{api_error, network_error, read_body, Platform};
use crate::config::TwitterConfig;
use crate::credentials::OAuth1Credentials;
use crate::error::Result;
use crate::oauth1::{self, SigningParams};
use crate::types::{Post, PublishOutcome};

const DISPLAY_NAME: &str = "Twitter";
const CHARACTER_LIMIT: usize = 280;

#[derive(Debug, Serialize)]
struct TweetBody<'a> {
    text: &'a str,
}

/// Twitter client
pub struct TwitterClient {
    http: reqwest::Client,
    tweets_url: String,
    credentials: Arc<OAuth1Credentials>,
    /// Pinned nonce/timestamp; `None` means fresh values per request
    fixed_signing: Option<SigningParams>,
}

impl TwitterClient {
    pub fn new(
        http: reqwest::Client,
        config: &TwitterConfig,
        credentials: Arc<OAuth1Credentials>,
    ) -> Self {
        Self {
            http,
            tweets_url: format!("{}/2/tweets", config.api_base.trim_end_matches('/')),
            credentials,
            fixed_signing: None,
        }
    }

    /// Sign every request with the same nonce and timestamp
    ///
    /// Only for reproducible tests: a real API rejects a replayed nonce.
    pub fn with_fixed_signing(mut self, signing: SigningParams) -> Self {
        self.fixed_signing = Some(signing);
        self
    }

    pub fn tweets_url(&self) -> &str {
        &self.tweets_url
    }

    fn authorization(&self) -> Result<String> {
        let signing = self
            .fixed_signing
            .clone()
            .unwrap_or_else(SigningParams::fresh);
        oauth1::authorization_header("POST", &self.tweets_url, &self.credentials, &[], &signing)
    }
}

#[async_trait]
impl Platform for TwitterClient {
    async fn publish(&self, post: &Post) -> Result<PublishOutcome> {
        if post.image_url.is_some() {
            debug!("Twitter does not support attachments here, ignoring image");
        }

        let authorization = self.authorization()?;
        debug!(content_length = post.content.len(), "Posting tweet");

        let response = self
            .http
            .post(&self.tweets_url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(&TweetBody {
                text: &post.content,
            })
            .send()
            .await
            .map_err(|e| network_error(DISPLAY_NAME, "post tweet", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(DISPLAY_NAME, response).await.into());
        }

        // Any 2xx means the tweet is live, parsed body or not
        let body = read_body(response).await;
        let outcome = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(raw) => {
                let tweet_id = raw
                    .pointer("/data/id")
                    .and_then(|id| id.as_str())
                    .map(str::to_string);
                PublishOutcome::text().with_post_id(tweet_id).with_raw(raw)
            }
            Err(e) => {
                warn!(status = status.as_u16(), "Tweet published but response body is not JSON: {}", e);
                PublishOutcome::text()
            }
        };
        info!(status = status.as_u16(), tweet_id = ?outcome.post_id, "Tweet published");

        Ok(outcome)
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn character_limit(&self) -> Option<usize> {
        Some(CHARACTER_LIMIT)
    }
}
