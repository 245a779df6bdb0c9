//! LinkedIn platform implementation
//!
//! Targets the versioned REST Posts API (`/rest/posts`) with images uploaded
//! through the Images API. An optional image goes through a strictly ordered
//! pipeline:
//!
//! 1. download the image from its public URL
//! 2. `initializeUpload` to obtain an upload URL and image URN
//! 3. `PUT` the bytes to the upload URL
//! 4. reference the image URN from the post body
//!
//! Any failure in steps 1-3 is soft: it is logged and the post goes out as
//! text. Only the final publish call can fail the whole operation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::{api_error, network_error, read_body, Platform};
use crate::config::LinkedInConfig;
use crate::credentials::LinkedInCredentials;
use crate::error::{ConfigError, PlatformError, Result};
use crate::types::{MediaStep, Post, PublishOutcome, UploadTicket};

const DISPLAY_NAME: &str = "LinkedIn";
const CHARACTER_LIMIT: usize = 3000;
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

#[derive(Debug, Deserialize)]
struct InitializeUploadResponse {
    value: InitializeUploadValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeUploadValue {
    upload_url: String,
    image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostBody<'a> {
    author: String,
    commentary: &'a str,
    visibility: &'static str,
    distribution: serde_json::Value,
    lifecycle_state: &'static str,
    is_reshare_disabled_by_author: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<serde_json::Value>,
}

/// LinkedIn client
pub struct LinkedInClient {
    http: reqwest::Client,
    api_base: String,
    api_version: String,
    max_image_bytes: usize,
    credentials: Arc<LinkedInCredentials>,
}

impl LinkedInClient {
    pub fn new(
        http: reqwest::Client,
        config: &LinkedInConfig,
        credentials: Arc<LinkedInCredentials>,
    ) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            max_image_bytes: config.max_image_bytes,
            credentials,
        }
    }

    fn posts_url(&self) -> String {
        format!("{}/rest/posts", self.api_base)
    }

    fn initialize_upload_url(&self) -> String {
        format!("{}/rest/images?action=initializeUpload", self.api_base)
    }

    /// Bearer, version and Rest.li headers sent with every API call
    ///
    /// Both values come from deployment settings, so a bad one is a
    /// configuration error rather than a problem with the request.
    fn api_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.credentials.access_token()))
            .map_err(|_| ConfigError::InvalidField {
                field: "LINKEDIN_ACCESS_TOKEN".to_string(),
                reason: "not a valid HTTP header value".to_string(),
            })?;
        headers.insert(AUTHORIZATION, bearer);

        let version = HeaderValue::from_str(&self.api_version).map_err(|_| {
            ConfigError::InvalidField {
                field: "linkedin.api_version".to_string(),
                reason: format!("'{}' is not a valid header value", self.api_version),
            }
        })?;
        headers.insert("linkedin-version", version);
        headers.insert(
            "x-restli-protocol-version",
            HeaderValue::from_static(RESTLI_PROTOCOL_VERSION),
        );

        Ok(headers)
    }

    /// Step 1: fetch the image bytes from wherever the project image is hosted
    ///
    /// Refuses anything over `max_image_bytes`, by declared length up front and
    /// by running total while streaming.
    async fn download_image(&self, image_url: &str) -> std::result::Result<Vec<u8>, PlatformError> {
        let mut response = self
            .http
            .get(image_url)
            .send()
            .await
            .map_err(|e| PlatformError::Media(format!("image download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PlatformError::Media(format!(
                "image download returned {}",
                response.status()
            )));
        }

        let cap = self.max_image_bytes;
        let too_large = || PlatformError::Media(format!("image exceeds {} bytes", cap));

        if let Some(declared) = response.content_length() {
            if declared > cap as u64 {
                return Err(too_large());
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PlatformError::Media(format!("image download interrupted: {}", e)))?
        {
            if bytes.len() + chunk.len() > cap {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(PlatformError::Media("downloaded image is empty".to_string()));
        }

        Ok(bytes)
    }

    /// Step 2: register an upload and receive the upload URL and image URN
    async fn initialize_upload(&self) -> std::result::Result<UploadTicket, PlatformError> {
        let headers = self
            .api_headers()
            .map_err(|e| PlatformError::Media(e.to_string()))?;

        let response = self
            .http
            .post(self.initialize_upload_url())
            .headers(headers)
            .json(&json!({
                "initializeUploadRequest": {
                    "owner": self.credentials.author_urn(),
                }
            }))
            .send()
            .await
            .map_err(|e| PlatformError::Media(format!("upload registration failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            return Err(PlatformError::Media(format!(
                "upload registration returned {}: {}",
                status, body
            )));
        }

        let parsed: InitializeUploadResponse = response.json().await.map_err(|e| {
            PlatformError::Media(format!("unexpected upload registration response: {}", e))
        })?;

        Ok(UploadTicket {
            upload_url: parsed.value.upload_url,
            asset_id: parsed.value.image,
        })
    }

    /// Step 3: push the binary to the issued upload URL
    async fn upload_image(
        &self,
        ticket: &UploadTicket,
        bytes: Vec<u8>,
    ) -> std::result::Result<(), PlatformError> {
        let response = self
            .http
            .put(&ticket.upload_url)
            .bearer_auth(self.credentials.access_token())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PlatformError::Media(format!("image upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PlatformError::Media(format!(
                "image upload returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Run steps 1-3, degrading to [`MediaStep::Skipped`] on any failure
    pub async fn prepare_media(&self, image_url: &str) -> MediaStep {
        let bytes = match self.download_image(image_url).await {
            Ok(bytes) => bytes,
            Err(e) => return skip(e),
        };
        debug!(size = bytes.len(), "Downloaded image for LinkedIn post");

        let ticket = match self.initialize_upload().await {
            Ok(ticket) => ticket,
            Err(e) => return skip(e),
        };
        debug!(image = %ticket.asset_id, "Registered LinkedIn image upload");

        if let Err(e) = self.upload_image(&ticket, bytes).await {
            return skip(e);
        }
        info!(image = %ticket.asset_id, "Uploaded image to LinkedIn");

        MediaStep::Attached(ticket.asset_id)
    }

    fn post_body<'a>(&self, content: &'a str, media: &MediaStep) -> PostBody<'a> {
        PostBody {
            author: self.credentials.author_urn(),
            commentary: content,
            visibility: "PUBLIC",
            distribution: json!({
                "feedDistribution": "MAIN_FEED",
                "targetEntities": [],
                "thirdPartyDistributionChannels": [],
            }),
            lifecycle_state: "PUBLISHED",
            is_reshare_disabled_by_author: false,
            content: media
                .asset_id()
                .map(|id| json!({ "media": { "id": id } })),
        }
    }
}

fn skip(error: PlatformError) -> MediaStep {
    warn!("Dropping LinkedIn image, posting text only: {}", error);
    MediaStep::Skipped(error.to_string())
}

#[async_trait]
impl Platform for LinkedInClient {
    async fn publish(&self, post: &Post) -> Result<PublishOutcome> {
        let media = match post.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => self.prepare_media(url.trim()).await,
            _ => MediaStep::Skipped("no image supplied".to_string()),
        };

        let body = self.post_body(&post.content, &media);
        debug!(
            content_length = post.content.len(),
            with_media = media.asset_id().is_some(),
            "Publishing LinkedIn post"
        );

        let response = self
            .http
            .post(self.posts_url())
            .headers(self.api_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(DISPLAY_NAME, "publish post", e))?;

        if !response.status().is_success() {
            return Err(api_error(DISPLAY_NAME, response).await.into());
        }

        // The new post URN comes back in a header, the body is empty
        let post_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        info!(status = response.status().as_u16(), post_id = ?post_id, "LinkedIn post published");

        let outcome = match media {
            MediaStep::Attached(_) => PublishOutcome::image(),
            MediaStep::Skipped(_) => PublishOutcome::text(),
        };
        Ok(outcome.with_post_id(post_id))
    }

    fn name(&self) -> &str {
        "linkedin"
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn character_limit(&self) -> Option<usize> {
        Some(CHARACTER_LIMIT)
    }

    fn supports_attachments(&self) -> bool {
        true
    }
}
