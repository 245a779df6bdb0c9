//! Core types for Studiocast

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StudiocastError;

/// Inbound publish request as the admin panel sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PublishRequest {
    pub fn new(platform: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            content: content.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    LinkedIn,
    Twitter,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::LinkedIn => "linkedin",
            PlatformKind::Twitter => "twitter",
        }
    }

    /// Human-facing name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformKind::LinkedIn => "LinkedIn",
            PlatformKind::Twitter => "Twitter",
        }
    }
}

impl FromStr for PlatformKind {
    type Err = StudiocastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(PlatformKind::LinkedIn),
            "twitter" | "x" => Ok(PlatformKind::Twitter),
            _ => Err(StudiocastError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated content handed to a platform client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub content: String,
    pub image_url: Option<String>,
}

impl Post {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Image,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Text => "text",
            PostKind::Image => "image",
        }
    }
}

/// Normalized success result, identical in shape for every platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl PublishOutcome {
    pub fn text() -> Self {
        Self {
            success: true,
            kind: PostKind::Text,
            post_id: None,
            raw: None,
        }
    }

    pub fn image() -> Self {
        Self {
            kind: PostKind::Image,
            ..Self::text()
        }
    }

    pub fn with_post_id(mut self, post_id: Option<String>) -> Self {
        self.post_id = post_id;
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Upload URL and asset URN issued by a media registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub upload_url: String,
    pub asset_id: String,
}

/// Result of the optional media pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaStep {
    /// Media uploaded; holds the asset id to reference from the post
    Attached(String),
    /// Media dropped; the post goes out as text
    Skipped(String),
}

impl MediaStep {
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            MediaStep::Attached(id) => Some(id),
            MediaStep::Skipped(_) => None,
        }
    }
}
