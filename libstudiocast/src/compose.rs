//! AI-assisted post drafting
//!
//! Generates a platform-tailored draft for a portfolio project through the
//! OpenAI chat completions API. The draft is returned to the caller for
//! review; nothing is published from here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::OpenAiConfig;
use crate::credentials::OpenAiCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::{api_error, network_error};

const DISPLAY_NAME: &str = "OpenAI";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    pub project_title: String,
    pub project_description: String,
    pub platform: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPost {
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub fn system_prompt(platform: &str, tone: &str) -> String {
    let mut prompt = format!(
        "You are a social media expert that creates engaging {} posts. ",
        platform
    );
    match platform.to_lowercase().as_str() {
        "linkedin" => prompt.push_str("Create professional and insightful content."),
        "twitter" | "x" => {
            prompt.push_str("Create concise and engaging content within 280 characters.")
        }
        _ => {}
    }
    prompt.push_str(&format!(" Use a {} tone.", tone));
    prompt
}

pub fn user_prompt(request: &ComposeRequest) -> String {
    format!(
        "Create a {} post about this project:\nTitle: {}\nDescription: {}",
        request.platform, request.project_title, request.project_description
    )
}

/// Drafts social posts from project details
pub struct Composer {
    http: reqwest::Client,
    completions_url: String,
    model: String,
    credentials: Arc<OpenAiCredentials>,
}

impl Composer {
    pub fn new(
        http: reqwest::Client,
        config: &OpenAiConfig,
        credentials: Arc<OpenAiCredentials>,
    ) -> Self {
        Self {
            http,
            completions_url: format!(
                "{}/v1/chat/completions",
                config.api_base.trim_end_matches('/')
            ),
            model: config.model.clone(),
            credentials,
        }
    }

    pub async fn generate(&self, request: &ComposeRequest) -> Result<ComposedPost> {
        if request.project_title.trim().is_empty() || request.platform.trim().is_empty() {
            return Err(crate::error::StudiocastError::InvalidInput(
                "projectTitle and platform are required".to_string(),
            ));
        }

        debug!(platform = %request.platform, tone = %request.tone, "Requesting draft");

        let response = self
            .http
            .post(&self.completions_url)
            .bearer_auth(self.credentials.api_key())
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system_prompt(&request.platform, &request.tone)},
                    {"role": "user", "content": user_prompt(request)},
                ],
            }))
            .send()
            .await
            .map_err(|e| network_error(DISPLAY_NAME, "chat completion", e))?;

        if !response.status().is_success() {
            return Err(api_error(DISPLAY_NAME, response).await.into());
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Unexpected chat completion response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| PlatformError::Posting("Chat completion returned no content".into()))?;

        info!(platform = %request.platform, length = content.chars().count(), "Draft generated");
        Ok(ComposedPost { content })
    }
}
