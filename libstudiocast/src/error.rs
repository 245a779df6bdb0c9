//! Error types for Studiocast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudiocastError>;

#[derive(Error, Debug)]
pub enum StudiocastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl StudiocastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            StudiocastError::InvalidInput(_) | StudiocastError::UnsupportedPlatform(_) => 3,
            StudiocastError::Platform(PlatformError::Api { status, .. })
                if *status == 401 || *status == 403 =>
            {
                2
            }
            StudiocastError::Platform(_) => 1,
            StudiocastError::Config(_) => 1,
        }
    }

    /// HTTP status the server front end answers with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            StudiocastError::InvalidInput(_)
            | StudiocastError::UnsupportedPlatform(_)
            | StudiocastError::Platform(PlatformError::Validation(_)) => 400,
            StudiocastError::Config(_) => 500,
            StudiocastError::Platform(_) => 502,
        }
    }

    /// Diagnostic detail for the caller
    ///
    /// Provider errors surface the raw response body. Everything else falls
    /// back to the rendered error message.
    pub fn details(&self) -> String {
        match self {
            StudiocastError::Platform(PlatformError::Api { body, .. }) if !body.is_empty() => {
                body.clone()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("{platform} credentials not properly configured (missing: {})", vars.join(", "))]
    MissingCredentials {
        platform: String,
        vars: Vec<String>,
    },

    #[error("{platform} credentials not properly configured ({reason})")]
    InvalidCredentials { platform: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Content validation failed: {0}")]
    Validation(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Media upload failed: {0}")]
    Media(String),

    #[error("{platform} API error ({status}): {body}")]
    Api {
        platform: String,
        status: u16,
        body: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, body: &str) -> StudiocastError {
        StudiocastError::Platform(PlatformError::Api {
            platform: "Twitter".to_string(),
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_exit_code_invalid_input() {
        let error = StudiocastError::InvalidInput("Empty content".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_unsupported_platform() {
        let error = StudiocastError::UnsupportedPlatform("mastodon".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_rejected_credentials() {
        assert_eq!(api_error(401, "Unauthorized").exit_code(), 2);
        assert_eq!(api_error(403, "Forbidden").exit_code(), 2);
        assert_eq!(api_error(422, "Bad payload").exit_code(), 1);
    }

    #[test]
    fn test_exit_code_network_error() {
        let error = StudiocastError::Platform(PlatformError::Network("Connection refused".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = StudiocastError::Config(ConfigError::MissingField("linkedin.api_base".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(StudiocastError::UnsupportedPlatform("mastodon".into()).http_status(), 400);
        assert_eq!(StudiocastError::InvalidInput("empty".into()).http_status(), 400);
        assert_eq!(
            StudiocastError::Platform(PlatformError::Validation("too long".into())).http_status(),
            400
        );
        assert_eq!(
            StudiocastError::Config(ConfigError::MissingField("x".into())).http_status(),
            500
        );
        assert_eq!(api_error(401, "nope").http_status(), 502);
    }

    #[test]
    fn test_details_surface_provider_body() {
        let error = api_error(401, r#"{"title":"Unauthorized","status":401}"#);
        assert_eq!(error.details(), r#"{"title":"Unauthorized","status":401}"#);
    }

    #[test]
    fn test_details_fall_back_to_message() {
        let error = StudiocastError::UnsupportedPlatform("mastodon".to_string());
        assert_eq!(error.details(), "Unsupported platform: mastodon");

        let empty_body = api_error(500, "");
        assert_eq!(empty_body.details(), "Platform error: Twitter API error (500): ");
    }

    #[test]
    fn test_missing_credentials_formatting() {
        let error = ConfigError::MissingCredentials {
            platform: "Twitter".to_string(),
            vars: vec![
                "TWITTER_CONSUMER_KEY".to_string(),
                "TWITTER_ACCESS_TOKEN_SECRET".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Twitter credentials not properly configured (missing: TWITTER_CONSUMER_KEY, TWITTER_ACCESS_TOKEN_SECRET)"
        );
    }

    #[test]
    fn test_invalid_credentials_carry_reason() {
        let error: StudiocastError = ConfigError::InvalidCredentials {
            platform: "LinkedIn".to_string(),
            reason: "Invalid access_token: not a valid header value".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Configuration error: LinkedIn credentials not properly configured (Invalid access_token: not a valid header value)"
        );
        assert_eq!(error.http_status(), 500);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_api() {
        let message = api_error(401, "Unauthorized").to_string();
        assert_eq!(message, "Platform error: Twitter API error (401): Unauthorized");
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::MissingField("test".to_string());
        let studiocast_error: StudiocastError = config_error.into();

        match studiocast_error {
            StudiocastError::Config(_) => {}
            _ => panic!("Expected StudiocastError::Config"),
        }
    }

    #[test]
    fn test_error_conversion_from_platform_error() {
        let platform_error = PlatformError::Posting("test".to_string());
        let studiocast_error: StudiocastError = platform_error.into();

        match studiocast_error {
            StudiocastError::Platform(_) => {}
            _ => panic!("Expected StudiocastError::Platform"),
        }
    }

    #[test]
    fn test_platform_error_variants() {
        let validation = PlatformError::Validation("test validation".to_string());
        assert_eq!(format!("{}", validation), "Content validation failed: test validation");

        let posting = PlatformError::Posting("test posting".to_string());
        assert_eq!(format!("{}", posting), "Posting failed: test posting");

        let network = PlatformError::Network("test network".to_string());
        assert_eq!(format!("{}", network), "Network error: test network");

        let media = PlatformError::Media("test media".to_string());
        assert_eq!(format!("{}", media), "Media upload failed: test media");
    }
}
