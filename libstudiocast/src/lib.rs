//! Studiocast - social publishing for a studio portfolio
//!
//! This library publishes portfolio announcements to LinkedIn and Twitter/X:
//! OAuth 1.0a request signing, LinkedIn's multi-step image upload, dispatch
//! with uniform results, and AI-assisted drafting.

pub mod compose;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod oauth1;
pub mod platforms;
pub mod publisher;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use credentials::{CredentialSource, Credentials, EnvSource};
pub use error::{StudiocastError, Result};
pub use publisher::Publisher;
pub use types::{PlatformKind, PostKind, PublishOutcome, PublishRequest};
