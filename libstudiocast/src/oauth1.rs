//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! Everything here is a pure function of its inputs. A fresh nonce and
//! timestamp come from [`SigningParams::fresh`]; tests pin them with
//! [`SigningParams::fixed`] to get byte-identical headers.
//!
//! # Examples
//!
//! ```
//! use libstudiocast::credentials::OAuth1Credentials;
//! use libstudiocast::oauth1::{authorization_header, SigningParams};
//!
//! # fn example() -> libstudiocast::Result<()> {
//! let creds = OAuth1Credentials::new("ck", "cs", "at", "ats")?;
//! let params = SigningParams::fixed("nonce", 1_700_000_000);
//! let header = authorization_header("POST", "https://api.twitter.com/2/tweets", &creds, &[], &params)?;
//! assert!(header.starts_with("OAuth oauth_consumer_key=\"ck\""));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Url;
use sha1::Sha1;

use crate::credentials::OAuth1Credentials;
use crate::error::{PlatformError, Result, StudiocastError};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are the only ones left as-is
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// Per-request nonce and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningParams {
    pub nonce: String,
    pub timestamp: i64,
}

impl SigningParams {
    /// Random 32-character alphanumeric nonce and the current epoch second
    pub fn fresh() -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();

        Self {
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn fixed(nonce: impl Into<String>, timestamp: i64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }
}

/// Percent-encode per RFC 3986 as OAuth 1.0a requires
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Build the signature base string
///
/// `base_url` must already be stripped of query and fragment; `params` holds
/// every parameter that takes part in the signature (oauth, query, form).
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    // Sort by encoded key, then encoded value for repeated keys
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

/// Base64 HMAC-SHA1 of the base string
pub fn sign(base_string: &str, signing_key: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| PlatformError::Posting(format!("Failed to initialise HMAC-SHA1: {}", e)))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Split a request URL into its signing base URL and query parameters
fn split_url(url: &str) -> Result<(String, Vec<(String, String)>)> {
    let mut parsed = Url::parse(url)
        .map_err(|e| StudiocastError::InvalidInput(format!("Invalid request URL '{}': {}", url, e)))?;

    let query: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok((parsed.to_string(), query))
}

fn oauth_params(creds: &OAuth1Credentials, signing: &SigningParams) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("oauth_consumer_key".to_string(), creds.consumer_key().to_string()),
        ("oauth_nonce".to_string(), signing.nonce.clone()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), signing.timestamp.to_string()),
        ("oauth_token".to_string(), creds.access_token().to_string()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ])
}

/// Compute `oauth_signature` for a request
///
/// `extra_params` are form-encoded body parameters; query parameters are
/// taken from `url` itself. JSON bodies never take part in the signature.
pub fn signature(
    method: &str,
    url: &str,
    creds: &OAuth1Credentials,
    extra_params: &[(&str, &str)],
    signing: &SigningParams,
) -> Result<String> {
    let (base_url, query) = split_url(url)?;

    let mut params: Vec<(String, String)> = oauth_params(creds, signing).into_iter().collect();
    params.extend(query);
    params.extend(
        extra_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let base_string = signature_base_string(method, &base_url, &params);
    let key = signing_key(creds.consumer_secret(), creds.access_token_secret());
    sign(&base_string, &key)
}

/// Build the `Authorization` header value for exactly one request
pub fn authorization_header(
    method: &str,
    url: &str,
    creds: &OAuth1Credentials,
    extra_params: &[(&str, &str)],
    signing: &SigningParams,
) -> Result<String> {
    let signature = signature(method, url, creds, extra_params, signing)?;

    let mut params = oauth_params(creds, signing);
    params.insert("oauth_signature".to_string(), signature);

    let rendered = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", rendered))
}
