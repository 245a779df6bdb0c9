//! HTTP endpoint tests against a live listener

use libstudiocast::config::{Config, OpenAiConfig, TwitterConfig};
use libstudiocast::credentials::{
    Credentials, MapSource, LINKEDIN_ACCESS_TOKEN, LINKEDIN_USER_ID, OPENAI_API_KEY,
    TWITTER_ACCESS_TOKEN, TWITTER_ACCESS_TOKEN_SECRET, TWITTER_CONSUMER_KEY,
    TWITTER_CONSUMER_SECRET,
};
use libstudiocast::Publisher;
use serde_json::{json, Value};
use studio_serve::AppState;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start the app on an ephemeral port and return its base URL
async fn spawn_app(config: Config, source: MapSource) -> String {
    let publisher = Publisher::new(config, Credentials::load(&source)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(studio_serve::serve(listener, AppState::new(publisher)));
    format!("http://{}", addr)
}

fn twitter_source() -> MapSource {
    MapSource::new()
        .with(TWITTER_CONSUMER_KEY, "ck")
        .with(TWITTER_CONSUMER_SECRET, "cs")
        .with(TWITTER_ACCESS_TOKEN, "at")
        .with(TWITTER_ACCESS_TOKEN_SECRET, "ats")
}

#[tokio::test]
async fn test_preflight_is_answered_with_cors_headers() {
    let base = spawn_app(Config::default(), MapSource::new()).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/post-to-social", base))
        .header("origin", "https://studio.example")
        .header("access-control-request-method", "POST")
        .header(
            "access-control-request-headers",
            "authorization, x-client-info, apikey, content-type",
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let allowed = response.headers()["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_lowercase();
    for name in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(name), "missing {} in {}", name, allowed);
    }
}

#[tokio::test]
async fn test_health_lists_configured_platforms() {
    let base = spawn_app(Config::default(), twitter_source()).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "platforms": ["twitter"]}));
}

#[tokio::test]
async fn test_unsupported_platform_is_bad_request() {
    let base = spawn_app(Config::default(), twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .header("origin", "https://studio.example")
        .json(&json!({"platform": "mastodon", "content": "Hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Unsupported platform: mastodon"}));
}

#[tokio::test]
async fn test_missing_content_is_bad_request() {
    let base = spawn_app(Config::default(), twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "twitter"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid input: Platform and content are required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let base = spawn_app(Config::default(), twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_missing_credentials_is_server_error() {
    let base = spawn_app(Config::default(), MapSource::new()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "linkedin", "content": "Hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("LinkedIn credentials not properly configured"));
}

#[tokio::test]
async fn test_tweet_round_trip_through_http() {
    let twitter = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "42"}})))
        .expect(1)
        .mount(&twitter)
        .await;

    let config = Config {
        twitter: TwitterConfig {
            api_base: twitter.uri(),
        },
        ..Config::default()
    };
    let base = spawn_app(config, twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "twitter", "content": "Hello world"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "text");
    assert_eq!(body["postId"], "42");
}

#[tokio::test]
async fn test_provider_rejection_is_bad_gateway_with_details() {
    let twitter = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You are not permitted to perform this action."
        })))
        .mount(&twitter)
        .await;

    let config = Config {
        twitter: TwitterConfig {
            api_base: twitter.uri(),
        },
        ..Config::default()
    };
    let base = spawn_app(config, twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "x", "content": "Hello world"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("not permitted"));
}

#[tokio::test]
async fn test_generate_social_content() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "A new identity for a local bakery."}}]
        })))
        .expect(1)
        .mount(&openai)
        .await;

    let config = Config {
        openai: OpenAiConfig {
            api_base: openai.uri(),
            ..OpenAiConfig::default()
        },
        ..Config::default()
    };
    let base = spawn_app(config, MapSource::new().with(OPENAI_API_KEY, "sk-test")).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate-social-content", base))
        .json(&json!({
            "projectTitle": "Brand refresh",
            "projectDescription": "Bakery identity",
            "platform": "linkedin"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"content": "A new identity for a local bakery."}));
}

#[tokio::test]
async fn test_generate_without_openai_key_is_server_error() {
    let base = spawn_app(Config::default(), MapSource::new()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate-social-content", base))
        .json(&json!({
            "projectTitle": "Brand refresh",
            "projectDescription": "Bakery identity",
            "platform": "linkedin"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_tweet_with_empty_success_body_is_ok() {
    let twitter = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&twitter)
        .await;

    let config = Config {
        twitter: TwitterConfig {
            api_base: twitter.uri(),
        },
        ..Config::default()
    };
    let base = spawn_app(config, twitter_source()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "twitter", "content": "Hello world"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "type": "text"}));
}

#[tokio::test]
async fn test_unusable_linkedin_token_is_server_error_with_reason() {
    let source = MapSource::new()
        .with(LINKEDIN_ACCESS_TOKEN, "li\u{7f}token")
        .with(LINKEDIN_USER_ID, "abc123");
    let base = spawn_app(Config::default(), source).await;

    let response = reqwest::Client::new()
        .post(format!("{}/post-to-social", base))
        .json(&json!({"platform": "linkedin", "content": "Hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("LinkedIn credentials not properly configured"));
    assert!(error.contains("access_token"));
    assert!(!error.contains("missing:"));
}
