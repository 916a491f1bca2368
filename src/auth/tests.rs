//! Tests for the auth module

use super::*;
use crate::error::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn mint_jwt(sub: &str, exp: Option<i64>) -> String {
    let mut claims = serde_json::json!({ "sub": sub });
    if let Some(exp) = exp {
        claims["exp"] = exp.into();
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"not-checked"),
    )
    .unwrap()
}

async fn mount_login(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v2/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn login_provider(server: &MockServer, clock: Arc<ManualClock>) -> LoginTokenProvider {
    LoginTokenProvider::with_client(
        Credentials::new("alice", "hunter2"),
        &format!("{}/v2", server.uri()),
        reqwest::Client::new(),
    )
    .with_clock(clock)
}

// ============================================================================
// Login Token Provider
// ============================================================================

#[tokio::test]
async fn test_login_posts_credentials() {
    let server = MockServer::start().await;
    let jwt = mint_jwt("alice", Some(start().timestamp() + 3600));

    Mock::given(method("POST"))
        .and(path("/v2/users/login"))
        .and(body_json(serde_json::json!({
            "username": "alice",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": jwt })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = login_provider(&server, ManualClock::new(start()));
    assert_eq!(provider.ensure_token().await.unwrap(), jwt);
    assert_eq!(provider.identity(), "alice");
    assert_eq!(
        provider.cached_expiry().await,
        Some(start() + chrono::Duration::seconds(3600))
    );
}

#[tokio::test]
async fn test_cached_token_skips_login() {
    let server = MockServer::start().await;
    let jwt = mint_jwt("alice", Some(start().timestamp() + 3600));
    mount_login(&server, &jwt, 1).await;

    let clock = ManualClock::new(start());
    let provider = login_provider(&server, clock.clone());

    for _ in 0..5 {
        assert_eq!(provider.ensure_token().await.unwrap(), jwt);
        clock.advance(chrono::Duration::seconds(60));
    }
}

#[tokio::test]
async fn test_token_refreshed_after_the_hour() {
    let server = MockServer::start().await;
    let jwt = mint_jwt("alice", Some(start().timestamp() + 3600));
    mount_login(&server, &jwt, 2).await;

    let clock = ManualClock::new(start());
    let provider = login_provider(&server, clock.clone());

    provider.ensure_token().await.unwrap();
    clock.advance(chrono::Duration::seconds(3599));
    provider.ensure_token().await.unwrap();

    // The token expires exactly now, which counts as expired.
    clock.advance(chrono::Duration::seconds(1));
    provider.ensure_token().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_cold_cache_logs_in_once() {
    let server = MockServer::start().await;
    let jwt = mint_jwt("alice", Some(start().timestamp() + 3600));

    Mock::given(method("POST"))
        .and(path("/v2/users/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "token": jwt }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(login_provider(&server, ManualClock::new(start())));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.ensure_token().await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), jwt);
    }
}

#[tokio::test]
async fn test_token_without_expiry_is_rejected() {
    let server = MockServer::start().await;
    mount_login(&server, &mint_jwt("alice", None), 2).await;

    let provider = login_provider(&server, ManualClock::new(start()));
    assert!(matches!(provider.ensure_token().await, Err(Error::NoExpiry)));

    // Nothing was cached, so the next call tries again.
    assert!(matches!(provider.ensure_token().await, Err(Error::NoExpiry)));
    assert!(provider.cached_expiry().await.is_none());
}

#[tokio::test]
async fn test_login_failure_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"detail":"Incorrect authentication credentials"}"#))
        .mount(&server)
        .await;

    let provider = login_provider(&server, ManualClock::new(start()));
    match provider.ensure_token().await {
        Err(Error::LoginFailed { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Incorrect authentication credentials"));
        }
        other => panic!("expected LoginFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let provider = login_provider(&server, ManualClock::new(start()));
    assert!(matches!(
        provider.ensure_token().await,
        Err(Error::Decode { .. })
    ));
}

#[tokio::test]
async fn test_clear_cache_forces_login() {
    let server = MockServer::start().await;
    let jwt = mint_jwt("alice", Some(start().timestamp() + 3600));
    mount_login(&server, &jwt, 2).await;

    let provider = login_provider(&server, ManualClock::new(start()));
    provider.ensure_token().await.unwrap();
    provider.clear_cache().await;
    provider.ensure_token().await.unwrap();
}

#[tokio::test]
async fn test_login_from_source_rejects_empty_password() {
    let source = StaticCredentials::new().with("reg", Credentials::new("alice", ""));
    let result =
        LoginTokenProvider::from_source(&source, "reg", "https://hub.example/v2", reqwest::Client::new())
            .await;
    assert!(matches!(
        result,
        Err(Error::MissingCredential { field }) if field == "secret"
    ));
}

// ============================================================================
// Access Token Provider
// ============================================================================

#[derive(Debug)]
struct CountingSource {
    token: String,
    calls: AtomicUsize,
}

#[async_trait]
impl CredentialSource for CountingSource {
    async fn pull_credentials(&self, key: &str) -> crate::Result<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if key.ends_with("/access-token") {
            Ok(Credentials::new("bot", self.token.clone()))
        } else {
            Err(Error::source_unavailable(key, "unknown key"))
        }
    }
}

#[tokio::test]
async fn test_access_token_reread_every_call() {
    let source = Arc::new(CountingSource {
        token: mint_jwt("bot", Some(start().timestamp() + 60)),
        calls: AtomicUsize::new(0),
    });
    let provider = AccessTokenProvider::new(source.clone(), "reg").with_clock(ManualClock::new(start()));

    assert_eq!(provider.identity(), "");
    for _ in 0..3 {
        assert_eq!(provider.ensure_token().await.unwrap(), source.token);
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert_eq!(provider.identity(), "bot");
}

#[tokio::test]
async fn test_access_token_expired_is_unavailable() {
    let source = Arc::new(CountingSource {
        token: mint_jwt("bot", Some(start().timestamp())),
        calls: AtomicUsize::new(0),
    });
    let provider = AccessTokenProvider::new(source, "reg").with_clock(ManualClock::new(start()));

    assert!(matches!(
        provider.ensure_token().await,
        Err(Error::TokenSourceUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_access_token_missing_source_entry() {
    let source: Arc<dyn CredentialSource> = Arc::new(StaticCredentials::new());
    let result = AccessTokenProvider::from_source(source, "reg").await;
    match result {
        Err(Error::TokenSourceUnavailable { key, .. }) => assert_eq!(key, "reg/access-token"),
        other => panic!("expected TokenSourceUnavailable, got {other:?}"),
    }
}

// ============================================================================
// Token Source
// ============================================================================

#[tokio::test]
async fn test_token_source_dispatch() {
    let clock: Arc<dyn Clock> = ManualClock::new(start());

    let login = TokenSource::Login(Credentials::new("alice", "pw"))
        .into_provider("https://hub.example/v2", reqwest::Client::new(), clock.clone())
        .unwrap();
    assert_eq!(login.identity(), "alice");

    let rejected = TokenSource::Login(Credentials::new("", "pw")).into_provider(
        "https://hub.example/v2",
        reqwest::Client::new(),
        clock.clone(),
    );
    assert!(rejected.is_err());

    let jwt = mint_jwt("bot", Some(start().timestamp() + 60));
    let source = StaticCredentials::new().with("reg/access-token", Credentials::new("bot", jwt.clone()));
    let access = TokenSource::AccessToken {
        source: Arc::new(source),
        key: "reg".to_string(),
    }
    .into_provider("https://hub.example/v2", reqwest::Client::new(), clock)
    .unwrap();
    assert_eq!(access.ensure_token().await.unwrap(), jwt);
    assert_eq!(access.identity(), "bot");
}
