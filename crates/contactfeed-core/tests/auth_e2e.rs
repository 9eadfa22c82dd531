//! E2E tests for the service-account token exchange.
//!
//! The token endpoint is a mockito server; the key is a throwaway RSA key
//! under `tests/fixtures`.

use std::path::PathBuf;

use contactfeed_core::auth::JWT_BEARER_GRANT;
use contactfeed_core::{authenticate, AuthConfig, AuthError, ServiceAccountKey};
use mockito::{Matcher, Server};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config(token_uri: String) -> AuthConfig {
    AuthConfig {
        impersonated_user: Some("owner@example.test".into()),
        token_uri: Some(token_uri),
        ..Default::default()
    }
}

/// Test: a JSON key is exchanged for a bearer token.
#[tokio::test]
async fn test_authenticate_with_json_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), JWT_BEARER_GRANT.into()),
            Matcher::Regex(r"assertion=[\w-]+\.[\w-]+\.[\w-]+".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"ya29.fresh","token_type":"Bearer","expires_in":3600}"#)
        .create_async()
        .await;

    let key = ServiceAccountKey::from_file(&fixture("service_account.json")).unwrap();
    let session = authenticate(&key, &config(format!("{}/token", server.url())))
        .await
        .unwrap();

    mock.assert_async().await;
    let credential = session.credential();
    assert_eq!(credential.access_token, "ya29.fresh");
    assert_eq!(
        credential.service_account_id,
        "sync@contactfeed-test.iam.gserviceaccount.com"
    );
    assert_eq!(credential.impersonated_user.as_deref(), Some("owner@example.test"));
    assert!(credential.expires_at.is_some());
    assert!(!credential.is_expired());
    assert_eq!(session.access_token().unwrap(), "ya29.fresh");
}

/// Test: a bare PEM key needs the service account id from configuration.
#[tokio::test]
async fn test_pem_key_requires_service_account() {
    let key = ServiceAccountKey::from_file(&fixture("service_account.pem")).unwrap();

    let err = authenticate(&key, &config("http://127.0.0.1:9/token".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingServiceAccount));
}

/// Test: a configured service account overrides the key's client_email.
#[tokio::test]
async fn test_pem_key_with_configured_service_account() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"access_token":"ya29.pem","expires_in":60}"#)
        .create_async()
        .await;

    let key = ServiceAccountKey::from_file(&fixture("service_account.pem")).unwrap();
    let mut cfg = config(format!("{}/token", server.url()));
    cfg.service_account_id = Some("other@contactfeed-test.iam.gserviceaccount.com".into());

    let session = authenticate(&key, &cfg).await.unwrap();
    assert_eq!(
        session.credential().service_account_id,
        "other@contactfeed-test.iam.gserviceaccount.com"
    );
    assert_eq!(session.credential().token_type, "Bearer");
}

/// Test: a refused grant is a token exchange failure carrying the reason.
#[tokio::test]
async fn test_rejected_grant() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#)
        .create_async()
        .await;

    let key = ServiceAccountKey::from_file(&fixture("service_account.json")).unwrap();
    let err = authenticate(&key, &config(format!("{}/token", server.url())))
        .await
        .unwrap_err();

    match err {
        AuthError::TokenExchangeFailed(message) => {
            assert!(message.contains("invalid_grant"), "{message}");
            assert!(message.contains("Invalid JWT Signature."), "{message}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

/// Test: an unreadable key file is reported with its path.
#[test]
fn test_missing_key_file() {
    let err = ServiceAccountKey::from_file(&fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, AuthError::KeyFile { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
}

/// Test: an `expires_in` outside the representable range is rejected.
#[tokio::test]
async fn test_out_of_range_expires_in() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"t","expires_in":9223372036854775807}"#)
        .create_async()
        .await;

    let key = ServiceAccountKey::from_file(&fixture("service_account.json")).unwrap();
    let err = authenticate(&key, &config(format!("{}/token", server.url())))
        .await
        .unwrap_err();

    match err {
        AuthError::TokenExchangeFailed(message) => {
            assert!(message.contains("expires_in"), "{message}")
        }
        other => panic!("unexpected error {other:?}"),
    }
}
