// Integration tests for /auth/me bearer verification.

use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::test;
use auth_gateway::oidc::login_state::seal;
use auth_gateway::oidc::PendingLogin;
use auth_gateway::test_support::{
    create_test_app, test_security, test_state, FakeIdentityProvider,
};
use auth_gateway::SecurityConfig;
use gateway_test_support::envelope::{assert_fail_envelope, read_ok_envelope};

use crate::support::auth::{alice_claims, bearer_header, expired_bearer_header};

#[actix_web::test]
async fn valid_token_returns_claims() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", bearer_header(&alice_claims(), &test_security())))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let json = read_ok_envelope(resp).await;
    let user = &json["user"];
    assert_eq!(user["id"], "abc-123");
    assert_eq!(user["email"], "alice@contoso.com");
    assert_eq!(user["name"], "Alice A.");
    assert!(user["iat"].is_i64());
    assert!(user["exp"].is_i64());
}

#[actix_web::test]
async fn missing_header_is_rejected() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("www-authenticate").unwrap(), "Bearer");
    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "No authorization header").await;
}

#[actix_web::test]
async fn header_without_token_segment_is_invalid() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", "Malformed"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "Invalid token").await;
}

#[actix_web::test]
async fn expired_token_is_invalid() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header((
            "Authorization",
            expired_bearer_header(&alice_claims(), &test_security()),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "Invalid token").await;
}

#[actix_web::test]
async fn token_from_other_secret_is_invalid() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;
    let other = SecurityConfig::new("some-other-deployment-secret".as_bytes());

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", bearer_header(&alice_claims(), &other)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "Invalid token").await;
}

#[actix_web::test]
async fn login_state_value_is_not_a_bearer_token() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;
    let pending = PendingLogin {
        state: "s".to_string(),
        nonce: "n".to_string(),
        pkce_verifier: "v".to_string(),
    };
    let sealed = seal(&pending, SystemTime::now(), &test_security()).unwrap();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("Authorization", format!("Bearer {sealed}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "Invalid token").await;
}
