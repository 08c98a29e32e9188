// Integration tests for the provider callback.
//
// Success ends in a redirect to the front end carrying a token; every
// failure ends in a redirect to /auth/failure without one.

use std::sync::Arc;
use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::test;
use auth_gateway::config::EmailAllowlist;
use auth_gateway::state::{AppState, AuthSettings};
use auth_gateway::test_support::{
    create_test_app, test_security, test_state, FakeIdentityProvider, FAKE_STATE,
};
use auth_gateway::verify_access_token;

use crate::common::{alice_profile, location, login_state_cookie};
use crate::support::auth::alice_claims;
use crate::support::flow::{start_login, success_query};

fn token_from(location: &str) -> &str {
    location
        .split_once("?token=")
        .map(|(_, token)| token)
        .expect("success redirect should carry a token")
}

#[actix_web::test]
async fn success_redirects_to_frontend_with_token() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let target = location(&resp);
    assert!(
        target.starts_with("http://localhost:3000/login-success?token="),
        "got {target}"
    );

    let claims = verify_access_token(token_from(&target), SystemTime::now(), &test_security())
        .expect("issued token should verify");
    assert_eq!(claims.user, alice_claims());
    assert_eq!(claims.exp - claims.iat, 60 * 60);
}

#[actix_web::test]
async fn form_post_callback_succeeds() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::post()
        .uri("/auth/microsoft/callback")
        .cookie(cookie)
        .set_form([("code", "auth-code-1"), ("state", FAKE_STATE)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).contains("/login-success?token="));
}

#[actix_web::test]
async fn callback_clears_login_state_cookie() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let cleared = login_state_cookie(&resp).expect("callback should reset the cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(
        cleared.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
}

#[actix_web::test]
async fn provider_denial_never_issues_token() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let target = location(&resp);
    assert_eq!(target, "/auth/failure");
    assert!(!target.contains("token="));
}

#[actix_web::test]
async fn provider_error_parameter_redirects_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::post()
        .uri("/auth/microsoft/callback")
        .cookie(cookie)
        .set_form([
            ("error", "access_denied"),
            ("error_description", "AADSTS65004: User declined to consent"),
            ("state", FAKE_STATE),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/auth/failure");
}

#[actix_web::test]
async fn missing_login_state_cookie_redirects_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;

    let req = test::TestRequest::get().uri(&success_query()).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/failure");
}

#[actix_web::test]
async fn forged_state_redirects_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri("/auth/microsoft/callback?code=auth-code-1&state=attacker-state")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/auth/failure");
}

#[actix_web::test]
async fn tampered_login_state_cookie_redirects_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let mut cookie = start_login(&app).await;
    cookie.set_value(format!("{}x", cookie.value()));

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/auth/failure");
}

#[actix_web::test]
async fn allowlist_rejects_unlisted_email() {
    let settings = AuthSettings {
        email_allowlist: EmailAllowlist::parse("*@fabrikam.com"),
        ..AuthSettings::default()
    };
    let state = AppState::new(
        test_security(),
        settings,
        Arc::new(FakeIdentityProvider::returning(alice_profile())),
    );
    let app = create_test_app(state).build().await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/auth/failure");
}

#[actix_web::test]
async fn allowlist_admits_listed_email_and_uses_frontend_url() {
    let settings = AuthSettings {
        frontend_url: "https://app.contoso.com".to_string(),
        email_allowlist: EmailAllowlist::parse("*@contoso.com"),
        ..AuthSettings::default()
    };
    let state = AppState::new(
        test_security(),
        settings,
        Arc::new(FakeIdentityProvider::returning(alice_profile())),
    );
    let app = create_test_app(state).build().await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&success_query())
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(location(&resp).starts_with("https://app.contoso.com/login-success?token="));
}

#[actix_web::test]
async fn duplicate_query_keys_redirect_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/auth/microsoft/callback?code=a&code=b&state={FAKE_STATE}"
        ))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/failure");
    let cleared = login_state_cookie(&resp).expect("failure should reset the cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn post_without_form_content_type_redirects_to_failure() {
    let app = create_test_app(test_state(FakeIdentityProvider::returning(alice_profile())))
        .build()
        .await;
    let cookie = start_login(&app).await;

    let req = test::TestRequest::post()
        .uri("/auth/microsoft/callback")
        .cookie(cookie)
        .set_payload("error=access_denied")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/failure");
    assert!(login_state_cookie(&resp).is_some());
}
