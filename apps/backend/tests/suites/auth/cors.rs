// Cross-origin access to /auth/me from the front end.

use actix_web::http::{header, StatusCode};
use actix_web::test;
use auth_gateway::test_support::{
    create_test_app, test_security, test_state, FakeIdentityProvider,
};

use crate::support::auth::{alice_claims, bearer_header};

const FRONTEND: &str = "http://localhost:3000";

fn preflight(origin: &str) -> test::TestRequest {
    test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/auth/me")
        .insert_header((header::ORIGIN, origin))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
}

#[actix_web::test]
async fn preflight_from_frontend_is_allowed() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let resp = test::call_service(&app, preflight(FRONTEND).to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        FRONTEND
    );
    let allowed_headers = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(allowed_headers.contains("authorization"), "{allowed_headers}");
    assert!(headers.contains_key("x-request-id"));
}

#[actix_web::test]
async fn preflight_from_unknown_origin_is_refused() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let resp = test::call_service(&app, preflight("https://evil.example").to_request()).await;

    assert!(resp.status().is_client_error());
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_web::test]
async fn configured_origins_replace_the_default() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .with_cors_origins(["https://app.contoso.example"])
        .build()
        .await;

    let resp = test::call_service(&app, preflight(FRONTEND).to_request()).await;
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let resp = test::call_service(
        &app,
        preflight("https://app.contoso.example").to_request(),
    )
    .await;
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.contoso.example"
    );
}

#[actix_web::test]
async fn cross_origin_me_exposes_trace_headers() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header((header::ORIGIN, FRONTEND))
        .insert_header((
            header::AUTHORIZATION,
            bearer_header(&alice_claims(), &test_security()),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        FRONTEND
    );
    let exposed = resp
        .headers()
        .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(exposed.contains("x-request-id"), "{exposed}");
}
