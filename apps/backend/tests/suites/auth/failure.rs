use actix_web::http::{header, StatusCode};
use actix_web::test;
use auth_gateway::test_support::{create_test_app, test_state, FakeIdentityProvider};
use gateway_test_support::envelope::assert_fail_envelope;

#[actix_web::test]
async fn failure_page_is_401_envelope() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/auth/failure").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert_fail_envelope(resp, StatusCode::UNAUTHORIZED, "Authentication failed").await;
}

#[actix_web::test]
async fn failure_trace_id_matches_request_id() {
    let app = create_test_app(test_state(FakeIdentityProvider::denying()))
        .build()
        .await;

    let req = test::TestRequest::get().uri("/auth/failure").to_request();
    let resp = test::call_service(&app, req).await;

    let trace_id = resp.headers().get("x-trace-id").unwrap();
    let request_id = resp.headers().get("x-request-id").unwrap();
    assert_eq!(trace_id, request_id);
}
