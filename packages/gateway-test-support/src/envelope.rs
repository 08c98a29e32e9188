//! Assertions over the gateway's JSON envelopes.
//!
//! Kept independent of the gateway crate's types so the wire contract is
//! checked from the outside.

use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct FailEnvelopeLike {
    status: String,
    message: String,
}

/// Assert that response parts carry a `{status:"fail", message}` envelope.
///
/// Checks the HTTP status, the JSON content type, the presence of
/// `x-trace-id`, and the exact message.
pub fn assert_fail_envelope_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_message: &str,
) {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "Content-Type must be application/json (got {content_type})"
    );

    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    let envelope: FailEnvelopeLike =
        serde_json::from_slice(body).expect("body should be a fail envelope");
    assert_eq!(envelope.status, "fail");
    assert_eq!(envelope.message, expected_message);
}

/// Assert that a service response is a fail envelope with the given message.
pub async fn assert_fail_envelope(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_status: StatusCode,
    expected_message: &str,
) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_fail_envelope_from_parts(status, &headers, &body, expected_status, expected_message);
}

/// Read an `{status:"ok", ...}` body and return the parsed JSON.
pub async fn read_ok_envelope(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
) -> Value {
    assert_eq!(resp.status(), StatusCode::OK);
    let body = actix_web::test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("body should be JSON");
    assert_eq!(json["status"], "ok");
    json
}
