//! One `request_completed` event per request.
//!
//! Requests are identified by their route pattern, never by the raw path or
//! query string: the callback carries the authorization code in its query
//! and the success redirect carries the issued token in its `Location`.
//! Redirects are summarized as an outcome instead.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, StatusCode};
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;
use tracing::{event, Level};

use crate::middleware::request_trace::request_id;
use crate::routes::auth::{FAILURE_PATH, SUCCESS_PATH};

/// Route label for requests that matched no resource.
const UNMATCHED_ROUTE: &str = "unmatched";

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// Everything the completion event records about a request.
struct Completion {
    method: String,
    route: String,
    trace_id: String,
    status: StatusCode,
    redirect: Option<&'static str>,
    duration_ms: u64,
}

impl Completion {
    fn emit(&self) {
        let Self {
            method,
            route,
            trace_id,
            status,
            redirect,
            duration_ms,
        } = self;

        macro_rules! completed {
            ($level:expr) => {
                event!(
                    $level,
                    http.method = %method,
                    http.route = %route,
                    http.status_code = status.as_u16(),
                    redirect = *redirect,
                    duration_ms = *duration_ms,
                    trace_id = %trace_id,
                    "request_completed"
                )
            };
        }

        if status.is_server_error() {
            completed!(Level::ERROR);
        } else if status.is_client_error() {
            completed!(Level::WARN);
        } else {
            completed!(Level::INFO);
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
        let trace_id = request_id(&req).unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, redirect) = match &result {
                Ok(res) => (res.status(), redirect_of(res)),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            Completion {
                method,
                route,
                trace_id,
                status,
                redirect,
                duration_ms: start.elapsed().as_millis() as u64,
            }
            .emit();

            result
        })
    }
}

fn redirect_of<B>(res: &ServiceResponse<B>) -> Option<&'static str> {
    if !res.status().is_redirection() {
        return None;
    }
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Some(redirect_outcome(location))
}

/// Classify a redirect target without exposing it.
fn redirect_outcome(location: &str) -> &'static str {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    if path == FAILURE_PATH {
        "login_failed"
    } else if path.ends_with(SUCCESS_PATH) {
        "login_succeeded"
    } else {
        "identity_provider"
    }
}
