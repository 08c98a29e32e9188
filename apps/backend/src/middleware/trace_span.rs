//! Per-request tracing span.
//!
//! Handler events (security events included) inherit the trace id and route
//! from a span named `request`; the status is recorded on it once the
//! response is known. Must be registered before `RequestTrace` so that the
//! trace id is already in the request extensions.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use tracing::{field, info_span, Instrument, Span};

use crate::middleware::request_trace::request_id;

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

fn request_span(req: &ServiceRequest) -> Span {
    let trace_id = request_id(req).unwrap_or_else(|| "unknown".to_string());
    let route = req
        .match_pattern()
        .unwrap_or_else(|| "unmatched".to_string());
    info_span!(
        "request",
        trace_id = %trace_id,
        http.method = %req.method(),
        http.route = %route,
        http.status_code = field::Empty,
    )
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let span = request_span(&req);
        // Extractors and handlers may log before the future is first polled
        let fut = span.in_scope(|| self.service.call(req));

        let recorder = span.clone();
        Box::pin(
            async move {
                let result = fut.await;
                let status = match &result {
                    Ok(res) => res.status(),
                    Err(err) => err.as_response_error().status_code(),
                };
                recorder.record("http.status_code", status.as_u16());
                result
            }
            .instrument(span),
        )
    }
}
