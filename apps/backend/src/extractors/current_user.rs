use std::time::SystemTime;

use actix_web::dev::Payload;
use actix_web::{http::header, web, FromRequest, HttpRequest};

use crate::auth::claims::TokenClaims;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

/// Claims of a verified access token from the `Authorization` header.
///
/// Rejections are `401` envelopes: `No authorization header` when the header
/// is absent, `Invalid token` for everything else.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub TokenClaims);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let authorization = match req.headers().get(header::AUTHORIZATION) {
                Some(value) => Some(value.to_str().map_err(|_| {
                    security::token_rejected("non_ascii_header");
                    AppError::invalid_token()
                })?),
                None => None,
            };

            state
                .verifier
                .verify(authorization, SystemTime::now())
                .map(CurrentUser)
                .map_err(|e| {
                    let reason = match e {
                        AppError::MissingHeader => "missing_header",
                        _ => "invalid_token",
                    };
                    security::token_rejected(reason);
                    e
                })
        })
    }
}
