//! Microsoft login flow and token introspection.
//!
//! The two redirect legs never answer with an error body: every failure
//! ends in a `302` to `/auth/failure`, which renders the 401 envelope.

use std::time::SystemTime;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::auth::claims::TokenClaims;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::logging::security;
use crate::oidc::login_state::{self, LOGIN_STATE_COOKIE};
use crate::oidc::provider::CallbackParams;
use crate::state::app_state::AppState;

pub const FAILURE_PATH: &str = "/auth/failure";
/// Front-end page that receives the issued token, relative to `FRONTEND_URL`
pub const SUCCESS_PATH: &str = "/login-success";

#[derive(Debug, Serialize)]
struct MeResponse {
    status: &'static str,
    user: TokenClaims,
}

fn redirect(location: &str, cookie: Cookie<'static>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// Start a login: remember the pending state in a cookie and send the
/// browser to the provider.
async fn microsoft_login(app_state: web::Data<AppState>) -> HttpResponse {
    let started = app_state.provider.begin_login().and_then(|login| {
        let sealed = login_state::seal(&login.pending, SystemTime::now(), &app_state.security)?;
        Ok((login.authorize_url, sealed))
    });

    match started {
        Ok((authorize_url, sealed)) => {
            redirect(&authorize_url, login_state::login_state_cookie(sealed))
        }
        Err(e) => {
            security::login_failed(&e.to_string(), None);
            redirect(FAILURE_PATH, login_state::clear_login_state_cookie())
        }
    }
}

async fn microsoft_callback_query(
    req: HttpRequest,
    params: Result<web::Query<CallbackParams>, actix_web::Error>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let params = params.map(web::Query::into_inner).map_err(malformed_callback);
    finish_login(&req, &app_state, params).await
}

/// `response_mode=form_post` delivers the callback as a form POST.
async fn microsoft_callback_form(
    req: HttpRequest,
    params: Result<web::Form<CallbackParams>, actix_web::Error>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let params = params.map(web::Form::into_inner).map_err(malformed_callback);
    finish_login(&req, &app_state, params).await
}

/// Unparsable callbacks (duplicate keys, wrong content type) are denials too.
fn malformed_callback(err: actix_web::Error) -> AppError {
    AppError::provider_denied(format!("malformed callback: {err}"))
}

async fn finish_login(
    req: &HttpRequest,
    app_state: &AppState,
    params: Result<CallbackParams, AppError>,
) -> HttpResponse {
    let cleared = login_state::clear_login_state_cookie();

    let outcome = match params {
        Ok(params) => authenticate(req, app_state, &params).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(token) => {
            let location = format!(
                "{}{SUCCESS_PATH}?token={token}",
                app_state.settings.frontend_url
            );
            redirect(&location, cleared)
        }
        Err(e) => {
            security::login_failed(&e.to_string(), None);
            redirect(FAILURE_PATH, cleared)
        }
    }
}

/// Correlate the callback with its pending login, exchange it for a
/// profile and issue an access token.
async fn authenticate(
    req: &HttpRequest,
    app_state: &AppState,
    params: &CallbackParams,
) -> Result<String, AppError> {
    let now = SystemTime::now();

    let sealed = req
        .cookie(LOGIN_STATE_COOKIE)
        .ok_or_else(|| AppError::provider_denied("login state cookie missing"))?;
    let pending = login_state::open(sealed.value(), now, &app_state.security)?;

    let profile = app_state.provider.complete_login(params, &pending).await?;

    if let Some(allowlist) = &app_state.settings.email_allowlist {
        if !allowlist.is_allowed(&profile.preferred_username) {
            return Err(AppError::provider_denied(format!(
                "email not on allow-list: {}",
                profile.preferred_username
            )));
        }
    }

    let token = app_state.issuer.issue(&profile, now)?;
    security::login_succeeded(&profile.subject_id, &profile.preferred_username);

    Ok(token)
}

async fn failure() -> Result<HttpResponse, AppError> {
    Err(AppError::provider_denied("login did not complete"))
}

async fn me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        status: "ok",
        user: user.0,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/microsoft", web::get().to(microsoft_login))
        .service(
            web::resource("/microsoft/callback")
                .route(web::get().to(microsoft_callback_query))
                .route(web::post().to(microsoft_callback_form)),
        )
        .route("/failure", web::get().to(failure))
        .route("/me", web::get().to(me));
}
