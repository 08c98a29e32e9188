use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a completed login. The subject id is logged as-is, the email masked.
pub fn login_succeeded(subject_id: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_LOGIN_SUCCEEDED",
        %trace_id,
        subject_id,
        email = %Redacted(email),
        "Authentication succeeded"
    );
}

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason = %Redacted(reason),
        "Authentication failure"
    );
}

/// Log a bearer token that failed verification.
pub fn token_rejected(reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        "Access token rejected"
    );
}
