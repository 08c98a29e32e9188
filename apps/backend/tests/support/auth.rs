//! Token helpers for tests

use std::time::{Duration, SystemTime};

use auth_gateway::{mint_access_token, ClaimSet, SecurityConfig};

pub fn alice_claims() -> ClaimSet {
    ClaimSet {
        id: "abc-123".to_string(),
        email: "alice@contoso.com".to_string(),
        name: "Alice A.".to_string(),
    }
}

/// Full Authorization header value including "Bearer " prefix
pub fn bearer_header(claims: &ClaimSet, sec: &SecurityConfig) -> String {
    let token = mint_access_token(claims, SystemTime::now(), sec).expect("mint token");
    format!("Bearer {token}")
}

/// Header for a token issued two hours ago, one hour past its expiry
pub fn expired_bearer_header(claims: &ClaimSet, sec: &SecurityConfig) -> String {
    let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
    let token = mint_access_token(claims, issued, sec).expect("mint token");
    format!("Bearer {token}")
}
