pub mod claims;
pub mod issuer;
pub mod jwt;
pub mod verifier;

pub use claims::{ClaimSet, TokenClaims};
pub use issuer::TokenIssuer;
pub use verifier::TokenVerifier;
