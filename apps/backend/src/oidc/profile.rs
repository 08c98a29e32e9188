use serde_json::{Map, Value};

/// Identity returned by the provider after a successful callback.
///
/// Lives only for the duration of the callback request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Opaque, stable subject identifier (`oid` for Azure AD)
    pub subject_id: String,
    pub preferred_username: String,
    pub display_name: Option<String>,
    /// Raw ID-token payload
    pub raw: Map<String, Value>,
}

impl Profile {
    /// Build a profile from a verified ID-token payload.
    ///
    /// `oid` identifies the user across applications in the tenant; `sub` is
    /// used only when the token carries no `oid`.
    pub fn from_id_token_claims(raw: Map<String, Value>) -> Self {
        let string_claim = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        let subject_id = string_claim("oid")
            .or_else(|| string_claim("sub"))
            .unwrap_or_default();
        let preferred_username = string_claim("preferred_username").unwrap_or_default();
        let display_name = string_claim("name");

        Self {
            subject_id,
            preferred_username,
            display_name,
            raw,
        }
    }

    /// `name` from the raw attributes, if it is a string.
    pub fn raw_name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }
}
