use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email addresses, as they appear in provider claims and error text.
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL_REGEX
}

/// Compact JWTs (`header.payload.signature`), e.g. an access token echoed in a reason.
fn jwt_regex() -> &'static Regex {
    static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
    });
    &JWT_REGEX
}

/// Mask emails to `first-char***@domain` and replace JWTs with `[REDACTED_TOKEN]`.
pub fn redact(input: &str) -> String {
    let masked = email_regex().replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });

    jwt_regex()
        .replace_all(&masked, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Formats as [`redact`] of the wrapped string.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
