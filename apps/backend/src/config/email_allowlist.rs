//! Optional allow-list restricting which identity-provider accounts may sign in.
//!
//! Loaded from `ALLOWED_EMAILS`. Unset or blank means every profile the
//! provider authenticates is accepted.

use unicode_normalization::UnicodeNormalization;

/// Email allow-list with exact entries and `*` wildcards.
///
/// Patterns can be:
/// - Exact emails: `alice@contoso.com`
/// - Domain wildcards: `*@contoso.com`
/// - Subdomain wildcards: `alice@*.contoso.com`
#[derive(Debug, Clone)]
pub struct EmailAllowlist {
    patterns: Vec<String>,
}

impl EmailAllowlist {
    /// Parse a comma-separated pattern list. Returns `None` when nothing usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let patterns: Vec<String> = raw
            .split(',')
            .map(normalize_email)
            .filter(|s| !s.is_empty())
            .collect();

        if patterns.is_empty() {
            None
        } else {
            Some(Self { patterns })
        }
    }

    pub fn is_allowed(&self, email: &str) -> bool {
        let normalized = normalize_email(email);
        if normalized.is_empty() {
            return false;
        }
        self.patterns
            .iter()
            .any(|pattern| matches_pattern(&normalized, pattern))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Trim, NFKC-normalize and lowercase.
fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Glob match where `*` spans any run of characters, including none.
fn matches_pattern(email: &str, pattern: &str) -> bool {
    let mut segments = pattern.split('*');
    // split always yields at least one segment
    let first = segments.next().unwrap_or_default();
    let Some(mut rest) = email.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = segments.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}
