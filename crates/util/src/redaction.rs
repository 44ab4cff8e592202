//! Redaction of credentials before request details reach logs or stdout.

use once_cell::sync::Lazy;
use regex::Regex;

const REPLACEMENT: &str = "[REDACTED]";

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)(bearer\s+)?([\w\-\.=:/+]+)",
        r#"(?i)("?(?:password|newPassword|token)"?\s*[:=]\s*"?)([^"\s,}]+)"#,
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Replace values that look like secrets with `[REDACTED]`, keeping the key names.
///
/// ```rust
/// use admin_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("authorization: Bearer abc.def"), "authorization: [REDACTED]");
/// assert_eq!(redact_sensitive("ADMIN_API_TOKEN=xyz"), "ADMIN_API_TOKEN=[REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REPLACEMENT}")
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_json_password_fields() {
        let body = r#"{"email":"ops@example.com","password":"hunter2"}"#;
        assert_eq!(
            redact_sensitive(body),
            r#"{"email":"ops@example.com","password":"[REDACTED]"}"#
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive("GET /menu?page=1"), "GET /menu?page=1");
    }
}
