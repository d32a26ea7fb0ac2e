use std::sync::LazyLock;

use regex::Regex;

use super::MailError;

// Absolute http(s) URL with a host and nothing that could break out of an HTML attribute.
static RESET_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?i:https?)://[^/?#\s"'<>`\\]+(?:[/?#][^\s"'<>`\\]*)?$"#).unwrap()
});

/// A password-reset URL produced by the token service. It is embedded in emails
/// verbatim, so only links that are safe to place in markup unescaped are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetLink(String);

impl ResetLink {
    pub fn parse(link: &str) -> Result<Self, MailError> {
        if RESET_LINK_RE.is_match(link) {
            Ok(Self(link.to_string()))
        } else {
            Err(MailError::ResetLink(
                "reset link must be an absolute http(s) URL without markup characters".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResetLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
