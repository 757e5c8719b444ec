//! Redacting wrapper for API keys.

use std::fmt;

/// A string whose value never appears in `Debug` or `Display` output.
///
/// # Example
///
/// ```
/// use credibility_analyzer::config::SecretString;
///
/// let key = SecretString::new("sk-ant-api-key-123");
/// assert_eq!(format!("{key:?}"), "<REDACTED>");
/// assert_eq!(key.expose(), "sk-ant-api-key-123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The underlying value. Only call this where the secret is actually used.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True if the value is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_is_redacted() {
        let secret = SecretString::new("sk-ant-REDACTED");
        assert_eq!(format!("{secret:?}"), "<REDACTED>");
        assert_eq!(format!("{secret}"), "<REDACTED>");
        assert_eq!(secret.expose(), "sk-ant-REDACTED");
    }

    #[test]
    fn test_is_blank() {
        assert!(SecretString::new("").is_blank());
        assert!(SecretString::new(" \t").is_blank());
        assert!(!SecretString::from("key".to_string()).is_blank());
    }
}
