//! Short stable identifiers naming the kind of a diagnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A short, stable identifier for a kind of diagnostic, e.g. `X001` or
/// `yaml-syntax-error`.
///
/// Codes are opaque to the sink; they are rendered before the message and
/// written to the durable log so tooling can filter on them.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticCode(String);

/// Error returned by [`DiagnosticCode::try_new`] for an unusable code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid diagnostic code '{0}': codes must be non-empty and contain no whitespace")]
pub struct InvalidCodeError(pub String);

impl DiagnosticCode {
    /// Creates a code from a producer-supplied identifier.
    ///
    /// Intended for literal codes; use [`try_new`](Self::try_new) for codes
    /// read from untrusted input.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Creates a code, rejecting empty strings and strings containing whitespace.
    pub fn try_new(code: impl Into<String>) -> Result<Self, InvalidCodeError> {
        let code = code.into();
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(InvalidCodeError(code));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiagnosticCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_code() {
        assert_eq!(DiagnosticCode::new("X001").to_string(), "X001");
        assert_eq!(
            DiagnosticCode::from("yaml-syntax-error").as_str(),
            "yaml-syntax-error"
        );
    }

    #[test]
    fn try_new_rejects_empty_and_whitespace() {
        assert!(DiagnosticCode::try_new("").is_err());
        assert!(DiagnosticCode::try_new("bad code").is_err());
        assert!(DiagnosticCode::try_new("W002").is_ok());
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&DiagnosticCode::new("W002")).unwrap();
        assert_eq!(json, "\"W002\"");
    }
}
