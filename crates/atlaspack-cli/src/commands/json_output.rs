//! JSON output types for machine-readable CLI output.
//!
//! The `--json` flag replaces colored status lines with a single JSON
//! document on stdout so scripts and build tools can consume the result.

use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Configuration file unreadable or invalid
    pub const CONFIG: &str = "CLI_001";
    /// Input directory or image could not be read
    pub const INPUT: &str = "CLI_002";
    /// A texture does not fit into an atlas of the configured size
    pub const DOES_NOT_FIT: &str = "CLI_003";
    /// Any other packing failure
    pub const PACK: &str = "CLI_004";
    /// Output files could not be written
    pub const OUTPUT_WRITE: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File involved in the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Suggestion for fixing the error (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            suggestion: None,
        }
    }

    /// Sets the file for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets a suggestion for fixing this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_skipped() {
        let json = serde_json::to_string(&JsonError::new(error_codes::PACK, "boom")).unwrap();
        assert_eq!(json, r#"{"code":"CLI_004","message":"boom"}"#);
    }

    #[test]
    fn test_builder_sets_fields() {
        let err = JsonError::new(error_codes::INPUT, "bad")
            .with_file("a.png")
            .with_suggestion("re-export it");
        assert_eq!(err.file.as_deref(), Some("a.png"));
        assert_eq!(err.suggestion.as_deref(), Some("re-export it"));
    }
}
