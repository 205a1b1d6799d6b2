use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable code classifying a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The value exists but has the wrong JSON type.
    InvalidType,
    /// A required object field is absent.
    MissingField,
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCode::InvalidType => write!(f, "invalid_type"),
            IssueCode::MissingField => write!(f, "missing_field"),
        }
    }
}

/// One validation failure.
///
/// `path` locates the offending value as ordered segments from the input root:
/// object keys and array indices, both rendered as strings (an element of an
/// `ids` array reports `["ids", "0"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    pub message: String,
}

impl Issue {
    /// Create an `invalid_type` issue with the standard message form.
    pub fn invalid_type(path: Vec<String>, expected: &str, received: &str) -> Self {
        Self {
            code: IssueCode::InvalidType,
            path,
            expected: Some(expected.to_string()),
            received: Some(received.to_string()),
            message: format!("Expected {}, received {}", expected, received),
        }
    }

    /// Create a `missing_field` issue for a required object field.
    pub fn missing_field(path: Vec<String>, field: &str) -> Self {
        Self {
            code: IssueCode::MissingField,
            path,
            expected: None,
            received: None,
            message: format!("Required field '{}' is missing", field),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{} at {}: {}", self.code, self.path.join("."), self.message)
        }
    }
}

/// Error form of a non-empty issue list.
///
/// Handlers that run their own validation can fail with this type; the
/// dispatcher recognizes it and reports the issues as a validation failure
/// rather than an internal error.
#[derive(Debug, Clone, Error)]
#[error("input failed validation with {} issue(s)", issues.len())]
pub struct SchemaViolation {
    pub issues: Vec<Issue>,
}

impl SchemaViolation {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl From<Vec<Issue>> for SchemaViolation {
    fn from(issues: Vec<Issue>) -> Self {
        Self::new(issues)
    }
}
