//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid question status: {0}")]
    InvalidQuestionStatus(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid time of day: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid upload window: start {start} is after end {end}")]
    InvertedWindow { start: String, end: String },

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

impl ApiContractError {
    /// Field-level messages for a problem document
    pub fn field_errors(&self) -> std::collections::HashMap<String, Vec<String>> {
        let mut errors = std::collections::HashMap::new();
        if let ApiContractError::Validation(validation) = self {
            for (field, failures) in validation.field_errors() {
                let messages = failures
                    .iter()
                    .map(|failure| {
                        failure
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| failure.code.to_string())
                    })
                    .collect();
                errors.insert(field.to_string(), messages);
            }
        }
        errors
    }
}

/// Problem+JSON error response format as per RFC 7807
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty", default)]
    pub errors: std::collections::HashMap<String, Vec<String>>,
}

impl ProblemDetails {
    pub fn new(problem_type: &str, title: &str, status: u16, detail: impl Into<String>) -> Self {
        Self {
            problem_type: problem_type.to_string(),
            title: title.to_string(),
            status: Some(status),
            detail: detail.into(),
            errors: Default::default(),
        }
    }
}
