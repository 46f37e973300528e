//! Error taxonomy for the training workflows.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use il_api_contract::{ApiContractError, ProblemDetails, Role};

/// Core error type for all workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: HashMap<String, Vec<String>>,
    },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("No session scheduled today for {subject}")]
    NoSessionToday { subject: String },

    #[error("{candidates} sessions match {date}; cannot pick one")]
    AmbiguousSession { date: NaiveDate, candidates: usize },

    #[error("Uploads are accepted between {start} and {end}; it is {now}")]
    OutOfWindow {
        now: NaiveTime,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Inconsistent data: {message}")]
    DataConsistency { message: String },

    #[error("Role {actual} may not perform this action (requires {required})")]
    Forbidden { required: Role, actual: Role },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Persistence failure")]
    Persistence(#[from] il_local_db::Error),
}

impl Error {
    /// Create a new validation error without field details.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Create a new not-found error.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn no_session_today<S: Into<String>>(subject: S) -> Self {
        Self::NoSessionToday {
            subject: subject.into(),
        }
    }

    pub fn data_consistency<S: Into<String>>(message: S) -> Self {
        Self::DataConsistency {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP-style status a transport should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } => 400,
            Error::Forbidden { .. } => 403,
            Error::NotFound { .. } | Error::NoSessionToday { .. } => 404,
            Error::Cancelled => 408,
            Error::AmbiguousSession { .. } | Error::DataConsistency { .. } => 409,
            Error::OutOfWindow { .. } => 422,
            Error::Config { .. } | Error::Persistence(_) => 500,
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation-error",
            Error::NotFound { .. } => "not-found",
            Error::NoSessionToday { .. } => "no-session-today",
            Error::AmbiguousSession { .. } => "ambiguous-session",
            Error::OutOfWindow { .. } => "out-of-window",
            Error::DataConsistency { .. } => "data-consistency",
            Error::Forbidden { .. } => "forbidden",
            Error::Cancelled => "cancelled",
            Error::Config { .. } => "configuration-error",
            Error::Persistence(_) => "persistence-error",
        }
    }

    /// Render as an RFC 7807 problem document.
    pub fn to_problem(&self) -> ProblemDetails {
        let title = match self {
            Error::Validation { .. } => "Invalid request",
            Error::NotFound { .. } => "Not found",
            Error::NoSessionToday { .. } => "No session today",
            Error::AmbiguousSession { .. } => "Ambiguous session",
            Error::OutOfWindow { .. } => "Outside upload window",
            Error::DataConsistency { .. } => "Inconsistent data",
            Error::Forbidden { .. } => "Forbidden",
            Error::Cancelled => "Cancelled",
            Error::Config { .. } => "Configuration error",
            Error::Persistence(_) => "Internal error",
        };
        let mut problem = ProblemDetails::new(
            &format!("/problems/{}", self.slug()),
            title,
            self.status_code(),
            self.to_string(),
        );
        if let Error::Validation { fields, .. } = self {
            problem.errors = fields.clone();
        }
        problem
    }
}

impl From<ApiContractError> for Error {
    fn from(err: ApiContractError) -> Self {
        Self::Validation {
            fields: err.field_errors(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_errors_hide_driver_detail() {
        let err = Error::from(il_local_db::Error::generic("SELECT secret FROM users"));
        assert_eq!(err.to_string(), "Persistence failure");
        assert_eq!(err.status_code(), 500);
        assert!(!err.to_problem().detail.contains("SELECT"));
    }

    #[test]
    fn no_session_today_is_distinct_from_not_found() {
        let none_today = Error::no_session_today("trainer t-1");
        let missing = Error::not_found("question");
        assert_eq!(none_today.status_code(), missing.status_code());
        assert_ne!(
            none_today.to_problem().problem_type,
            missing.to_problem().problem_type
        );
    }

    #[test]
    fn contract_errors_become_validation_errors() {
        let err: Error = ApiContractError::InvalidTime("25:99".to_string()).into();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.to_problem().status, Some(400));
    }
}
