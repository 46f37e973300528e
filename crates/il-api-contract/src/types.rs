//! API contract types for the instructor-led training service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ApiContractError;

/// Account roles recognised by the role gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainer,
    Participant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::Participant => "participant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "trainer" => Ok(Role::Trainer),
            "participant" => Ok(Role::Participant),
            _ => Err(ApiContractError::InvalidRole(s.to_string())),
        }
    }
}

/// Authenticated caller as supplied by the identity layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Question lifecycle: `Process` until a trainer answers, then `Answered` for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    Process,
    Answered,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Process => "Process",
            QuestionStatus::Answered => "Answered",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuestionStatus::Answered)
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionStatus {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(QuestionStatus::Process),
            "answered" => Ok(QuestionStatus::Answered),
            _ => Err(ApiContractError::InvalidQuestionStatus(s.to_string())),
        }
    }
}

/// Trainer's attendance verdict for one participant in today's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    #[serde(default)]
    pub information: String,
    #[validate(length(min = 1, message = "Attendance status cannot be empty"))]
    pub status: String,
}

/// Trainer's answer to the question a participant asked in today's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    #[validate(length(min = 1, message = "Answer cannot be empty"))]
    pub answer: String,
    #[validate(length(min = 1, message = "Status cannot be empty"))]
    pub status: String,
}

/// Question raised by a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schedule_id: Option<String>,
}

/// Question recorded by a trainer on a participant's behalf, already answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainerQuestionDraft {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: String,
    #[validate(length(min = 1, message = "Answer cannot be empty"))]
    pub answer: String,
    #[validate(length(min = 1, message = "Status cannot be empty"))]
    pub status: String,
}

/// Proof-of-activity upload; window bounds are `HH:MM` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[validate(length(min = 1, message = "File name cannot be empty"))]
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_time: Option<String>,
}

/// Session created ahead of time by an admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDraft {
    #[validate(length(min = 1, message = "Activity cannot be empty"))]
    pub activity: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Trainer id cannot be empty"))]
    pub trainer_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub participant_id: Option<String>,
}

/// Partial update of a participant profile; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
}

/// Partial update of a user account; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<Role>,
}
