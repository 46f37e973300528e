//! Validation helpers for API contract types

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiContractError;
use crate::types::*;

/// Extensions accepted for proof-of-activity uploads
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Inclusive time-of-day window during which uploads are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl UploadWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ApiContractError> {
        if start > end {
            return Err(ApiContractError::InvertedWindow {
                start: start.format("%H:%M").to_string(),
                end: end.format("%H:%M").to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    /// Apply the optional `HH:MM` overrides of a request on top of `self`
    pub fn with_overrides(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ApiContractError> {
        let start = match start {
            Some(s) => parse_time_of_day(s)?,
            None => self.start,
        };
        let end = match end {
            Some(e) => parse_time_of_day(e)?,
            None => self.end,
        };
        Self::new(start, end)
    }
}

impl Default for UploadWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(19, 30, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(20, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Parse a `HH:MM` wall-clock time
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ApiContractError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ApiContractError::InvalidTime(value.to_string()))
}

/// Validate an attendance update
pub fn validate_attendance_update(update: &AttendanceUpdate) -> Result<(), ApiContractError> {
    update.validate()?;
    Ok(())
}

/// Validate a trainer answer and return the parsed status
pub fn validate_question_answer(
    answer: &QuestionAnswer,
) -> Result<QuestionStatus, ApiContractError> {
    answer.validate()?;
    answer.status.parse()
}

/// Validate a participant question
pub fn validate_question_draft(draft: &QuestionDraft) -> Result<(), ApiContractError> {
    draft.validate()?;
    Ok(())
}

/// Validate a question recorded by a trainer
pub fn validate_trainer_question(
    draft: &TrainerQuestionDraft,
) -> Result<QuestionStatus, ApiContractError> {
    draft.validate()?;
    draft.status.parse()
}

/// Validate a schedule draft
pub fn validate_schedule_draft(draft: &ScheduleDraft) -> Result<(), ApiContractError> {
    draft.validate()?;
    Ok(())
}

/// Validate an upload request and resolve its window against `defaults`
pub fn validate_upload_request(
    request: &UploadRequest,
    defaults: &UploadWindow,
    allowed_extensions: &[String],
) -> Result<UploadWindow, ApiContractError> {
    request.validate()?;
    validate_extension(&request.filename, allowed_extensions)?;
    defaults.with_overrides(request.start_time.as_deref(), request.end_time.as_deref())
}

/// Check the file extension (case-insensitive, leading dot included)
pub fn validate_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiContractError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .ok_or_else(|| ApiContractError::UnsupportedExtension(filename.to_string()))?;

    if allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        Ok(())
    } else {
        Err(ApiContractError::UnsupportedExtension(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_window_is_inclusive() {
        let window = UploadWindow::default();
        assert!(window.contains(hm(19, 30)));
        assert!(window.contains(hm(20, 30)));
        assert!(!window.contains(hm(19, 29)));
        assert!(!window.contains(hm(20, 31)));
    }

    #[test]
    fn test_window_overrides() {
        let window = UploadWindow::default()
            .with_overrides(Some("08:00"), None)
            .unwrap();
        assert_eq!(window.start, hm(8, 0));
        assert_eq!(window.end, hm(20, 30));

        assert!(matches!(
            UploadWindow::default().with_overrides(Some("8 pm"), None),
            Err(ApiContractError::InvalidTime(_))
        ));
        assert!(matches!(
            UploadWindow::default().with_overrides(Some("21:00"), Some("20:00")),
            Err(ApiContractError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn test_extension_check() {
        assert!(validate_extension("proof.JPG", &allowed()).is_ok());
        assert!(validate_extension("proof.webp", &allowed()).is_ok());
        assert!(validate_extension("proof.gif", &allowed()).is_err());
        assert!(validate_extension("proof", &allowed()).is_err());
    }

    #[test]
    fn test_question_answer_requires_known_status() {
        let answer = QuestionAnswer {
            answer: "Because".to_string(),
            status: "Answered".to_string(),
        };
        assert_eq!(validate_question_answer(&answer).unwrap(), QuestionStatus::Answered);

        let empty = QuestionAnswer {
            answer: "".to_string(),
            status: "Answered".to_string(),
        };
        assert!(matches!(
            validate_question_answer(&empty),
            Err(ApiContractError::Validation(_))
        ));

        let unknown = QuestionAnswer {
            answer: "Because".to_string(),
            status: "Done".to_string(),
        };
        assert!(matches!(
            validate_question_answer(&unknown),
            Err(ApiContractError::InvalidQuestionStatus(_))
        ));
    }

    #[test]
    fn test_empty_attendance_status_is_rejected() {
        let update = AttendanceUpdate {
            information: "late".to_string(),
            status: String::new(),
        };
        let err = validate_attendance_update(&update).unwrap_err();
        assert!(err.field_errors().contains_key("status"));
    }
}
