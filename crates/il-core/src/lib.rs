//! Schedule-driven attendance and question workflows for instructor-led
//! training.
//!
//! Every workflow starts from "today's session": the schedule row of the
//! calling trainer (or participant) dated today by the injected [`Clock`].
//! [`Workflows`] is the entry point for transports; it gates on the caller's
//! role, translates their user id, and runs the workflow in one transaction.

pub mod attendance;
pub mod clock;
pub mod cohort;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod outcome;
pub mod questions;
pub mod resolver;
pub mod roster;
pub mod schedules;
pub mod upload;
pub mod workflows;

#[cfg(test)]
mod test_support;

/// Core result type for workflow operations.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub use attendance::{
    AttendanceBatch, AttendanceRecorder, AttendanceSummary, PlaceholderEntry, SkipReason,
    SkippedParticipant,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use cohort::CohortCalendar;
pub use config::Config;
pub use context::{Cancellation, RequestContext, Scope};
pub use directory::SessionDirectory;
pub use outcome::Outcome;
pub use questions::QuestionExchange;
pub use resolver::SessionResolver;
pub use roster::{merge_participant, merge_user, Roster};
pub use schedules::ScheduleAdmin;
pub use upload::{UploadGuard, UploadPolicy};
pub use workflows::Workflows;
