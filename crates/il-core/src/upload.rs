//! Upload Window Guard: proof-of-activity images for the trainer's last session.

use chrono::NaiveTime;
use il_api_contract::validation::validate_upload_request;
use il_api_contract::{UploadRequest, UploadWindow};
use il_local_db::{new_id, ScheduleImageRecord, ScheduleImageStore};
use tracing::{info, warn};

use crate::context::Scope;
use crate::directory::SessionDirectory;
use crate::{Error, Result};

/// How many of the trainer's latest schedules are considered.
pub const RECENT_SCHEDULES: u32 = 3;

/// Upload rules taken from configuration.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub window: UploadWindow,
    pub allowed_extensions: Vec<String>,
    pub recent_schedules: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            window: UploadWindow::default(),
            allowed_extensions: il_api_contract::DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            recent_schedules: RECENT_SCHEDULES,
        }
    }
}

pub struct UploadGuard<'a> {
    scope: Scope<'a>,
    policy: &'a UploadPolicy,
}

impl<'a> UploadGuard<'a> {
    pub fn new(scope: Scope<'a>, policy: &'a UploadPolicy) -> Self {
        Self { scope, policy }
    }

    /// Attach an uploaded file to the trainer's most recent session that has
    /// already started, provided the current time lies inside the upload window.
    /// A session counts as started from midnight of its date.
    pub fn accept_activity_proof(
        &self,
        trainer_id: &str,
        request: &UploadRequest,
    ) -> Result<ScheduleImageRecord> {
        let window = validate_upload_request(
            request,
            &self.policy.window,
            &self.policy.allowed_extensions,
        )?;

        let now = self.scope.clock.now();
        let mut recent = SessionDirectory::new(self.scope.conn)
            .recent_schedules_for_trainer(trainer_id, self.policy.recent_schedules)?;
        recent.sort_by_key(|s| s.date);
        let target = recent
            .into_iter()
            .filter(|s| s.date.and_time(NaiveTime::MIN) < now)
            .next_back()
            .ok_or_else(|| Error::not_found(format!("past session for trainer {trainer_id}")))?;

        let now = self.scope.clock.minute_of_day();
        if !window.contains(now) {
            warn!(
                trainer_id,
                %now,
                start = %window.start,
                end = %window.end,
                "Upload outside window"
            );
            return Err(Error::OutOfWindow {
                now,
                start: window.start,
                end: window.end,
            });
        }

        self.scope.cancel.check()?;
        let record = ScheduleImageRecord {
            id: new_id(),
            schedule_id: target.id,
            file_name: request.filename.trim().to_string(),
            created_at: self.scope.clock.now(),
        };
        ScheduleImageStore::new(self.scope.conn).insert(&record)?;

        info!(
            trainer_id,
            schedule_id = %record.schedule_id,
            file = %record.file_name,
            "Accepted activity proof"
        );
        Ok(record)
    }
}
