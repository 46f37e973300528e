//! Schedule administration: sessions are created and reassigned ahead of time.

use chrono::{NaiveDate, Weekday};
use il_api_contract::validation::validate_schedule_draft;
use il_api_contract::ScheduleDraft;
use il_local_db::{new_id, ScheduleRecord, ScheduleStore};
use tracing::info;

use crate::cohort::weekday_number;
use crate::context::Scope;
use crate::roster::Roster;
use crate::Result;

pub struct ScheduleAdmin<'a> {
    scope: Scope<'a>,
}

impl<'a> ScheduleAdmin<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    pub fn create_schedule(&self, draft: &ScheduleDraft) -> Result<ScheduleRecord> {
        validate_schedule_draft(draft)?;
        let roster = Roster::new(self.scope.conn);
        roster.trainer(&draft.trainer_id)?;
        if let Some(participant_id) = draft.participant_id.as_deref() {
            roster.participant(participant_id)?;
        }

        let now = self.scope.clock.now();
        let record = ScheduleRecord {
            id: new_id(),
            activity: draft.activity.trim().to_string(),
            date: draft.date,
            trainer_id: draft.trainer_id.clone(),
            participant_id: draft.participant_id.clone(),
            created_at: now,
            updated_at: now,
        };
        ScheduleStore::new(self.scope.conn).insert(&record)?;

        info!(
            schedule_id = %record.id,
            date = %record.date,
            trainer_id = %record.trainer_id,
            "Created schedule"
        );
        Ok(record)
    }

    /// Re-point every schedule falling on `weekday` at the trainer.
    pub fn assign_trainer_to_weekday(
        &self,
        trainer_id: &str,
        weekday: Weekday,
    ) -> Result<Vec<ScheduleRecord>> {
        Roster::new(self.scope.conn).trainer(trainer_id)?;
        let updated = ScheduleStore::new(self.scope.conn).reassign_weekday(
            trainer_id,
            weekday_number(weekday),
            self.scope.clock.now(),
        )?;
        info!(trainer_id, %weekday, schedules = updated.len(), "Reassigned weekday schedules");
        Ok(updated)
    }

    /// Delete every schedule dated `date`; returns how many were removed.
    pub fn delete_schedules_on(&self, date: NaiveDate) -> Result<usize> {
        let deleted = ScheduleStore::new(self.scope.conn).delete_by_date(date)?;
        info!(%date, deleted, "Deleted schedules");
        Ok(deleted)
    }
}
