//! Attendance Recorder: bulk placeholder creation and per-participant outcomes.

use chrono::{NaiveDate, Weekday};
use il_api_contract::validation::validate_attendance_update;
use il_api_contract::AttendanceUpdate;
use il_local_db::{AbsenceRecord, AbsenceStore, ParticipantStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cohort::CohortCalendar;
use crate::context::Scope;
use crate::directory::SessionDirectory;
use crate::outcome::Outcome;
use crate::resolver::SessionResolver;
use crate::roster::Roster;
use crate::{Error, Result};

/// One placeholder the batch touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    pub participant_id: String,
    pub schedule_id: String,
    pub date: NaiveDate,
    /// False when the row already existed from an earlier run.
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The participant's role has no cohort weekday.
    UnknownRole,
    /// Schedule ids and dates for the weekday did not line up.
    DataConsistency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedParticipant {
    pub participant_id: String,
    pub reason: SkipReason,
    pub detail: String,
}

/// Result of starting attendance for a trainer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceBatch {
    pub trainer_id: String,
    pub entries: Vec<PlaceholderEntry>,
    pub skipped: Vec<SkippedParticipant>,
}

impl AttendanceBatch {
    pub fn created(&self) -> usize {
        self.entries.iter().filter(|e| e.created).count()
    }

    pub fn already_present(&self) -> usize {
        self.entries.iter().filter(|e| !e.created).count()
    }
}

/// Attendance rows bound to the trainer's session today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub schedule_id: String,
    pub date: NaiveDate,
    pub records: Vec<AbsenceRecord>,
}

pub struct AttendanceRecorder<'a> {
    scope: Scope<'a>,
    cohorts: &'a CohortCalendar,
}

impl<'a> AttendanceRecorder<'a> {
    pub fn new(scope: Scope<'a>, cohorts: &'a CohortCalendar) -> Self {
        Self { scope, cohorts }
    }

    /// Create an empty attendance row for every participant on every session of
    /// their cohort's weekday, assigned to the named trainer.
    pub fn start_attendance_for_trainer(&self, trainer_name: &str) -> Result<AttendanceBatch> {
        let roster = Roster::new(self.scope.conn);
        let user_id = roster.user_id_by_name(trainer_name)?;
        let trainer = roster.trainer_by_user_id(&user_id)?;

        let directory = SessionDirectory::new(self.scope.conn);
        let absences = AbsenceStore::new(self.scope.conn);
        let participants = ParticipantStore::new(self.scope.conn).list_ids_and_roles()?;
        let now = self.scope.clock.now();

        let mut batch = AttendanceBatch {
            trainer_id: trainer.id.clone(),
            ..Default::default()
        };

        for (participant_id, role) in participants {
            self.scope.cancel.check()?;

            let Some(weekday) = self.cohorts.weekday_for(&role) else {
                warn!(%participant_id, %role, "Participant role has no cohort day, skipping");
                batch.skipped.push(SkippedParticipant {
                    participant_id,
                    reason: SkipReason::UnknownRole,
                    detail: format!("unknown participant role {role:?}"),
                });
                continue;
            };

            let (ids, dates) = self.weekday_sessions(&directory, weekday)?;
            if ids.len() != dates.len() {
                warn!(
                    %participant_id,
                    ids = ids.len(),
                    dates = dates.len(),
                    "Schedule ids and dates disagree, skipping"
                );
                batch.skipped.push(SkippedParticipant {
                    participant_id,
                    reason: SkipReason::DataConsistency,
                    detail: format!(
                        "{} schedule ids but {} dates for {weekday}",
                        ids.len(),
                        dates.len()
                    ),
                });
                continue;
            }

            for (schedule_id, date) in ids.into_iter().zip(dates) {
                let created = absences.insert_placeholder(
                    date,
                    &schedule_id,
                    &trainer.id,
                    &participant_id,
                    now,
                )?;
                debug!(%participant_id, %schedule_id, created, "Attendance placeholder");
                batch.entries.push(PlaceholderEntry {
                    participant_id: participant_id.clone(),
                    schedule_id,
                    date,
                    created,
                });
            }
        }

        info!(
            trainer_id = %trainer.id,
            created = batch.created(),
            already_present = batch.already_present(),
            skipped = batch.skipped.len(),
            "Started attendance"
        );
        Ok(batch)
    }

    fn weekday_sessions(
        &self,
        directory: &SessionDirectory<'_>,
        weekday: Weekday,
    ) -> Result<(Vec<String>, Vec<NaiveDate>)> {
        Ok((
            directory.schedule_ids_for_weekday(weekday)?,
            directory.dates_for_weekday(weekday)?,
        ))
    }

    /// Fill in the participant's attendance for the trainer's session today.
    ///
    /// Never inserts. A row that already carries a status is returned as stored.
    pub fn record_attendance_outcome(
        &self,
        trainer_id: &str,
        participant_id: &str,
        update: &AttendanceUpdate,
    ) -> Result<Outcome<AbsenceRecord>> {
        validate_attendance_update(update)?;
        if update.status.trim().is_empty() {
            return Err(Error::validation("Attendance status cannot be empty"));
        }

        let schedule = SessionResolver::new(self.scope)
            .today_for_trainer(trainer_id, Some(participant_id))?;
        let absences = AbsenceStore::new(self.scope.conn);
        let existing = absences
            .get_by_schedule_and_participant(&schedule.id, participant_id)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "attendance row for participant {participant_id} in schedule {}",
                    schedule.id
                ))
            })?;

        if !existing.status.trim().is_empty() {
            debug!(participant_id, schedule_id = %schedule.id, "Attendance already recorded");
            return Ok(Outcome::Unchanged(existing));
        }

        self.scope.cancel.check()?;
        let now = self.scope.clock.now();
        absences.record_outcome(
            &schedule.id,
            participant_id,
            &update.information,
            update.status.trim(),
            now,
            now,
        )?;
        let stored = absences
            .get_by_schedule_and_participant(&schedule.id, participant_id)?
            .ok_or_else(|| Error::data_consistency("attendance row vanished after update"))?;

        info!(
            trainer_id,
            participant_id,
            schedule_id = %schedule.id,
            status = %stored.status,
            "Recorded attendance"
        );
        Ok(Outcome::Applied(stored))
    }

    pub fn todays_attendance_summary(&self, trainer_id: &str) -> Result<AttendanceSummary> {
        let schedule = SessionResolver::new(self.scope).today_for_trainer(trainer_id, None)?;
        let records = AbsenceStore::new(self.scope.conn).list_by_schedule(&schedule.id)?;
        if records.is_empty() {
            return Err(Error::not_found(format!(
                "attendance rows for schedule {}",
                schedule.id
            )));
        }
        Ok(AttendanceSummary {
            schedule_id: schedule.id,
            date: schedule.date,
            records,
        })
    }
}
