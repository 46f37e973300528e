//! Session Directory: read-only schedule lookups.

use chrono::{NaiveDate, Weekday};
use il_local_db::{ScheduleRecord, ScheduleStore};
use rusqlite::Connection;

use crate::cohort::weekday_number;
use crate::{Error, Result};

pub struct SessionDirectory<'a> {
    schedules: ScheduleStore<'a>,
}

impl<'a> SessionDirectory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            schedules: ScheduleStore::new(conn),
        }
    }

    pub fn schedule(&self, schedule_id: &str) -> Result<ScheduleRecord> {
        self.schedules
            .get(schedule_id)?
            .ok_or_else(|| Error::not_found(format!("schedule {schedule_id}")))
    }

    /// Every schedule the trainer is assigned to, in date order.
    pub fn schedule_ids_for_trainer(&self, trainer_id: &str) -> Result<Vec<String>> {
        Ok(self.schedules.ids_by_trainer(trainer_id)?)
    }

    pub fn schedule_ids_for_participant(&self, participant_id: &str) -> Result<Vec<String>> {
        Ok(self.schedules.ids_by_participant(participant_id)?)
    }

    pub fn schedule_ids_for_weekday(&self, weekday: Weekday) -> Result<Vec<String>> {
        Ok(self.schedules.ids_by_weekday(weekday_number(weekday))?)
    }

    /// Dates aligned index-for-index with [`Self::schedule_ids_for_weekday`].
    pub fn dates_for_weekday(&self, weekday: Weekday) -> Result<Vec<NaiveDate>> {
        Ok(self.schedules.dates_by_weekday(weekday_number(weekday))?)
    }

    pub fn date_for_schedule(&self, schedule_id: &str) -> Result<NaiveDate> {
        self.schedules
            .date_by_id(schedule_id)?
            .ok_or_else(|| Error::not_found(format!("schedule {schedule_id}")))
    }

    /// The single schedule dated `date`, across all trainers.
    pub fn schedule_for_date(&self, date: NaiveDate) -> Result<String> {
        let mut ids = self.schedules.ids_by_date(date)?;
        match ids.len() {
            0 => Err(Error::not_found(format!("schedule on {date}"))),
            1 => Ok(ids.remove(0)),
            candidates => Err(Error::AmbiguousSession { date, candidates }),
        }
    }

    /// The trainer's `limit` latest schedules, newest first.
    pub fn recent_schedules_for_trainer(
        &self,
        trainer_id: &str,
        limit: u32,
    ) -> Result<Vec<ScheduleRecord>> {
        Ok(self.schedules.recent_by_trainer(trainer_id, limit)?)
    }
}
