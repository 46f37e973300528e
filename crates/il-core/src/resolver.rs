//! Session Resolver: maps a trainer or participant to today's schedule.

use il_local_db::ScheduleRecord;
use tracing::debug;

use crate::clock::Clock;
use crate::context::Scope;
use crate::directory::SessionDirectory;
use crate::{Error, Result};

pub struct SessionResolver<'a> {
    directory: SessionDirectory<'a>,
    clock: &'a dyn Clock,
}

impl<'a> SessionResolver<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self {
            directory: SessionDirectory::new(scope.conn),
            clock: scope.clock,
        }
    }

    /// Today's schedule for the trainer.
    ///
    /// When the trainer has several sessions today, rows bound to
    /// `participant_hint` win, then rows bound to any participant.
    pub fn today_for_trainer(
        &self,
        trainer_id: &str,
        participant_hint: Option<&str>,
    ) -> Result<ScheduleRecord> {
        let ids = self.directory.schedule_ids_for_trainer(trainer_id)?;
        let candidates = self.todays(ids)?;
        debug!(trainer_id, candidates = candidates.len(), "Resolving today's session");
        self.pick(candidates, participant_hint, || {
            format!("trainer {trainer_id}")
        })
    }

    /// Today's schedule bound to the participant.
    pub fn today_for_participant(&self, participant_id: &str) -> Result<ScheduleRecord> {
        let ids = self.directory.schedule_ids_for_participant(participant_id)?;
        let candidates = self.todays(ids)?;
        debug!(participant_id, candidates = candidates.len(), "Resolving today's session");
        self.pick(candidates, Some(participant_id), || {
            format!("participant {participant_id}")
        })
    }

    fn todays(&self, ids: Vec<String>) -> Result<Vec<ScheduleRecord>> {
        let today = self.clock.today();
        let mut todays = Vec::new();
        for id in ids {
            if self.directory.date_for_schedule(&id)? == today {
                todays.push(self.directory.schedule(&id)?);
            }
        }
        Ok(todays)
    }

    fn pick(
        &self,
        mut candidates: Vec<ScheduleRecord>,
        participant_hint: Option<&str>,
        subject: impl FnOnce() -> String,
    ) -> Result<ScheduleRecord> {
        match candidates.len() {
            0 => return Err(Error::no_session_today(subject())),
            1 => return Ok(candidates.remove(0)),
            _ => {}
        }

        if let Some(hint) = participant_hint {
            let mut bound: Vec<_> = candidates
                .iter()
                .filter(|s| s.participant_id.as_deref() == Some(hint))
                .cloned()
                .collect();
            if bound.len() == 1 {
                return Ok(bound.remove(0));
            }
        }

        let count = candidates.len();
        let mut bound: Vec<_> = candidates
            .into_iter()
            .filter(|s| s.participant_id.is_some())
            .collect();
        if bound.len() == 1 {
            return Ok(bound.remove(0));
        }

        Err(Error::AmbiguousSession {
            date: self.clock.today(),
            candidates: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::context::Cancellation;
    use crate::test_support::*;
    use il_local_db::Database;

    #[test]
    fn picks_the_row_dated_today() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let trainer = trainer(conn, "Alice");
            schedule(conn, &trainer, date(2024, 3, 4), None);
            let today = schedule(conn, &trainer, date(2024, 3, 11), None);

            let clock = FixedClock::at(date(2024, 3, 11), 10, 0);
            let cancel = Cancellation::default();
            let resolver = SessionResolver::new(Scope::new(conn, &clock, &cancel));
            assert_eq!(resolver.today_for_trainer(&trainer, None).unwrap().id, today);
        });
    }

    #[test]
    fn no_row_today_is_reported() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let trainer = trainer(conn, "Alice");
            schedule(conn, &trainer, date(2024, 3, 4), None);

            let clock = FixedClock::at(date(2024, 3, 5), 10, 0);
            let cancel = Cancellation::default();
            let resolver = SessionResolver::new(Scope::new(conn, &clock, &cancel));
            assert!(matches!(
                resolver.today_for_trainer(&trainer, None),
                Err(Error::NoSessionToday { .. })
            ));
        });
    }

    #[test]
    fn other_trainers_on_the_same_date_do_not_collide() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let alice = trainer(conn, "Alice");
            let bob = trainer(conn, "Bob");
            let mine = schedule(conn, &alice, date(2024, 3, 11), None);
            let theirs = schedule(conn, &bob, date(2024, 3, 11), None);

            let clock = FixedClock::at(date(2024, 3, 11), 10, 0);
            let cancel = Cancellation::default();
            let resolver = SessionResolver::new(Scope::new(conn, &clock, &cancel));
            assert_eq!(resolver.today_for_trainer(&alice, None).unwrap().id, mine);
            assert_eq!(resolver.today_for_trainer(&bob, None).unwrap().id, theirs);
        });
    }

    #[test]
    fn several_sessions_prefer_participant_bound_rows() {
        let db = Database::open_in_memory().unwrap();
        with_conn(&db, |conn| {
            let alice = trainer(conn, "Alice");
            let dan = participant(conn, "Dan", "Basic");
            let eve = participant(conn, "Eve", "Basic");
            let day = date(2024, 3, 11);
            schedule(conn, &alice, day, None);
            let dans = schedule(conn, &alice, day, Some(&dan));

            let clock = FixedClock::at(day, 10, 0);
            let cancel = Cancellation::default();
            let resolver = SessionResolver::new(Scope::new(conn, &clock, &cancel));
            assert_eq!(resolver.today_for_trainer(&alice, None).unwrap().id, dans);

            let eves = schedule(conn, &alice, day, Some(&eve));
            assert_eq!(
                resolver.today_for_trainer(&alice, Some(&eve)).unwrap().id,
                eves
            );
            assert!(matches!(
                resolver.today_for_trainer(&alice, None),
                Err(Error::AmbiguousSession { candidates: 3, .. })
            ));
        });
    }
}
