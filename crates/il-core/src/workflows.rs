//! Role-gated entry points. Each call runs one workflow inside one
//! `IMMEDIATE` transaction; any error rolls it back.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use il_api_contract::{
    AttendanceUpdate, ParticipantPatch, QuestionAnswer, QuestionDraft, Role, ScheduleDraft,
    TrainerQuestionDraft, UploadRequest, UserPatch,
};
use il_local_db::{
    AbsenceRecord, Database, ParticipantRecord, QuestionRecord, ScheduleImageRecord,
    ScheduleRecord, UserRecord,
};
use tracing::{debug, error, warn};

use crate::attendance::{AttendanceBatch, AttendanceRecorder, AttendanceSummary};
use crate::clock::Clock;
use crate::cohort::CohortCalendar;
use crate::config::Config;
use crate::context::{RequestContext, Scope};
use crate::outcome::Outcome;
use crate::questions::QuestionExchange;
use crate::roster::Roster;
use crate::schedules::ScheduleAdmin;
use crate::upload::{UploadGuard, UploadPolicy};
use crate::{Error, Result};

#[derive(Clone)]
pub struct Workflows {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    cohorts: Arc<CohortCalendar>,
    upload: Arc<UploadPolicy>,
}

impl Workflows {
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: &Config) -> Result<Self> {
        Ok(Self {
            db: Arc::new(db),
            clock,
            cohorts: Arc::new(config.cohorts.clone()),
            upload: Arc::new(config.upload_policy()?),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Same database and settings, read through another clock.
    pub fn at_clock(&self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..self.clone()
        }
    }

    fn run<T>(
        &self,
        ctx: &RequestContext,
        operation: &'static str,
        required: Role,
        f: impl FnOnce(Scope<'_>, &Roster<'_>) -> Result<T>,
    ) -> Result<T> {
        if let Err(err) = ctx.require_role(required) {
            warn!(
                operation,
                user_id = %ctx.principal.user_id,
                role = %ctx.principal.role,
                "Role check failed"
            );
            return Err(err);
        }
        ctx.cancel.check()?;

        let result: Result<T> = self.db.transaction(|conn| -> Result<T> {
            let scope = Scope::new(conn, self.clock.as_ref(), &ctx.cancel);
            let roster = Roster::new(conn);
            let value = f(scope, &roster)?;
            ctx.cancel.check()?;
            Ok(value)
        });

        match &result {
            Ok(_) => debug!(operation, user_id = %ctx.principal.user_id, "Workflow committed"),
            Err(Error::Persistence(err)) => {
                error!(operation, user_id = %ctx.principal.user_id, error = ?err, "Persistence failure")
            }
            Err(err) => debug!(operation, error = %err, "Workflow rolled back"),
        }
        result
    }

    fn trainer_id(roster: &Roster<'_>, ctx: &RequestContext) -> Result<String> {
        Ok(roster.trainer_by_user_id(&ctx.principal.user_id)?.id)
    }

    fn participant_id(roster: &Roster<'_>, ctx: &RequestContext) -> Result<String> {
        Ok(roster.participant_by_user_id(&ctx.principal.user_id)?.id)
    }

    /// Run a blocking workflow call on tokio's blocking pool.
    pub async fn spawn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Workflows) -> Result<T> + Send + 'static,
    {
        let this = self.clone();
        match tokio::task::spawn_blocking(move || f(&this)).await {
            Ok(result) => result,
            Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
            Err(_) => Err(Error::Cancelled),
        }
    }

    pub fn start_attendance(
        &self,
        ctx: &RequestContext,
        trainer_name: &str,
    ) -> Result<AttendanceBatch> {
        self.run(ctx, "start_attendance", Role::Admin, |scope, _| {
            AttendanceRecorder::new(scope, &self.cohorts).start_attendance_for_trainer(trainer_name)
        })
    }

    pub fn record_attendance(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
        update: &AttendanceUpdate,
    ) -> Result<Outcome<AbsenceRecord>> {
        self.run(ctx, "record_attendance", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            AttendanceRecorder::new(scope, &self.cohorts).record_attendance_outcome(
                &trainer_id,
                participant_id,
                update,
            )
        })
    }

    pub fn attendance_summary(&self, ctx: &RequestContext) -> Result<AttendanceSummary> {
        self.run(ctx, "attendance_summary", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            AttendanceRecorder::new(scope, &self.cohorts).todays_attendance_summary(&trainer_id)
        })
    }

    pub fn answer_question(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
        answer: &QuestionAnswer,
    ) -> Result<Outcome<QuestionRecord>> {
        self.run(ctx, "answer_question", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            QuestionExchange::new(scope).trainer_answers(&trainer_id, participant_id, answer)
        })
    }

    pub fn ask_on_behalf(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
        draft: &TrainerQuestionDraft,
    ) -> Result<QuestionRecord> {
        self.run(ctx, "ask_on_behalf", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            QuestionExchange::new(scope).trainer_asks_on_behalf(&trainer_id, participant_id, draft)
        })
    }

    pub fn ask_question(&self, ctx: &RequestContext, draft: &QuestionDraft) -> Result<QuestionRecord> {
        self.run(ctx, "ask_question", Role::Participant, |scope, roster| {
            let participant_id = Self::participant_id(roster, ctx)?;
            QuestionExchange::new(scope).participant_asks(&participant_id, draft)
        })
    }

    pub fn trainer_questions(&self, ctx: &RequestContext) -> Result<Vec<QuestionRecord>> {
        self.run(ctx, "trainer_questions", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            QuestionExchange::new(scope).questions_for_trainer(&trainer_id)
        })
    }

    pub fn upload_activity_proof(
        &self,
        ctx: &RequestContext,
        request: &UploadRequest,
    ) -> Result<ScheduleImageRecord> {
        self.run(ctx, "upload_activity_proof", Role::Trainer, |scope, roster| {
            let trainer_id = Self::trainer_id(roster, ctx)?;
            UploadGuard::new(scope, &self.upload).accept_activity_proof(&trainer_id, request)
        })
    }

    pub fn create_schedule(
        &self,
        ctx: &RequestContext,
        draft: &ScheduleDraft,
    ) -> Result<ScheduleRecord> {
        self.run(ctx, "create_schedule", Role::Admin, |scope, _| {
            ScheduleAdmin::new(scope).create_schedule(draft)
        })
    }

    pub fn assign_trainer_to_weekday(
        &self,
        ctx: &RequestContext,
        trainer_id: &str,
        weekday: Weekday,
    ) -> Result<Vec<ScheduleRecord>> {
        self.run(ctx, "assign_trainer_to_weekday", Role::Admin, |scope, _| {
            ScheduleAdmin::new(scope).assign_trainer_to_weekday(trainer_id, weekday)
        })
    }

    pub fn delete_schedules_on(&self, ctx: &RequestContext, date: NaiveDate) -> Result<usize> {
        self.run(ctx, "delete_schedules_on", Role::Admin, |scope, _| {
            ScheduleAdmin::new(scope).delete_schedules_on(date)
        })
    }

    pub fn update_participant(
        &self,
        ctx: &RequestContext,
        participant_id: &str,
        patch: &ParticipantPatch,
    ) -> Result<ParticipantRecord> {
        self.run(ctx, "update_participant", Role::Admin, |scope, roster| {
            roster.update_participant(participant_id, patch, scope.clock.now())
        })
    }

    pub fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        patch: &UserPatch,
    ) -> Result<UserRecord> {
        self.run(ctx, "update_user", Role::Admin, |scope, roster| {
            roster.update_user(user_id, patch, scope.clock.now())
        })
    }
}
