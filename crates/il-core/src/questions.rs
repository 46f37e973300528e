//! Question Exchange: participants ask, trainers answer once.

use il_api_contract::validation::{
    validate_question_answer, validate_question_draft, validate_trainer_question,
};
use il_api_contract::{QuestionAnswer, QuestionDraft, QuestionStatus, TrainerQuestionDraft};
use il_local_db::{new_id, QuestionRecord, QuestionStore};
use tracing::{debug, info};

use crate::context::Scope;
use crate::directory::SessionDirectory;
use crate::outcome::Outcome;
use crate::resolver::SessionResolver;
use crate::{Error, Result};

/// A stored answer together with any status closes the question.
fn is_answered(record: &QuestionRecord) -> bool {
    !record.answer.trim().is_empty() && !record.status.trim().is_empty()
}

pub struct QuestionExchange<'a> {
    scope: Scope<'a>,
}

impl<'a> QuestionExchange<'a> {
    pub fn new(scope: Scope<'a>) -> Self {
        Self { scope }
    }

    /// Answer the participant's oldest pending question in today's session.
    ///
    /// Answered questions are never overwritten: when nothing is pending the
    /// stored question is returned unchanged.
    pub fn trainer_answers(
        &self,
        trainer_id: &str,
        participant_id: &str,
        answer: &QuestionAnswer,
    ) -> Result<Outcome<QuestionRecord>> {
        let status = validate_question_answer(answer)?;
        if !status.is_terminal() {
            return Err(Error::validation(format!(
                "An answer must set status {}",
                QuestionStatus::Answered
            )));
        }

        let schedule = SessionResolver::new(self.scope)
            .today_for_trainer(trainer_id, Some(participant_id))?;
        let store = QuestionStore::new(self.scope.conn);
        let questions = store.list_by_schedule_and_participant(&schedule.id, participant_id)?;

        let Some(pending) = questions.iter().position(|q| !is_answered(q)) else {
            return match questions.into_iter().next() {
                Some(answered) => {
                    debug!(question_id = %answered.id, "Question already answered");
                    Ok(Outcome::Unchanged(answered))
                }
                None => Err(Error::not_found(format!(
                    "question from participant {participant_id} in schedule {}",
                    schedule.id
                ))),
            };
        };
        let pending = &questions[pending];

        self.scope.cancel.check()?;
        store.answer(
            &pending.id,
            answer.answer.trim(),
            status.as_str(),
            trainer_id,
            self.scope.clock.now(),
        )?;
        let stored = store
            .get(&pending.id)?
            .ok_or_else(|| Error::data_consistency("question vanished after update"))?;

        info!(
            trainer_id,
            participant_id,
            question_id = %stored.id,
            "Answered question"
        );
        Ok(Outcome::Applied(stored))
    }

    /// Record a question and its answer on the participant's behalf.
    pub fn trainer_asks_on_behalf(
        &self,
        trainer_id: &str,
        participant_id: &str,
        draft: &TrainerQuestionDraft,
    ) -> Result<QuestionRecord> {
        let status = validate_trainer_question(draft)?;
        let schedule = SessionResolver::new(self.scope)
            .today_for_trainer(trainer_id, Some(participant_id))?;

        let now = self.scope.clock.now();
        let record = QuestionRecord {
            id: new_id(),
            question: draft.question.trim().to_string(),
            answer: draft.answer.trim().to_string(),
            status: status.as_str().to_string(),
            participant_id: participant_id.to_string(),
            trainer_id: Some(trainer_id.to_string()),
            schedule_id: schedule.id,
            created_at: now,
            updated_at: now,
        };
        self.scope.cancel.check()?;
        QuestionStore::new(self.scope.conn).insert(&record)?;

        info!(
            trainer_id,
            participant_id,
            question_id = %record.id,
            "Recorded question on behalf of participant"
        );
        Ok(record)
    }

    /// Raise a question in an explicit schedule of the participant, or in
    /// their session today.
    pub fn participant_asks(
        &self,
        participant_id: &str,
        draft: &QuestionDraft,
    ) -> Result<QuestionRecord> {
        validate_question_draft(draft)?;
        if draft.question.trim().is_empty() {
            return Err(Error::validation("Question cannot be empty"));
        }

        let schedule = match draft.schedule_id.as_deref() {
            Some(schedule_id) => {
                let schedule = SessionDirectory::new(self.scope.conn).schedule(schedule_id)?;
                if schedule.participant_id.as_deref() != Some(participant_id) {
                    return Err(Error::not_found(format!(
                        "schedule {schedule_id} for participant {participant_id}"
                    )));
                }
                schedule
            }
            None => SessionResolver::new(self.scope).today_for_participant(participant_id)?,
        };

        let now = self.scope.clock.now();
        let record = QuestionRecord {
            id: new_id(),
            question: draft.question.trim().to_string(),
            answer: String::new(),
            status: QuestionStatus::Process.as_str().to_string(),
            participant_id: participant_id.to_string(),
            trainer_id: Some(schedule.trainer_id.clone()),
            schedule_id: schedule.id,
            created_at: now,
            updated_at: now,
        };
        self.scope.cancel.check()?;
        QuestionStore::new(self.scope.conn).insert(&record)?;

        info!(
            participant_id,
            question_id = %record.id,
            schedule_id = %record.schedule_id,
            "Question asked"
        );
        Ok(record)
    }

    /// Every question routed to the trainer, newest first.
    pub fn questions_for_trainer(&self, trainer_id: &str) -> Result<Vec<QuestionRecord>> {
        Ok(QuestionStore::new(self.scope.conn).list_by_trainer(trainer_id)?)
    }
}
