use anyhow::Result;
use clap::{Args, Subcommand};
use il_api_contract::{QuestionAnswer, QuestionDraft, TrainerQuestionDraft};

use crate::App;

/// Question commands
#[derive(Subcommand)]
pub enum QuestionCommands {
    /// Answer a participant's question from today's session (trainer)
    Answer(AnswerArgs),
    /// Ask a question in today's or a given session (participant)
    Ask(AskArgs),
    /// Record an answered question on a participant's behalf (trainer)
    AskFor(AskForArgs),
    /// List questions routed to the calling trainer
    List,
}

#[derive(Args)]
pub struct AnswerArgs {
    #[arg(value_name = "PARTICIPANT_ID")]
    pub participant_id: String,

    #[arg(long)]
    pub answer: String,

    #[arg(long, default_value = "Answered")]
    pub status: String,
}

#[derive(Args)]
pub struct AskArgs {
    #[arg(value_name = "QUESTION")]
    pub question: String,

    /// Ask in this schedule instead of today's session
    #[arg(long = "schedule", value_name = "SCHEDULE_ID")]
    pub schedule_id: Option<String>,
}

#[derive(Args)]
pub struct AskForArgs {
    #[arg(value_name = "PARTICIPANT_ID")]
    pub participant_id: String,

    #[arg(long)]
    pub question: String,

    #[arg(long)]
    pub answer: String,

    #[arg(long, default_value = "Answered")]
    pub status: String,
}

impl QuestionCommands {
    pub async fn run(self, app: &App) -> Result<serde_json::Value> {
        match self {
            QuestionCommands::Answer(args) => {
                let answer = QuestionAnswer {
                    answer: args.answer,
                    status: args.status,
                };
                app.execute(move |wf, ctx| wf.answer_question(ctx, &args.participant_id, &answer))
                    .await
            }
            QuestionCommands::Ask(args) => {
                let draft = QuestionDraft {
                    question: args.question,
                    schedule_id: args.schedule_id,
                };
                app.execute(move |wf, ctx| wf.ask_question(ctx, &draft)).await
            }
            QuestionCommands::AskFor(args) => {
                let draft = TrainerQuestionDraft {
                    question: args.question,
                    answer: args.answer,
                    status: args.status,
                };
                app.execute(move |wf, ctx| wf.ask_on_behalf(ctx, &args.participant_id, &draft))
                    .await
            }
            QuestionCommands::List => app.execute(|wf, ctx| wf.trainer_questions(ctx)).await,
        }
    }
}
