use anyhow::Result;
use chrono::{NaiveDate, Weekday};
use clap::{Args, Subcommand};
use il_api_contract::ScheduleDraft;

use crate::App;

/// Schedule administration commands (admin)
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Create a session
    Create(CreateArgs),
    /// Assign every session on a weekday to a trainer
    Assign(AssignArgs),
    /// Delete every session on a date
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub activity: String,

    /// Session date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    #[arg(long = "trainer", value_name = "TRAINER_ID")]
    pub trainer_id: String,

    /// Bind the session to one participant
    #[arg(long = "participant", value_name = "PARTICIPANT_ID")]
    pub participant_id: Option<String>,
}

#[derive(Args)]
pub struct AssignArgs {
    #[arg(long = "trainer", value_name = "TRAINER_ID")]
    pub trainer_id: String,

    /// Weekday name, e.g. Mon or Tuesday
    #[arg(long)]
    pub weekday: Weekday,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Session date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
}

impl ScheduleCommands {
    pub async fn run(self, app: &App) -> Result<serde_json::Value> {
        match self {
            ScheduleCommands::Create(args) => {
                let draft = ScheduleDraft {
                    activity: args.activity,
                    date: args.date,
                    trainer_id: args.trainer_id,
                    participant_id: args.participant_id,
                };
                app.execute(move |wf, ctx| wf.create_schedule(ctx, &draft)).await
            }
            ScheduleCommands::Assign(args) => {
                app.execute(move |wf, ctx| {
                    wf.assign_trainer_to_weekday(ctx, &args.trainer_id, args.weekday)
                })
                .await
            }
            ScheduleCommands::Delete(args) => {
                let deleted = app
                    .execute(move |wf, ctx| wf.delete_schedules_on(ctx, args.date))
                    .await?;
                Ok(serde_json::json!({ "deleted": deleted }))
            }
        }
    }
}
