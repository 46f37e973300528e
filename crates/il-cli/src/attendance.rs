use anyhow::Result;
use clap::{Args, Subcommand};
use il_api_contract::AttendanceUpdate;

use crate::App;

/// Attendance commands
#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// Create attendance placeholders for every participant (admin)
    Start(StartArgs),
    /// Record a participant's attendance in today's session (trainer)
    Record(RecordArgs),
    /// Show attendance rows of today's session (trainer)
    Summary,
}

#[derive(Args)]
pub struct StartArgs {
    /// Name of the trainer running the sessions
    #[arg(long = "trainer", value_name = "NAME")]
    pub trainer_name: String,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Participant id
    #[arg(value_name = "PARTICIPANT_ID")]
    pub participant_id: String,

    /// Attendance status, e.g. Present or Absent
    #[arg(long)]
    pub status: String,

    /// Free-form note
    #[arg(long, default_value = "")]
    pub information: String,
}

impl AttendanceCommands {
    pub async fn run(self, app: &App) -> Result<serde_json::Value> {
        match self {
            AttendanceCommands::Start(args) => {
                app.execute(move |wf, ctx| wf.start_attendance(ctx, &args.trainer_name))
                    .await
            }
            AttendanceCommands::Record(args) => {
                let update = AttendanceUpdate {
                    information: args.information,
                    status: args.status,
                };
                app.execute(move |wf, ctx| {
                    wf.record_attendance(ctx, &args.participant_id, &update)
                })
                .await
            }
            AttendanceCommands::Summary => {
                app.execute(|wf, ctx| wf.attendance_summary(ctx)).await
            }
        }
    }
}
