use anyhow::Result;
use clap::{Args, Subcommand};
use il_api_contract::{ParticipantPatch, Role, UserPatch};

use crate::App;

/// Profile update commands (admin); omitted flags keep stored values
#[derive(Subcommand)]
pub enum RosterCommands {
    /// Update a participant profile
    UpdateParticipant(ParticipantArgs),
    /// Update a user account
    UpdateUser(UserArgs),
}

#[derive(Args)]
pub struct ParticipantArgs {
    #[arg(value_name = "PARTICIPANT_ID")]
    pub participant_id: String,

    #[arg(long)]
    pub date_of_birth: Option<String>,

    #[arg(long)]
    pub place_of_birth: Option<String>,

    #[arg(long)]
    pub last_education: Option<String>,

    /// Cohort, e.g. Basic or Advance
    #[arg(long)]
    pub cohort: Option<String>,
}

#[derive(Args)]
pub struct UserArgs {
    #[arg(value_name = "USER_ID")]
    pub user_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long = "set-role", value_name = "ROLE")]
    pub new_role: Option<Role>,
}

impl RosterCommands {
    pub async fn run(self, app: &App) -> Result<serde_json::Value> {
        match self {
            RosterCommands::UpdateParticipant(args) => {
                let patch = ParticipantPatch {
                    date_of_birth: args.date_of_birth,
                    place_of_birth: args.place_of_birth,
                    last_education: args.last_education,
                    role: args.cohort,
                };
                app.execute(move |wf, ctx| {
                    wf.update_participant(ctx, &args.participant_id, &patch)
                })
                .await
            }
            RosterCommands::UpdateUser(args) => {
                let patch = UserPatch {
                    name: args.name,
                    email: args.email,
                    username: args.username,
                    address: args.address,
                    role: args.new_role,
                };
                app.execute(move |wf, ctx| wf.update_user(ctx, &args.user_id, &patch))
                    .await
            }
        }
    }
}
