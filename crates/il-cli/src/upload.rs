use anyhow::Result;
use clap::Args;
use il_api_contract::UploadRequest;

use crate::App;

/// Arguments for uploading proof of activity
#[derive(Args)]
pub struct UploadArgs {
    /// Stored file name of the uploaded image
    #[arg(value_name = "FILENAME")]
    pub filename: String,

    /// Window start (HH:MM), overriding the configured one
    #[arg(long = "start", value_name = "HH:MM")]
    pub start_time: Option<String>,

    /// Window end (HH:MM), overriding the configured one
    #[arg(long = "end", value_name = "HH:MM")]
    pub end_time: Option<String>,
}

impl UploadArgs {
    pub async fn run(self, app: &App) -> Result<serde_json::Value> {
        let request = UploadRequest {
            filename: self.filename,
            start_time: self.start_time,
            end_time: self.end_time,
        };
        app.execute(move |wf, ctx| wf.upload_activity_proof(ctx, &request))
            .await
    }
}
