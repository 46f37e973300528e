//! Command runner: opens the workflows, builds the caller's request context,
//! and runs one workflow on the blocking pool with Ctrl-C wired to cancellation.

use std::sync::Arc;

use anyhow::{Context, Result};
use il_api_contract::Principal;
use il_core::{Cancellation, Clock, Config, FixedClock, RequestContext, SystemClock, Workflows};
use il_local_db::Database;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Cli;

pub struct App {
    workflows: Workflows,
    principal: Option<Principal>,
}

impl App {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::resolve(cli.config.as_deref())?;
        if let Some(db) = &cli.db {
            config.database_path = Some(db.clone());
        }

        let path = config.database_path()?;
        debug!(path = %path.display(), "Opening database");
        let db = Database::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let clock: Arc<dyn Clock> = match cli.now {
            Some(now) => Arc::new(FixedClock::new(now)),
            None => Arc::new(SystemClock),
        };

        let principal = match (&cli.user_id, cli.role) {
            (Some(user_id), Some(role)) => Some(Principal::new(user_id.clone(), role)),
            _ => None,
        };

        Ok(Self {
            workflows: Workflows::new(db, clock, &config)?,
            principal,
        })
    }

    fn context(&self, token: CancellationToken) -> Result<RequestContext> {
        let principal = self
            .principal
            .clone()
            .context("Caller identity required: pass --as <USER_ID> and --role <ROLE>")?;
        Ok(RequestContext::new(principal).with_cancellation(Cancellation::new(token)))
    }

    /// Run `f` as the caller and serialize its result.
    pub async fn execute<T, F>(&self, f: F) -> Result<serde_json::Value>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&Workflows, &RequestContext) -> il_core::Result<T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let ctx = self.context(token.clone())?;

        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling request");
                token.cancel();
            }
        });

        let result = self.workflows.spawn(move |wf| f(wf, &ctx)).await;
        interrupt.abort();

        Ok(serde_json::to_value(result?)?)
    }
}
