//! Per-request context: the caller, their cancellation signal, and the
//! transaction scope handed to each workflow.

use std::time::{Duration, Instant};

use il_api_contract::{Principal, Role};
use rusqlite::Connection;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::{Error, Result};

/// Cancellation signal plus optional deadline, checked between persistence steps.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Authenticated caller and the cancellation attached to their request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub principal: Principal,
    pub cancel: Cancellation,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            cancel: Cancellation::default(),
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn require_role(&self, required: Role) -> Result<()> {
        if self.principal.role == required {
            Ok(())
        } else {
            Err(Error::Forbidden {
                required,
                actual: self.principal.role,
            })
        }
    }
}

/// Everything a workflow needs while its transaction is open.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub conn: &'a Connection,
    pub clock: &'a dyn Clock,
    pub cancel: &'a Cancellation,
}

impl<'a> Scope<'a> {
    pub fn new(conn: &'a Connection, clock: &'a dyn Clock, cancel: &'a Cancellation) -> Self {
        Self {
            conn,
            clock,
            cancel,
        }
    }
}
