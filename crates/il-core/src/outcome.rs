//! Result of a guarded write that may turn out to be a no-op.

use serde::{Deserialize, Serialize};

/// `Applied` when the write happened, `Unchanged` when the row was already
/// in its terminal state and is returned as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum Outcome<T> {
    Applied(T),
    Unchanged(T),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Outcome::Applied(record) | Outcome::Unchanged(record) => record,
        }
    }
}
