//! Cohort calendar: which weekday each participant cohort meets on.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Maps a participant role ("Basic", "Advance", ...) to its session weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortCalendar {
    days: BTreeMap<String, Weekday>,
}

impl Default for CohortCalendar {
    fn default() -> Self {
        Self::new([("Basic", Weekday::Mon), ("Advance", Weekday::Tue)])
    }
}

impl CohortCalendar {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Weekday)>,
        S: Into<String>,
    {
        Self {
            days: entries
                .into_iter()
                .map(|(role, day)| (role.into(), day))
                .collect(),
        }
    }

    /// Weekday for `role`, matched case-insensitively; `None` for unknown roles.
    pub fn weekday_for(&self, role: &str) -> Option<Weekday> {
        let role = role.trim();
        self.days
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(role))
            .map(|(_, day)| *day)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }
}

/// Weekday number as stored by SQLite's `strftime('%w')` (0 = Sunday).
pub fn weekday_number(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}
