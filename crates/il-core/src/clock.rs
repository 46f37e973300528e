//! Wall-clock abstraction so "today" can be pinned in tests.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current time of day truncated to the minute.
    fn minute_of_day(&self) -> NaiveTime {
        let now = self.now();
        NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now.time())
    }
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(now)
    }

    /// Frozen at `date` `hour:minute`; out-of-range times fall back to midnight.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        Self(date.and_time(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_date_and_minute() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let clock = FixedClock::new(date.and_hms_opt(20, 30, 45).unwrap());
        assert_eq!(clock.today(), date);
        assert_eq!(clock.minute_of_day(), NaiveTime::from_hms_opt(20, 30, 0).unwrap());
        assert_eq!(FixedClock::at(date, 20, 30).now().time().second(), 0);
    }
}
