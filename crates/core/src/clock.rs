//! Injectable wall-clock.
//!
//! Discount rules depend on the local date and time of day. Reading them
//! through this trait keeps the rules pure and testable.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the current local date/time.
pub trait Clock: Send + Sync {
    /// Current local date and time (no timezone attached).
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn time_of_day(&self) -> NaiveTime {
        self.now().time()
    }
}

/// Reads the host's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant. Intended for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(date: NaiveDate, time: NaiveTime) -> Self {
        Self(NaiveDateTime::new(date, time))
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
    fn fixed_clock_splits_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(17, 45, 0).unwrap();
        let clock = FixedClock::at(date, time);

        assert_eq!(clock.today(), date);
        assert_eq!(clock.time_of_day(), time);
    }
}
