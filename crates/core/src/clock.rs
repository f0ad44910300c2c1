//! Injected time source.
//!
//! Every component that needs "now" receives a [`Clock`] instead of
//! reading the system time, so date resolution and TTL expiry are
//! deterministic under test.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// Offset of the campus timezone (UTC+7) used to derive "today".
const CAMPUS_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// A source of the current instant and the current campus-local date.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date in the campus timezone.
    fn today(&self) -> NaiveDate {
        let offset =
            FixedOffset::east_opt(CAMPUS_UTC_OFFSET_SECS).expect("campus offset is in range");
        self.now().with_timezone(&offset).date_naive()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Starts at a fixed instant and only moves when [`FixedClock::advance`]
/// is called, so TTL expiry can be tested without sleeping.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock pinned to the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock whose campus-local date is the given day, at noon.
    pub fn on_date(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("noon is a valid time");
        let offset =
            FixedOffset::east_opt(CAMPUS_UTC_OFFSET_SECS).expect("campus offset is in range");
        let local = noon
            .and_local_timezone(offset)
            .single()
            .expect("unambiguous local time");
        Self::at(local.with_timezone(&Utc))
    }

    /// Moves the clock forward by the given duration.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
