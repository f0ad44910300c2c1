//! External collaborator ports.
//!
//! The engine consumes these as trait objects; the hosting application
//! wires real HTTP/LLM clients behind them. Port failures map into the
//! [`EngineError`](crate::error::EngineError) taxonomy.

use async_trait::async_trait;

use uisched_core::schedule::{ExamRecord, WeeklySchedule};
use uisched_core::time::TimeDescriptor;

use crate::error::Result;

/// Natural-language classifier producing time descriptors.
///
/// Classification failures are downgraded to
/// [`TimeDescriptor::FarTime`] by the engine, never surfaced.
#[async_trait]
pub trait ClassifierPort: Send + Sync {
    async fn classify(&self, text: &str) -> Result<TimeDescriptor>;
}

/// University authentication and academic-term lookup.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Authenticates against the university system.
    async fn login(&self, username: &str, password: &str) -> Result<()>;

    /// Returns the current semester identifier.
    async fn current_semester(&self) -> Result<String>;
}

/// Bulk timetable source: one blob of week windows per semester.
#[async_trait]
pub trait ScheduleDataPort: Send + Sync {
    async fn fetch_week_schedule(&self, semester: &str) -> Result<WeeklySchedule>;
}

/// Semester exam list source.
#[async_trait]
pub trait ExamDataPort: Send + Sync {
    /// Fetches the full exam list for a semester; `is_midterm` selects
    /// the midterm round instead of finals.
    async fn fetch_semester_exams(&self, semester: &str, is_midterm: bool)
        -> Result<Vec<ExamRecord>>;
}
