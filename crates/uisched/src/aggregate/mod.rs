//! Query aggregators.
//!
//! Each aggregator turns a resolved time window into a presentable
//! answer, going through the cache gateway for every upstream payload.
//! The schedule side caches per day; the exam side caches the whole
//! semester list and filters locally.

mod exams;
mod schedule;

pub use exams::{ExamAggregator, ExamOutcome, ExamQueryMode};
pub use schedule::{ScheduleAggregator, ScheduleOutcome};
