//! Exam schedule aggregation.
//!
//! Unlike the class schedule, exams are cached as one semester-wide list
//! and filtered in memory, since the upstream only serves the full list.
//! A window with no matching exams is answered literally; there is no
//! current-week fallback on this path.

use std::sync::Arc;

use uisched_core::cache::{ApiType, CacheParams, CacheStore};
use uisched_core::clock::Clock;
use uisched_core::schedule::{format_exams, ExamRecord, NO_EXAMS_MESSAGE};
use uisched_core::session::SessionContext;
use uisched_core::time::{resolve, TimeDescriptor};

use crate::error::Result;
use crate::gateway::CacheGateway;
use crate::ports::ExamDataPort;

/// How much of the semester exam list a query wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamQueryMode {
    /// Only exams falling on the resolved dates.
    Filtered,
    /// The whole semester list, window ignored.
    Full,
}

/// A rendered exam answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamOutcome {
    pub exam_text: String,
    pub exam_count: usize,
    /// The exams behind the text, in upstream order.
    pub records: Vec<ExamRecord>,
    pub from_cache: bool,
}

impl ExamOutcome {
    fn none_matching() -> Self {
        Self {
            exam_text: NO_EXAMS_MESSAGE.to_string(),
            exam_count: 0,
            records: Vec::new(),
            from_cache: false,
        }
    }
}

pub struct ExamAggregator<S: CacheStore> {
    gateway: Arc<CacheGateway<S>>,
    port: Arc<dyn ExamDataPort>,
    clock: Arc<dyn Clock>,
}

impl<S: CacheStore> ExamAggregator<S> {
    pub fn new(
        gateway: Arc<CacheGateway<S>>,
        port: Arc<dyn ExamDataPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            port,
            clock,
        }
    }

    /// Answers an exam query for the given window and semester.
    ///
    /// In [`ExamQueryMode::Filtered`] an unresolvable window short-circuits
    /// to the "no matching exams" answer without touching the upstream.
    pub async fn aggregate(
        &self,
        session: &SessionContext,
        descriptor: &TimeDescriptor,
        semester: &str,
        mode: ExamQueryMode,
        is_midterm: bool,
    ) -> Result<ExamOutcome> {
        let dates = resolve(descriptor, self.clock.today());
        if mode == ExamQueryMode::Filtered && dates.is_empty() {
            tracing::debug!(
                session_id = %session.id(),
                "Exam window resolved to no dates, answering without fetching"
            );
            return Ok(ExamOutcome::none_matching());
        }

        let params = CacheParams::new()
            .with("scope", "semester")
            .with("semester", semester)
            .with("midterm", if is_midterm { "1" } else { "0" });

        let (all_exams, from_cache) = self
            .gateway
            .get_or_compute(session, ApiType::Exams, &params, || async {
                self.port.fetch_semester_exams(semester, is_midterm).await
            })
            .await?;

        let records: Vec<ExamRecord> = match mode {
            ExamQueryMode::Full => all_exams,
            ExamQueryMode::Filtered => all_exams
                .into_iter()
                .filter(|exam| dates.contains(&exam.date))
                .collect(),
        };

        Ok(ExamOutcome {
            exam_text: format_exams(&records),
            exam_count: records.len(),
            records,
            from_cache,
        })
    }
}
