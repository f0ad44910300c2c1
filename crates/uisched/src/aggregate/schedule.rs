//! Class schedule aggregation.

use std::sync::Arc;

use chrono::NaiveDate;

use uisched_core::cache::{ApiType, CacheParams, CacheStore};
use uisched_core::clock::Clock;
use uisched_core::schedule::{
    format_date, format_day_schedule, format_multi_day, DaySchedule, FAR_TIME_MESSAGE,
};
use uisched_core::session::SessionContext;
use uisched_core::time::{resolve, week_dates, TimeDescriptor, WeekAnchor};

use crate::error::Result;
use crate::gateway::CacheGateway;
use crate::ports::ScheduleDataPort;

/// A rendered schedule answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Presentable text for the chat layer.
    pub schedule_text: String,
    /// `dd/mm/yyyy`, or `dd/mm/yyyy to dd/mm/yyyy` for ranges; empty
    /// for refused (far-time) queries.
    pub date_info: String,
    /// The per-day class lists behind the text, in date order.
    pub days: Vec<DaySchedule>,
    /// True only when every per-date lookup was served from the cache.
    pub from_cache: bool,
}

impl ScheduleOutcome {
    fn refused() -> Self {
        Self {
            schedule_text: FAR_TIME_MESSAGE.to_string(),
            date_info: String::new(),
            days: Vec::new(),
            from_cache: false,
        }
    }
}

/// Resolves a time descriptor into per-day class lists, one cache entry
/// per date.
///
/// Per-date lookups run sequentially; the first miss pulls the semester
/// blob and later misses in the same window hit the upstream again. The
/// window is at most seven dates, so the extra fetches stay bounded.
pub struct ScheduleAggregator<S: CacheStore> {
    gateway: Arc<CacheGateway<S>>,
    port: Arc<dyn ScheduleDataPort>,
    clock: Arc<dyn Clock>,
}

impl<S: CacheStore> ScheduleAggregator<S> {
    pub fn new(
        gateway: Arc<CacheGateway<S>>,
        port: Arc<dyn ScheduleDataPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            port,
            clock,
        }
    }

    /// Answers a schedule query for the given window and semester.
    ///
    /// A window that resolves to no dates falls back to the current
    /// week, so a garbled day list still produces a useful answer.
    /// Far-time descriptors are refused outright.
    pub async fn aggregate(
        &self,
        session: &SessionContext,
        descriptor: &TimeDescriptor,
        semester: &str,
    ) -> Result<ScheduleOutcome> {
        if matches!(descriptor, TimeDescriptor::FarTime) {
            tracing::debug!(session_id = %session.id(), "Far-time schedule query refused");
            return Ok(ScheduleOutcome::refused());
        }

        let today = self.clock.today();
        let mut dates = resolve(descriptor, today);
        if dates.is_empty() {
            tracing::debug!(
                session_id = %session.id(),
                "Window resolved to no dates, falling back to current week"
            );
            dates = week_dates(WeekAnchor::Current, today);
        }

        let mut days = Vec::with_capacity(dates.len());
        let mut all_hits = true;
        for date in &dates {
            let (day, from_cache) = self
                .day_schedule(session, descriptor, semester, *date)
                .await?;
            all_hits &= from_cache;
            days.push(day);
        }

        let schedule_text = if let [day] = days.as_slice() {
            format_day_schedule(day, true)
        } else {
            format_multi_day(&days, descriptor.kind_str())
        };

        Ok(ScheduleOutcome {
            schedule_text,
            date_info: date_info(&dates),
            days,
            from_cache: all_hits,
        })
    }

    async fn day_schedule(
        &self,
        session: &SessionContext,
        descriptor: &TimeDescriptor,
        semester: &str,
        date: NaiveDate,
    ) -> Result<(DaySchedule, bool)> {
        let params = CacheParams::new()
            .with("date", date.format("%Y-%m-%d").to_string())
            .with("kind", descriptor.kind_str())
            .with("value", descriptor.value_summary())
            .with("semester", semester);

        self.gateway
            .get_or_compute(session, ApiType::Schedule, &params, || async {
                let weekly = self.port.fetch_week_schedule(semester).await?;
                Ok(DaySchedule::new(date, semester, weekly.classes_on(date)))
            })
            .await
    }
}

/// `dd/mm/yyyy` for one date, `a to b` for a range.
fn date_info(dates: &[NaiveDate]) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if first == last => format_date(*first),
        (Some(first), Some(last)) => format!("{} to {}", format_date(*first), format_date(*last)),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use uisched_core::clock::FixedClock;
    use uisched_core::schedule::{ClassSession, WeekWindow, WeeklySchedule};
    use uisched_core::session::SessionContext;
    use uisched_core::time::{TokenSet, Token, RelativeDay};

    use crate::cache::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Fixed weekly blob with one class on Monday 2024-03-11.
    struct StubSchedulePort {
        calls: AtomicUsize,
    }

    impl StubSchedulePort {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ScheduleDataPort for StubSchedulePort {
        async fn fetch_week_schedule(&self, semester: &str) -> Result<WeeklySchedule> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let monday = date(2024, 3, 11);
            let window = WeekWindow::new(
                monday,
                date(2024, 3, 17),
                vec![ClassSession::new("Lập trình Web", "INT1434", monday)
                    .with_periods(1, 4)
                    .with_room("2B11")],
            );
            Ok(WeeklySchedule::new(semester, vec![window]))
        }
    }

    fn fixture() -> (ScheduleAggregator<MemoryStore>, Arc<StubSchedulePort>) {
        let clock: Arc<FixedClock> = Arc::new(FixedClock::on_date(date(2024, 3, 11)));
        let store = Arc::new(MemoryStore::new(1000, clock.clone()));
        let gateway = Arc::new(CacheGateway::new(store, Duration::from_secs(3600)));
        let port = Arc::new(StubSchedulePort::new());
        (
            ScheduleAggregator::new(gateway, port.clone(), clock),
            port,
        )
    }

    fn session() -> SessionContext {
        SessionContext::from_id("chat-1")
    }

    fn today_descriptor() -> TimeDescriptor {
        TimeDescriptor::Day(TokenSet::Single(Token::Relative(RelativeDay::Today)))
    }

    #[tokio::test]
    async fn test_far_time_is_refused_without_fetching() {
        let (aggregator, port) = fixture();
        let outcome = aggregator
            .aggregate(&session(), &TimeDescriptor::FarTime, "20232")
            .await
            .unwrap();

        assert_eq!(outcome.schedule_text, FAR_TIME_MESSAGE);
        assert!(outcome.days.is_empty());
        assert_eq!(port.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_day_outcome() {
        let (aggregator, _) = fixture();
        let outcome = aggregator
            .aggregate(&session(), &today_descriptor(), "20232")
            .await
            .unwrap();

        assert_eq!(outcome.date_info, "11/03/2024");
        assert_eq!(outcome.days.len(), 1);
        assert_eq!(outcome.days[0].classes.len(), 1);
        assert!(outcome.schedule_text.starts_with("Lịch học ngày 11/03/2024"));
        assert!(!outcome.from_cache);
    }

    #[tokio::test]
    async fn test_second_query_served_from_cache() {
        let (aggregator, port) = fixture();
        let descriptor = today_descriptor();

        aggregator
            .aggregate(&session(), &descriptor, "20232")
            .await
            .unwrap();
        let second = aggregator
            .aggregate(&session(), &descriptor, "20232")
            .await
            .unwrap();

        assert!(second.from_cache);
        assert_eq!(port.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_window_falls_back_to_current_week() {
        let (aggregator, _) = fixture();
        // An empty token list resolves to no dates.
        let descriptor = TimeDescriptor::Day(TokenSet::List(Vec::new()));

        let outcome = aggregator
            .aggregate(&session(), &descriptor, "20232")
            .await
            .unwrap();

        assert_eq!(outcome.days.len(), 7);
        assert_eq!(outcome.date_info, "11/03/2024 to 17/03/2024");
        assert!(outcome.schedule_text.contains("--- Thứ Hai, 11/03/2024 ---"));
    }

    #[tokio::test]
    async fn test_week_query_spans_seven_days() {
        let (aggregator, _) = fixture();
        let descriptor = TimeDescriptor::Week(TokenSet::Single(Token::WeekRef(
            uisched_core::time::WeekRef::Current,
        )));

        let outcome = aggregator
            .aggregate(&session(), &descriptor, "20232")
            .await
            .unwrap();

        assert_eq!(outcome.days.len(), 7);
        // One day has the class, the other six are labeled empty.
        assert!(outcome.schedule_text.contains("Lập trình Web"));
        assert!(outcome.schedule_text.contains("Không có lớp học vào ngày này."));
    }
}
