//! End-to-end engine tests over the in-memory store with mocked ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Barrier;

use uisched::core::clock::FixedClock;
use uisched::core::schedule::{
    ClassSession, ExamRecord, WeekWindow, WeeklySchedule, NO_EXAMS_MESSAGE,
};
use uisched::core::session::SessionContext;
use uisched::core::time::{RelativeDay, TimeDescriptor, Token, TokenSet};
use uisched::cache::MemoryStore;
use uisched::ports::{AuthPort, ClassifierPort, ExamDataPort, ScheduleDataPort};
use uisched::{Config, EngineError, ExamQueryMode, Result, ScheduleEngine};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config() -> Config {
    Config {
        cache_ttl_seconds: 3600,
        cache_max_entries: 1000,
        redis_url: String::new(),
    }
}

// ---- mock ports -----------------------------------------------------------

struct StubClassifier {
    descriptor: Result<TimeDescriptor>,
}

#[async_trait]
impl ClassifierPort for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<TimeDescriptor> {
        self.descriptor.clone()
    }
}

struct StubAuth {
    semester_calls: AtomicUsize,
}

impl StubAuth {
    fn new() -> Self {
        Self {
            semester_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthPort for StubAuth {
    async fn login(&self, _username: &str, password: &str) -> Result<()> {
        if password == "secret" {
            Ok(())
        } else {
            Err(EngineError::Auth("Sai tên đăng nhập hoặc mật khẩu".into()))
        }
    }

    async fn current_semester(&self) -> Result<String> {
        self.semester_calls.fetch_add(1, Ordering::SeqCst);
        Ok("20232".to_string())
    }
}

/// One class on Monday 2024-03-11; optionally rendezvous at a barrier so
/// two in-flight fetches can be forced to overlap.
struct StubSchedulePort {
    calls: AtomicUsize,
    barrier: Option<Arc<Barrier>>,
}

impl StubSchedulePort {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            barrier: None,
        }
    }

    fn with_barrier(barrier: Arc<Barrier>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            barrier: Some(barrier),
        }
    }
}

#[async_trait]
impl ScheduleDataPort for StubSchedulePort {
    async fn fetch_week_schedule(&self, semester: &str) -> Result<WeeklySchedule> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        let monday = date(2024, 3, 11);
        let window = WeekWindow::new(
            monday,
            date(2024, 3, 17),
            vec![ClassSession::new("Lập trình Web", "INT1434", monday)
                .with_periods(1, 4)
                .with_room("2B11")
                .with_instructor("Nguyễn Văn A")],
        );
        Ok(WeeklySchedule::new(semester, vec![window]))
    }
}

struct StubExamPort {
    calls: AtomicUsize,
}

impl StubExamPort {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ExamDataPort for StubExamPort {
    async fn fetch_semester_exams(
        &self,
        _semester: &str,
        _is_midterm: bool,
    ) -> Result<Vec<ExamRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ExamRecord::new(
            "Toán rời rạc",
            "INT1358",
            date(2024, 3, 25),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        )
        .with_format("Tự luận")
        .with_duration(90)
        .with_room("2A08")
        .with_location("Cơ sở chính")])
    }
}

// ---- wiring ---------------------------------------------------------------

struct Harness {
    engine: ScheduleEngine<MemoryStore>,
    clock: Arc<FixedClock>,
    schedule_port: Arc<StubSchedulePort>,
    exam_port: Arc<StubExamPort>,
    auth: Arc<StubAuth>,
}

fn harness_with(
    classifier_result: Result<TimeDescriptor>,
    schedule_port: Arc<StubSchedulePort>,
) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    // Sunday before the week with the Monday class.
    let clock = Arc::new(FixedClock::on_date(date(2024, 3, 10)));
    let store = Arc::new(MemoryStore::new(1000, clock.clone()));
    let exam_port = Arc::new(StubExamPort::new());
    let auth = Arc::new(StubAuth::new());
    let engine = ScheduleEngine::new(
        &test_config(),
        store,
        clock.clone(),
        Arc::new(StubClassifier {
            descriptor: classifier_result,
        }),
        auth.clone(),
        schedule_port.clone(),
        exam_port.clone(),
    );
    Harness {
        engine,
        clock,
        schedule_port,
        exam_port,
        auth,
    }
}

fn harness(classifier_result: Result<TimeDescriptor>) -> Harness {
    harness_with(classifier_result, Arc::new(StubSchedulePort::new()))
}

fn tomorrow() -> TimeDescriptor {
    TimeDescriptor::Day(TokenSet::Single(Token::Relative(RelativeDay::Tomorrow)))
}

fn session(id: &str) -> SessionContext {
    SessionContext::from_id(id)
}

// ---- tests ----------------------------------------------------------------

#[tokio::test]
async fn tomorrow_from_sunday_lands_on_monday_class() {
    let h = harness(Ok(tomorrow()));

    let outcome = h
        .engine
        .resolve_schedule_for_query(&session("chat-1"), "mai tôi học gì")
        .await
        .unwrap();

    assert_eq!(outcome.date_info, "11/03/2024");
    assert_eq!(outcome.days.len(), 1);
    assert!(outcome.schedule_text.contains("Lập trình Web (INT1434)"));
    assert!(!outcome.from_cache);
}

#[tokio::test]
async fn repeat_query_is_served_from_cache() {
    let h = harness(Ok(tomorrow()));
    let ctx = session("chat-1");

    h.engine
        .resolve_schedule_for_query(&ctx, "mai tôi học gì")
        .await
        .unwrap();
    let second = h
        .engine
        .resolve_schedule_for_query(&ctx, "mai tôi học gì")
        .await
        .unwrap();

    assert!(second.from_cache);
    assert_eq!(h.schedule_port.calls.load(Ordering::SeqCst), 1);
    // Semester lookup is cached too.
    assert_eq!(h.auth.semester_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cache_expires_after_ttl() {
    let h = harness(Ok(tomorrow()));
    let ctx = session("chat-1");

    h.engine
        .resolve_schedule_for_query(&ctx, "mai tôi học gì")
        .await
        .unwrap();
    h.clock.advance(chrono::Duration::seconds(3601));
    let later = h
        .engine
        .resolve_schedule_for_query(&ctx, "mai tôi học gì")
        .await
        .unwrap();

    assert!(!later.from_cache);
    assert_eq!(h.schedule_port.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn classifier_failure_degrades_to_refusal() {
    let h = harness(Err(EngineError::DataFetch("classifier down".into())));

    let outcome = h
        .engine
        .resolve_schedule_for_query(&session("chat-1"), "lúc nào đó")
        .await
        .unwrap();

    assert!(outcome.schedule_text.contains("chỉ hỗ trợ truy vấn"));
    assert!(outcome.days.is_empty());
    assert_eq!(h.schedule_port.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exam_query_with_no_matching_dates_answers_literally() {
    let h = harness(Ok(tomorrow()));

    // The only exam is on 25/03; tomorrow is 11/03.
    let outcome = h
        .engine
        .resolve_exams_for_query(
            &session("chat-1"),
            "mai tôi thi gì",
            ExamQueryMode::Filtered,
            false,
        )
        .await
        .unwrap();

    assert_eq!(outcome.exam_count, 0);
    assert_eq!(outcome.exam_text, NO_EXAMS_MESSAGE);
    assert_eq!(h.exam_port.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn full_exam_mode_returns_semester_list() {
    let h = harness(Ok(tomorrow()));

    let outcome = h
        .engine
        .resolve_exams(&session("chat-1"), &tomorrow(), ExamQueryMode::Full, false)
        .await
        .unwrap();

    assert_eq!(outcome.exam_count, 1);
    assert!(outcome.exam_text.contains("Toán rời rạc"));
}

#[tokio::test]
async fn concurrent_misses_both_compute_and_converge() {
    // Barrier(2) inside the port: neither fetch can finish until both
    // have started, so both requests observe a miss.
    let barrier = Arc::new(Barrier::new(2));
    let h = Arc::new(harness_with(
        Ok(tomorrow()),
        Arc::new(StubSchedulePort::with_barrier(barrier)),
    ));
    let ctx = session("chat-1");

    // Warm the semester entry so the barrier only gates the day fetches.
    h.engine.current_semester(&ctx).await.unwrap();

    let (a, b) = {
        let (h1, h2) = (h.clone(), h.clone());
        let (c1, c2) = (ctx.clone(), ctx.clone());
        tokio::join!(
            tokio::spawn(async move { h1.engine.resolve_schedule(&c1, &tomorrow()).await }),
            tokio::spawn(async move { h2.engine.resolve_schedule(&c2, &tomorrow()).await }),
        )
    };
    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();

    // Both computed, last write won, answers agree.
    assert_eq!(h.schedule_port.calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.schedule_text, b.schedule_text);
    assert!(!a.from_cache);
    assert!(!b.from_cache);

    // The stored entry is intact: the next call hits it.
    let third = h.engine.resolve_schedule(&ctx, &tomorrow()).await.unwrap();
    assert!(third.from_cache);
    assert_eq!(third.schedule_text, a.schedule_text);
}

#[tokio::test]
async fn invalidation_is_scoped_to_one_session() {
    let h = harness(Ok(tomorrow()));
    let (alice, bob) = (session("chat-alice"), session("chat-bob"));

    for ctx in [&alice, &bob] {
        h.engine.resolve_schedule(ctx, &tomorrow()).await.unwrap();
    }

    // semester + one day entry per session
    let removed = h.engine.invalidate_session(&alice).await;
    assert_eq!(removed, 2);

    assert_eq!(h.engine.cache_info(&alice).await.count, 0);
    let bob_info = h.engine.cache_info(&bob).await;
    assert_eq!(bob_info.count, 2);
    assert!(bob_info.keys.iter().all(|k| k.starts_with("ptit:chat-bob:")));

    // Bob's answers are untouched.
    let again = h.engine.resolve_schedule(&bob, &tomorrow()).await.unwrap();
    assert!(again.from_cache);
}

#[tokio::test]
async fn login_maps_bad_credentials_to_auth_error() {
    let h = harness(Ok(tomorrow()));

    assert!(h.engine.login("sv001", "secret").await.is_ok());
    let err = h.engine.login("sv001", "wrong").await.unwrap_err();
    assert!(matches!(err, EngineError::Auth(_)));
    assert_eq!(err.user_message(), "Sai tên đăng nhập hoặc mật khẩu");
}
