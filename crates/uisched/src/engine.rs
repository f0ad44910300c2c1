//! The engine facade.
//!
//! One [`ScheduleEngine`] is shared across every chat session; isolation
//! comes from the session id baked into each cache key, not from
//! per-session state.

use std::sync::Arc;

use uisched_core::cache::{ApiType, CacheParams, CacheStore};
use uisched_core::clock::Clock;
use uisched_core::session::SessionContext;
use uisched_core::time::TimeDescriptor;

use crate::aggregate::{
    ExamAggregator, ExamOutcome, ExamQueryMode, ScheduleAggregator, ScheduleOutcome,
};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{CacheGateway, CacheInfo};
use crate::ports::{AuthPort, ClassifierPort, ExamDataPort, ScheduleDataPort};

pub struct ScheduleEngine<S: CacheStore> {
    gateway: Arc<CacheGateway<S>>,
    schedule: ScheduleAggregator<S>,
    exams: ExamAggregator<S>,
    classifier: Arc<dyn ClassifierPort>,
    auth: Arc<dyn AuthPort>,
}

impl<S: CacheStore> ScheduleEngine<S> {
    pub fn new(
        config: &Config,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        classifier: Arc<dyn ClassifierPort>,
        auth: Arc<dyn AuthPort>,
        schedule_port: Arc<dyn ScheduleDataPort>,
        exam_port: Arc<dyn ExamDataPort>,
    ) -> Self {
        let gateway = Arc::new(CacheGateway::new(store, config.cache_ttl()));
        Self {
            schedule: ScheduleAggregator::new(gateway.clone(), schedule_port, clock.clone()),
            exams: ExamAggregator::new(gateway.clone(), exam_port, clock),
            gateway,
            classifier,
            auth,
        }
    }

    /// Authenticates against the university system.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.auth.login(username, password).await
    }

    /// The current semester id, cached per session.
    pub async fn current_semester(&self, session: &SessionContext) -> Result<String> {
        let (semester, _) = self
            .gateway
            .get_or_compute(
                session,
                ApiType::CurrentSemester,
                &CacheParams::new(),
                || async { self.auth.current_semester().await },
            )
            .await?;
        Ok(semester)
    }

    /// Answers a schedule query for an already-classified window.
    pub async fn resolve_schedule(
        &self,
        session: &SessionContext,
        descriptor: &TimeDescriptor,
    ) -> Result<ScheduleOutcome> {
        let semester = self.current_semester(session).await?;
        self.schedule.aggregate(session, descriptor, &semester).await
    }

    /// Classifies free-form text, then answers the schedule query.
    ///
    /// Classifier failures degrade to a far-time refusal instead of an
    /// error; a student always gets an answer sentence.
    pub async fn resolve_schedule_for_query(
        &self,
        session: &SessionContext,
        text: &str,
    ) -> Result<ScheduleOutcome> {
        let descriptor = self.classify(session, text).await;
        self.resolve_schedule(session, &descriptor).await
    }

    /// Answers an exam query for an already-classified window.
    pub async fn resolve_exams(
        &self,
        session: &SessionContext,
        descriptor: &TimeDescriptor,
        mode: ExamQueryMode,
        is_midterm: bool,
    ) -> Result<ExamOutcome> {
        let semester = self.current_semester(session).await?;
        self.exams
            .aggregate(session, descriptor, &semester, mode, is_midterm)
            .await
    }

    /// Classifies free-form text, then answers the exam query.
    pub async fn resolve_exams_for_query(
        &self,
        session: &SessionContext,
        text: &str,
        mode: ExamQueryMode,
        is_midterm: bool,
    ) -> Result<ExamOutcome> {
        let descriptor = self.classify(session, text).await;
        self.resolve_exams(session, &descriptor, mode, is_midterm)
            .await
    }

    /// Drops every cache entry belonging to the session.
    pub async fn invalidate_session(&self, session: &SessionContext) -> usize {
        self.gateway.invalidate_session(session).await
    }

    /// Cache diagnostics for the session.
    pub async fn cache_info(&self, session: &SessionContext) -> CacheInfo {
        self.gateway.cache_info(session).await
    }

    async fn classify(&self, session: &SessionContext, text: &str) -> TimeDescriptor {
        match self.classifier.classify(text).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %err,
                    "Classification failed, treating query as far-time"
                );
                TimeDescriptor::FarTime
            }
        }
    }
}
