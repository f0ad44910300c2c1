//! Session-scoped schedule aggregation engine.
//!
//! In-process library consumed by a chat-orchestration layer: it resolves
//! classified time descriptors into calendar dates, fetches class and
//! exam data through a session-scoped cache-aside gateway, and formats
//! the merged results for presentation.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod ports;

pub use aggregate::{ExamOutcome, ExamQueryMode, ScheduleOutcome};
pub use config::Config;
pub use engine::ScheduleEngine;
pub use error::{EngineError, Result};
pub use gateway::{CacheGateway, CacheInfo, Cacheable};

// Re-export the core domain for callers that construct descriptors or
// implement ports.
pub use uisched_core as core;
