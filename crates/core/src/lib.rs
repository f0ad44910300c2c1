//! Core domain logic for the uisched schedule engine.
//!
//! This crate is pure and performs no I/O. It contains:
//!
//! - [`time`]: classified time descriptors and the window resolver that
//!   turns them into concrete calendar dates.
//! - [`clock`]: the injected time source used instead of global
//!   wall-clock reads.
//! - [`cache`]: the cache store contract, session-scoped key derivation
//!   and JSON payload serialization.
//! - [`schedule`]: class-session and exam-record types plus the text
//!   formatters used for downstream presentation.
//! - [`session`]: the explicit conversation-session context threaded
//!   through every cache and aggregation call.

pub mod cache;
pub mod clock;
pub mod schedule;
pub mod session;
pub mod time;
