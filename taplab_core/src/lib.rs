//! Timing and analytics engine for the tap trainer.
//!
//! A session schedules a drill, matches taps against the expected instants,
//! records the resolved taps with live statistics, and hands the finished log
//! to [`analytics`].

pub mod analytics;
pub mod config;
pub mod gameplay;
pub mod input;
pub mod session;
pub mod stats;
pub mod time;

pub use drill_schema::{Channel, Drill, Millis};
pub use session::{Session, SessionOutcome, SessionStatus, SharedSession};
