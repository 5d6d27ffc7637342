//! # Reminders Feature
//!
//! Scheduled reminder system: duration parsing, request handling, and
//! background delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod duration;
pub mod handler;
pub mod scheduler;

pub use duration::{parse_duration, DurationError, Unit};
pub use handler::{RemindHandler, REMIND_COMMAND};
pub use scheduler::{ReminderScheduler, DEFAULT_POLL_INTERVAL};
