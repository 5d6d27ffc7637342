//! # Features Layer
//!
//! Feature modules. Reminders is the only feature this bot carries.

pub mod reminders;

pub use reminders::{RemindHandler, ReminderScheduler};
