// Core layer - configuration
pub mod core;

// Infrastructure - reminder persistence
pub mod database;

// Features layer
pub mod features;

// Outbound message boundary
pub mod sink;

// Re-export core config for convenience
pub use core::Config;

pub use database::{Database, Reminder, StoreError};
pub use features::reminders::{
    parse_duration, DurationError, RemindHandler, ReminderScheduler, REMIND_COMMAND,
};
pub use sink::{DiscordSink, MessageSink};
