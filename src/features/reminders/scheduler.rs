//! Background reminder delivery.
//!
//! A single recurring task: sleep, read the due set, push each reminder
//! through the message sink, delete what was sent. Delivery is send-then-
//! delete across two independent systems with no ledger, so a crash between
//! the two can redeliver a reminder on restart; that trade-off is deliberate
//! and documented rather than papered over.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};

use crate::database::Database;
use crate::sink::MessageSink;

/// Delivery latency bound: a reminder due at T goes out by T + this interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on any single storage call inside a cycle.
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// The delivery loop. Runs as a singleton background task.
pub struct ReminderScheduler {
    database: Database,
    sink: Arc<dyn MessageSink>,
    poll_interval: Duration,
}

impl ReminderScheduler {
    pub fn new(database: Database, sink: Arc<dyn MessageSink>, poll_interval: Duration) -> Self {
        ReminderScheduler {
            database,
            sink,
            poll_interval,
        }
    }

    /// Run forever. Storage and sink failures are logged and retried on the
    /// next tick; nothing on this path ever takes the process down.
    pub async fn run(self) {
        info!(
            "Reminder delivery loop started (interval: {:?})",
            self.poll_interval
        );

        loop {
            tokio::time::sleep(self.poll_interval).await;
            self.run_cycle(Utc::now().timestamp()).await;
        }
    }

    /// One delivery cycle at the given clock reading. Returns how many
    /// reminders went out.
    pub async fn run_cycle(&self, now: i64) -> usize {
        let due = match tokio::time::timeout(STORE_TIMEOUT, self.database.due_reminders(now)).await
        {
            Ok(Ok(due)) => due,
            Ok(Err(e)) => {
                warn!("Skipping delivery cycle, couldn't read due reminders: {e}");
                return 0;
            }
            Err(_) => {
                warn!("Skipping delivery cycle, due-reminder query timed out after {STORE_TIMEOUT:?}");
                return 0;
            }
        };

        if due.is_empty() {
            return 0;
        }
        info!("{} reminder(s) due for delivery", due.len());

        let mut delivered = Vec::with_capacity(due.len());
        for reminder in &due {
            let text = format!(
                "Hey! On {} you asked me to remind you at {}: {}",
                reminder.created_at, reminder.due_at_display, reminder.message
            );
            match self.sink.send(&reminder.requester, &text).await {
                Ok(()) => delivered.push(reminder.id),
                // Row stays put; the next cycle tries again.
                Err(e) => error!("Failed to deliver reminder #{}: {e}", reminder.id),
            }
        }

        for id in &delivered {
            // Already sent; an undeleted row means a duplicate next cycle.
            match tokio::time::timeout(STORE_TIMEOUT, self.database.delete_reminder(*id)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Failed to delete delivered reminder #{id}: {e}"),
                Err(_) => error!("Timed out deleting delivered reminder #{id}"),
            }
        }

        delivered.len()
    }
}
