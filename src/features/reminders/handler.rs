//! Reminder request handling.
//!
//! Turns a `!remind <duration> <message>` chat line into a stored reminder.
//! Every outcome, good or bad, becomes a reply string for the requester; this
//! path never errors out.

use chrono::Utc;
use log::{error, info};

use super::duration::parse_duration;
use crate::database::Database;

/// Literal first token that marks a reminder request. Case-sensitive.
pub const REMIND_COMMAND: &str = "!remind";

/// Render an epoch-seconds timestamp the way it is promised to users.
///
/// Rendered once at creation and stored verbatim, so the delivered reminder
/// repeats exactly what the confirmation said.
pub(crate) fn format_epoch(epoch: i64) -> String {
    match chrono::DateTime::from_timestamp(epoch, 0) {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => epoch.to_string(),
    }
}

/// Handles incoming reminder requests.
pub struct RemindHandler {
    database: Database,
}

impl RemindHandler {
    pub fn new(database: Database) -> Self {
        RemindHandler { database }
    }

    /// Whether a chat line is addressed to us at all.
    pub fn is_remind_command(text: &str) -> bool {
        text.split_whitespace().next() == Some(REMIND_COMMAND)
    }

    /// Handle a reminder request and produce the reply to send back.
    pub async fn handle(&self, requester: &str, text: &str) -> String {
        self.handle_at(requester, text, Utc::now().timestamp()).await
    }

    /// Clock-injected variant of [`Self::handle`]; `now` is epoch seconds,
    /// read exactly once by the caller.
    pub async fn handle_at(&self, requester: &str, text: &str, now: i64) -> String {
        // Expected shape: !remind <amount><unit> <message...>
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 2 {
            return format!("Not enough parts - try `{REMIND_COMMAND} 24h water the plants`.");
        }

        let message = parts[2..].join(" ");
        if message.is_empty() {
            return "You didn't give me anything to remind you of.".to_string();
        }

        let seconds = match parse_duration(parts[1]) {
            Ok(seconds) => seconds,
            // The parser's words are the user's error message.
            Err(e) => return e.to_string(),
        };

        let due_at = now.saturating_add(seconds);
        let due_at_display = format_epoch(due_at);
        let created_at = format_epoch(now);

        match self
            .database
            .add_reminder(requester, due_at, &due_at_display, &message, &created_at)
            .await
        {
            Ok(id) => {
                info!("Created reminder #{id} for {requester}, due at {due_at_display} ({due_at})");
                format!("Got it! Reminder #{id} set for {due_at_display} (epoch {due_at}): {message}")
            }
            Err(e) => {
                error!("Failed to save reminder for {requester}: {e}");
                format!("I couldn't save that reminder: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::duration::DurationError;

    async fn test_handler() -> RemindHandler {
        RemindHandler::new(Database::new(":memory:").await.expect("open in-memory db"))
    }

    #[test]
    fn recognizes_the_command_prefix() {
        assert!(RemindHandler::is_remind_command("!remind 24h feed the cat"));
        assert!(RemindHandler::is_remind_command("  !remind 24h x"));
        assert!(!RemindHandler::is_remind_command("!Remind 24h x"));
        assert!(!RemindHandler::is_remind_command("!reminder 24h x"));
        assert!(!RemindHandler::is_remind_command("hello !remind"));
    }

    #[tokio::test]
    async fn rejects_request_without_an_amount() {
        let handler = test_handler().await;

        let reply = handler.handle_at("alice", "!remind", 1_000).await;

        assert!(reply.contains("Not enough parts"));
        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn rejects_request_without_a_message() {
        let handler = test_handler().await;

        let reply = handler.handle_at("alice", "!remind 10h", 1_000).await;

        assert!(reply.contains("anything to remind you of"));
        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn surfaces_parser_errors_verbatim() {
        let handler = test_handler().await;

        let reply = handler.handle_at("alice", "!remind 24x buy milk", 1_000).await;

        let expected = DurationError::UnknownUnit {
            unit: 'x',
            token: "24x".to_string(),
        };
        assert_eq!(reply, expected.to_string());
        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn stores_the_reminder_and_echoes_it_back() {
        let handler = test_handler().await;

        let reply = handler
            .handle_at("alice", "!remind 10h buy milk", 1_000)
            .await;

        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].requester, "alice");
        assert_eq!(rows[0].message, "buy milk");
        assert_eq!(rows[0].due_at, 1_000 + 36_000);
        assert_eq!(rows[0].due_at_display, format_epoch(37_000));

        assert!(reply.contains("buy milk"));
        assert!(reply.contains("37000"));
        assert!(reply.contains(&format_epoch(37_000)));
    }

    #[tokio::test]
    async fn store_failure_becomes_a_failure_reply_with_the_reason() {
        let handler = test_handler().await;
        handler
            .database
            .execute_raw("DROP TABLE reminders")
            .await
            .unwrap();

        let reply = handler
            .handle_at("alice", "!remind 10h buy milk", 1_000)
            .await;

        assert!(reply.contains("I couldn't save that reminder"));
        assert!(reply.contains("reminder write failed"));

        // No row survived the failed create.
        handler
            .database
            .execute_raw(
                "CREATE TABLE reminders (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     requester TEXT NOT NULL,
                     due_at INTEGER NOT NULL,
                     due_at_display TEXT NOT NULL,
                     message TEXT NOT NULL,
                     created_at TEXT NOT NULL
                 )",
            )
            .await
            .unwrap();
        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn joins_multi_token_messages_with_single_spaces() {
        let handler = test_handler().await;

        handler
            .handle_at("bob", "!remind 30s water   the   plants", 0)
            .await;

        let rows = handler.database.due_reminders(i64::MAX).await.unwrap();
        assert_eq!(rows[0].message, "water the plants");
    }

    #[test]
    fn formats_epochs_as_fixed_utc() {
        assert_eq!(format_epoch(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_epoch(86_400), "1970-01-02 00:00:00 UTC");
    }
}
