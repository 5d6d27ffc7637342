//! # Database Module
//!
//! SQLite-backed persistence for reminders. The database is the only state
//! shared between the request path and the delivery loop; nothing is cached
//! in memory, every reader sees the table fresh.
//!
//! Statements run synchronously on the async runtime while the connection
//! lock is held. Every query here touches a handful of rows at most; switch
//! to `spawn_blocking` if that ever stops being true.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use std::sync::Arc;

use log::debug;
use sqlite::{Connection, ConnectionThreadSafe, State};
use thiserror::Error;
use tokio::sync::Mutex;

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reminder storage at {path} is unavailable: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: sqlite::Error,
    },
    #[error("reminder write failed: {0}")]
    Write(#[source] sqlite::Error),
    #[error("reminder query failed: {0}")]
    Query(#[source] sqlite::Error),
}

/// A persisted reminder row.
#[derive(Debug, Clone)]
pub struct Reminder {
    /// Identity and deletion key, assigned by SQLite on insert.
    pub id: i64,
    /// Who asked to be reminded; also the delivery target.
    pub requester: String,
    /// Absolute delivery time, epoch seconds.
    pub due_at: i64,
    /// What was promised to the user, rendered once at creation.
    pub due_at_display: String,
    /// The text to deliver.
    pub message: String,
    /// Human-readable creation timestamp, informational only.
    pub created_at: String,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reminders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    requester TEXT NOT NULL,
    due_at INTEGER NOT NULL,
    due_at_display TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reminders_due_at ON reminders (due_at);
";

/// Cloneable handle to the reminder store.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<ConnectionThreadSafe>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let connection =
            Connection::open_thread_safe(path).map_err(|source| StoreError::Unavailable {
                path: path.to_string(),
                source,
            })?;

        connection
            .execute(SCHEMA)
            .map_err(|source| StoreError::Unavailable {
                path: path.to_string(),
                source,
            })?;

        debug!("Opened reminder database at {path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Insert one reminder and return its assigned id.
    ///
    /// Runs inside a transaction; on failure the insert is rolled back and no
    /// partial row is visible.
    pub async fn add_reminder(
        &self,
        requester: &str,
        due_at: i64,
        due_at_display: &str,
        message: &str,
        created_at: &str,
    ) -> Result<i64, StoreError> {
        let connection = self.connection.lock().await;

        connection
            .execute("BEGIN IMMEDIATE")
            .map_err(StoreError::Write)?;

        match Self::insert_row(&connection, requester, due_at, due_at_display, message, created_at)
        {
            Ok(id) => {
                connection.execute("COMMIT").map_err(StoreError::Write)?;
                debug!("Stored reminder #{id} for {requester}, due at {due_at}");
                Ok(id)
            }
            Err(source) => {
                // The original error is the one worth reporting.
                let _ = connection.execute("ROLLBACK");
                Err(StoreError::Write(source))
            }
        }
    }

    fn insert_row(
        connection: &ConnectionThreadSafe,
        requester: &str,
        due_at: i64,
        due_at_display: &str,
        message: &str,
        created_at: &str,
    ) -> Result<i64, sqlite::Error> {
        let mut statement = connection.prepare(
            "INSERT INTO reminders (requester, due_at, due_at_display, message, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, requester))?;
        statement.bind((2, due_at))?;
        statement.bind((3, due_at_display))?;
        statement.bind((4, message))?;
        statement.bind((5, created_at))?;
        statement.next()?;

        let mut rowid = connection.prepare("SELECT last_insert_rowid()")?;
        rowid.next()?;
        rowid.read::<i64, _>(0)
    }

    /// All reminders with `due_at < now`, oldest id first.
    ///
    /// An empty vec just means nothing is due yet.
    pub async fn due_reminders(&self, now: i64) -> Result<Vec<Reminder>, StoreError> {
        let connection = self.connection.lock().await;

        let mut statement = connection
            .prepare(
                "SELECT id, requester, due_at, due_at_display, message, created_at
                 FROM reminders WHERE due_at < ? ORDER BY id ASC",
            )
            .map_err(StoreError::Query)?;
        statement.bind((1, now)).map_err(StoreError::Query)?;

        let mut due = Vec::new();
        while let State::Row = statement.next().map_err(StoreError::Query)? {
            due.push(Reminder {
                id: statement.read::<i64, _>("id").map_err(StoreError::Query)?,
                requester: statement
                    .read::<String, _>("requester")
                    .map_err(StoreError::Query)?,
                due_at: statement
                    .read::<i64, _>("due_at")
                    .map_err(StoreError::Query)?,
                due_at_display: statement
                    .read::<String, _>("due_at_display")
                    .map_err(StoreError::Query)?,
                message: statement
                    .read::<String, _>("message")
                    .map_err(StoreError::Query)?,
                created_at: statement
                    .read::<String, _>("created_at")
                    .map_err(StoreError::Query)?,
            });
        }

        Ok(due)
    }

    /// Run arbitrary SQL. Lets tests break the schema out from under the
    /// store to force write failures.
    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<(), StoreError> {
        let connection = self.connection.lock().await;
        connection.execute(sql).map_err(StoreError::Write)
    }

    /// Delete a reminder by id. Deleting an id that is already gone is fine.
    pub async fn delete_reminder(&self, id: i64) -> Result<(), StoreError> {
        let connection = self.connection.lock().await;

        let mut statement = connection
            .prepare("DELETE FROM reminders WHERE id = ?")
            .map_err(StoreError::Write)?;
        statement.bind((1, id)).map_err(StoreError::Write)?;
        statement.next().map_err(StoreError::Write)?;

        Ok(())
    }
}
