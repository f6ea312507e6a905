use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::Error;

/// Per-user aggregate on the leaderboard. Both counters only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub username: String,
    pub points: u64,
    pub correct_classifications: u64,
}

/// Durable points ledger, keyed by username, backed by SQLite.
///
/// The connection sits behind a mutex and every score update is a single
/// upsert statement, so concurrent classifications by the same user cannot
/// drop an increment.
pub struct Ledger {
    conn: Mutex<Connection>,
}

impl Ledger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::init(Connection::open(path)?)
    }

    /// Transient ledger for tests.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS leaderboard (
                username                TEXT PRIMARY KEY,
                points                  INTEGER NOT NULL DEFAULT 0
                                        CHECK (points >= 0),
                correct_classifications INTEGER NOT NULL DEFAULT 0
                                        CHECK (correct_classifications >= 0)
            )",
            [],
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Credit one classification to `username`: first call creates the row,
    /// every call adds `points` and bumps the classification count by one.
    /// Atomic per username.
    pub fn record_classification(
        &self,
        username: &str,
        points: u32,
    ) -> Result<LedgerEntry, Error> {
        let entry = self.conn().query_row(
            "INSERT INTO leaderboard (username, points, correct_classifications)
             VALUES (?1, ?2, 1)
             ON CONFLICT(username) DO UPDATE SET
                 points = points + excluded.points,
                 correct_classifications = correct_classifications + 1
             RETURNING username, points, correct_classifications",
            params![username, points],
            Self::row_to_entry,
        )?;
        Ok(entry)
    }

    /// Top `n` entries by points. Ties break on username, lexically
    /// ascending, so the ordering is deterministic.
    pub fn top_n(&self, n: usize) -> Result<Vec<LedgerEntry>, Error> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT username, points, correct_classifications
             FROM leaderboard
             ORDER BY points DESC, username ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![n as i64], Self::row_to_entry)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn entry(&self, username: &str) -> Result<Option<LedgerEntry>, Error> {
        let entry = self
            .conn()
            .query_row(
                "SELECT username, points, correct_classifications
                 FROM leaderboard WHERE username = ?1",
                params![username],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerEntry> {
        Ok(LedgerEntry {
            username: row.get(0)?,
            points: row.get(1)?,
            correct_classifications: row.get(2)?,
        })
    }

    /// Simulate a storage outage: every subsequent call fails with
    /// [`Error::LedgerUnavailable`].
    #[cfg(test)]
    pub(crate) fn drop_backing_table(&self) {
        self.conn().execute("DROP TABLE leaderboard", []).unwrap();
    }
}
