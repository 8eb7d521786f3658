//! Durable task store file: connection setup and schema versioning.
//!
//! # Responsibility
//! - Hand the SQLite repository a connection whose `tasks` table is current.
//! - Refuse store files written by a newer build instead of guessing.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - `open_db*` returns only after every pending migration committed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating a task store file.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's schema is ahead of every migration this build knows.
    StoreFromNewerBuild {
        store_version: u32,
        known_version: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "task store sqlite error: {err}"),
            Self::StoreFromNewerBuild {
                store_version,
                known_version,
            } => write!(
                f,
                "task store schema v{store_version} comes from a newer build; this build stops at v{known_version}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::StoreFromNewerBuild { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
