//! SQLite storage bootstrap for the dictionary store.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply the dictionary schema before any import or query runs.
//!
//! # Schema
//! - `korean_words`: one row per headword, keyed by the source `target_code`.
//!   `unit`, `word_type` store enum codes.
//! - `korean_word_senses`: keyed by `sense_code`, owned by a word; `pos` stores
//!   the part-of-speech code.
//! - `hanja` and `hanja_usages`: one row per distinct character, plus a
//!   (character, word) link for every word spelling it.
//! - `korean_word_categories` and `korean_word_sense_categories`: the seeded
//!   category set and its many-to-many link to senses.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Foreign keys are enforced so senses and usages cascade with their word.
//! - No identifier is generated by the database; every key comes from the dump.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "dictionary schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
