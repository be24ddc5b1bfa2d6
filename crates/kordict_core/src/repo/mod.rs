//! Repository layer for the dictionary store.
//!
//! # Responsibility
//! - Define the storage contract used by the importer and read-only callers.
//! - Isolate SQLite query details from import orchestration.

pub mod dictionary_repo;
