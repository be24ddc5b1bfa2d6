//! Korean dictionary importer core.
//! Loads the dictionary XML dump, cleans and validates every headword, and
//! persists the result into SQLite.

pub mod charset;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use import::exceptions::{Correction, ExceptionTable, ExceptionTableError};
pub use import::source::{ItemReader, RawItem, SourceError};
pub use import::transform::{RecordTransformer, TransformError, TransformOutcome};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::KoreanWordCategory;
pub use model::hanja::{Hanja, HanjaUsage};
pub use model::sense::{KoreanWordSense, PartOfSpeech, SenseId};
pub use model::validation::{ValidationError, ValidationErrorKind};
pub use model::word::{KoreanWord, WordId, WordType, WordUnit};
pub use repo::dictionary_repo::{
    DictionaryRepository, RepoError, RepoResult, SqliteDictionaryRepository,
};
pub use service::import_service::{
    import_dictionary, import_dictionary_file, ImportError, ImportService, ImportStats,
    ItemOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
