//! Dictionary import use-case.
//!
//! # Responsibility
//! - Seed the fixed category set before any record is imported.
//! - Drive source items through the record transformer into the repository.
//! - Run a whole import inside one transaction.
//!
//! # Invariants
//! - Items are processed sequentially in document order; each item's writes
//!   finish before the next item is read.
//! - The first error aborts the run and rolls back every write.
//! - Dropped records produce no rows at all.

use crate::import::exceptions::{ExceptionTable, ExceptionTableError};
use crate::import::source::{ItemReader, RawItem, SourceError};
use crate::import::transform::{
    RecordTransformer, TransformError, TransformOutcome, TransformedRecord,
};
use crate::model::category::{KoreanWordCategory, CATEGORY_LABELS};
use crate::model::hanja::HanjaUsage;
use crate::model::sense::SenseId;
use crate::model::word::WordId;
use crate::repo::dictionary_repo::{DictionaryRepository, RepoError, SqliteDictionaryRepository};
use log::{debug, error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug)]
pub enum ImportError {
    Source(SourceError),
    Transform(TransformError),
    Repo(RepoError),
    UnknownCategory { sense_id: SenseId, label: String },
    ExceptionTable(ExceptionTableError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::Transform(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownCategory { sense_id, label } => {
                write!(f, "sense {sense_id} references unknown category `{label}`")
            }
            Self::ExceptionTable(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Transform(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UnknownCategory { .. } => None,
            Self::ExceptionTable(err) => Some(err),
        }
    }
}

impl From<SourceError> for ImportError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<TransformError> for ImportError {
    fn from(value: TransformError) -> Self {
        Self::Transform(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ExceptionTableError> for ImportError {
    fn from(value: ExceptionTableError) -> Self {
        Self::ExceptionTable(value)
    }
}

/// Counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub items: u64,
    pub words: u64,
    pub dropped: u64,
    pub senses: u64,
    pub hanja_usages: u64,
    /// Distinct hanja characters first seen during this run.
    pub new_hanja: u64,
    pub categories: u64,
}

/// What happened to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Imported(WordId),
    Dropped(WordId),
}

pub struct ImportService<R: DictionaryRepository> {
    repo: R,
    transformer: RecordTransformer,
    stats: ImportStats,
}

impl<R: DictionaryRepository> ImportService<R> {
    pub fn new(repo: R, transformer: RecordTransformer) -> Self {
        Self {
            repo,
            transformer,
            stats: ImportStats::default(),
        }
    }

    /// Creates every category row. Must run once, before `import_item`.
    pub fn seed_categories(&mut self) -> ImportResult<u64> {
        for label in CATEGORY_LABELS {
            self.repo.create_category(&KoreanWordCategory::new(label))?;
            self.stats.categories += 1;
        }
        info!(
            "event=category_seed module=import status=ok count={}",
            self.stats.categories
        );
        Ok(self.stats.categories)
    }

    /// Transforms and persists one item.
    pub fn import_item(&mut self, item: &RawItem) -> ImportResult<ItemOutcome> {
        self.stats.items += 1;
        match self.transformer.transform(item)? {
            TransformOutcome::Dropped { id, correction } => {
                debug!(
                    "event=record_dropped module=import status=skip word_id={id} correction={}",
                    correction.unwrap_or("none")
                );
                self.stats.dropped += 1;
                Ok(ItemOutcome::Dropped(id))
            }
            TransformOutcome::Accepted(record) => {
                if let Some(correction) = record.correction {
                    debug!(
                        "event=record_fixed module=import status=ok word_id={} correction={correction}",
                        record.word.id()
                    );
                }
                let id = self.persist(&record)?;
                Ok(ItemOutcome::Imported(id))
            }
        }
    }

    fn persist(&mut self, record: &TransformedRecord) -> ImportResult<WordId> {
        let word_id = self.repo.create_word(&record.word)?;
        self.stats.words += 1;

        for letter in &record.hanja_letters {
            let (hanja, created) = self.repo.get_or_create_hanja(*letter)?;
            if created {
                self.stats.new_hanja += 1;
            }
            self.repo.create_hanja_usage(&HanjaUsage { hanja, word_id })?;
            self.stats.hanja_usages += 1;
        }

        for sense in &record.senses {
            for label in &sense.categories {
                if self.repo.get_category(label)?.is_none() {
                    return Err(ImportError::UnknownCategory {
                        sense_id: sense.id,
                        label: label.clone(),
                    });
                }
            }
            self.repo.create_sense(sense)?;
            self.stats.senses += 1;
        }

        Ok(word_id)
    }

    pub fn stats(&self) -> ImportStats {
        self.stats
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

/// Imports a dictionary dump from disk; see `import_dictionary`.
pub fn import_dictionary_file(
    conn: &mut Connection,
    path: impl AsRef<Path>,
    exceptions: ExceptionTable,
) -> ImportResult<ImportStats> {
    let reader = ItemReader::open(path)?;
    run_import(conn, reader, exceptions)
}

/// Seeds categories, then imports every item of `source` in one transaction.
///
/// # Errors
/// Returns the first source, validation or storage error; nothing is
/// committed in that case.
pub fn import_dictionary<S: BufRead>(
    conn: &mut Connection,
    source: S,
    exceptions: ExceptionTable,
) -> ImportResult<ImportStats> {
    run_import(conn, ItemReader::new(source), exceptions)
}

fn run_import<S: BufRead>(
    conn: &mut Connection,
    reader: ItemReader<S>,
    exceptions: ExceptionTable,
) -> ImportResult<ImportStats> {
    let started_at = Instant::now();
    info!(
        "event=import_run module=import status=start fixes_version={} fixes={}",
        exceptions.version(),
        exceptions.len()
    );

    match import_in_transaction(conn, reader, exceptions) {
        Ok(stats) => {
            info!(
                "event=import_run module=import status=ok duration_ms={} items={} words={} dropped={} senses={} hanja_usages={} new_hanja={} categories={}",
                started_at.elapsed().as_millis(),
                stats.items,
                stats.words,
                stats.dropped,
                stats.senses,
                stats.hanja_usages,
                stats.new_hanja,
                stats.categories
            );
            Ok(stats)
        }
        Err(err) => {
            error!(
                "event=import_run module=import status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn import_in_transaction<S: BufRead>(
    conn: &mut Connection,
    reader: ItemReader<S>,
    exceptions: ExceptionTable,
) -> ImportResult<ImportStats> {
    let tx = conn.transaction()?;
    let stats = {
        let repo = SqliteDictionaryRepository::new(&tx);
        let mut service = ImportService::new(repo, RecordTransformer::new(exceptions));
        service.seed_categories()?;
        for item in reader {
            service.import_item(&item?)?;
        }
        service.stats()
    };
    tx.commit()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_db_in_memory;
    use crate::import::source::{RawOriginalLanguage, RawPosGroup, RawSense};

    fn item(id: WordId, word: &str, hanja: &str, category: &str) -> RawItem {
        RawItem {
            target_code: id,
            word: word.to_string(),
            word_unit: "단어".to_string(),
            word_type: Some("한자어".to_string()),
            original_languages: vec![RawOriginalLanguage {
                text: hanja.to_string(),
                language_type: Some("한자".to_string()),
            }],
            pos_groups: vec![RawPosGroup {
                pos: Some("명사".to_string()),
                senses: vec![RawSense {
                    sense_code: id * 10,
                    definition: "뜻".to_string(),
                    definition_original: "뜻".to_string(),
                    categories: vec![category.to_string()],
                }],
            }],
        }
    }

    #[test]
    fn import_item_reports_outcome_and_reuses_existing_hanja() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteDictionaryRepository::new(&conn);
        let mut service =
            ImportService::new(repo, RecordTransformer::new(ExceptionTable::builtin().unwrap()));
        service.seed_categories().unwrap();

        let first = service.import_item(&item(1, "학교", "學校", "교육")).unwrap();
        let second = service.import_item(&item(2, "학생", "學生", "없음")).unwrap();
        let dropped = service.import_item(&item(62206, "가", "假", "교육")).unwrap();

        assert_eq!(first, ItemOutcome::Imported(1));
        assert_eq!(second, ItemOutcome::Imported(2));
        assert_eq!(dropped, ItemOutcome::Dropped(62206));

        let stats = service.stats();
        assert_eq!(stats.items, 3);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.hanja_usages, 4);
        assert_eq!(stats.new_hanja, 3);
        assert_eq!(service.repository().count_words().unwrap(), 2);
    }

    #[test]
    fn unknown_category_is_fatal_for_the_item() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteDictionaryRepository::new(&conn);
        let mut service =
            ImportService::new(repo, RecordTransformer::new(ExceptionTable::builtin().unwrap()));
        service.seed_categories().unwrap();

        let err = service
            .import_item(&item(3, "별", "星", "우주 항공"))
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnknownCategory { sense_id: 30, .. }
        ));
    }
}
