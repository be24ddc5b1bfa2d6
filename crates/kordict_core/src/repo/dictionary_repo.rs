//! Dictionary repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create, get-or-create and filter-by-foreign-key access to the
//!   dictionary tables.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths re-run entity validation before SQL mutations.
//! - Read paths reject undecodable persisted state instead of masking it.
//! - No update or delete operations are exposed.

use crate::db::DbError;
use crate::model::category::KoreanWordCategory;
use crate::model::hanja::{Hanja, HanjaUsage};
use crate::model::sense::{KoreanWordSense, PartOfSpeech, SenseId};
use crate::model::validation::ValidationError;
use crate::model::word::{KoreanWord, WordId, WordType, WordUnit};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const WORD_SELECT_SQL: &str = "SELECT
    id,
    word,
    unit,
    word_type,
    hanja
FROM korean_words";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for dictionary persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::InvalidData(message) => write!(f, "invalid persisted dictionary data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the importer and by read-only front ends.
pub trait DictionaryRepository {
    fn create_category(&self, category: &KoreanWordCategory) -> RepoResult<()>;
    fn get_category(&self, label: &str) -> RepoResult<Option<KoreanWordCategory>>;
    fn list_categories(&self) -> RepoResult<Vec<KoreanWordCategory>>;

    fn create_word(&self, word: &KoreanWord) -> RepoResult<WordId>;
    fn get_word(&self, id: WordId) -> RepoResult<Option<KoreanWord>>;
    fn count_words(&self) -> RepoResult<u64>;

    /// Returns the stored character and whether this call inserted it.
    fn get_or_create_hanja(&self, letter: char) -> RepoResult<(Hanja, bool)>;
    fn create_hanja_usage(&self, usage: &HanjaUsage) -> RepoResult<()>;
    fn list_hanja_for_word(&self, word_id: WordId) -> RepoResult<Vec<Hanja>>;
    fn list_words_for_hanja(&self, letter: char) -> RepoResult<Vec<KoreanWord>>;

    /// Inserts the sense row and its category links.
    fn create_sense(&self, sense: &KoreanWordSense) -> RepoResult<SenseId>;
    fn list_senses_for_word(&self, word_id: WordId) -> RepoResult<Vec<KoreanWordSense>>;
}

/// SQLite-backed dictionary repository.
///
/// Borrowing a `Connection` lets callers pass a `Transaction` so a whole
/// import commits or rolls back as one unit.
pub struct SqliteDictionaryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDictionaryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DictionaryRepository for SqliteDictionaryRepository<'_> {
    fn create_category(&self, category: &KoreanWordCategory) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO korean_word_categories (category) VALUES (?1);",
            [category.category.as_str()],
        )?;
        Ok(())
    }

    fn get_category(&self, label: &str) -> RepoResult<Option<KoreanWordCategory>> {
        let category = self
            .conn
            .query_row(
                "SELECT category FROM korean_word_categories WHERE category = ?1;",
                [label],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(category.map(KoreanWordCategory::new))
    }

    fn list_categories(&self) -> RepoResult<Vec<KoreanWordCategory>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category FROM korean_word_categories ORDER BY category ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(KoreanWordCategory::new(row?));
        }
        Ok(categories)
    }

    fn create_word(&self, word: &KoreanWord) -> RepoResult<WordId> {
        word.validate()?;

        self.conn.execute(
            "INSERT INTO korean_words (
                id,
                word,
                unit,
                word_type,
                hanja
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                word.id(),
                word.word(),
                word.unit().code(),
                word.word_type().code(),
                word.hanja(),
            ],
        )?;

        Ok(word.id())
    }

    fn get_word(&self, id: WordId) -> RepoResult<Option<KoreanWord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_word_row(row)?));
        }
        Ok(None)
    }

    fn count_words(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM korean_words;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative word count `{count}`")))
    }

    fn get_or_create_hanja(&self, letter: char) -> RepoResult<(Hanja, bool)> {
        let hanja = Hanja::new(letter)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO hanja (letter) VALUES (?1);",
            [letter.to_string()],
        )?;
        Ok((hanja, inserted > 0))
    }

    fn create_hanja_usage(&self, usage: &HanjaUsage) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO hanja_usages (hanja, word_id) VALUES (?1, ?2);",
            params![usage.hanja.letter().to_string(), usage.word_id],
        )?;
        Ok(())
    }

    fn list_hanja_for_word(&self, word_id: WordId) -> RepoResult<Vec<Hanja>> {
        let mut stmt = self.conn.prepare(
            "SELECT hanja
             FROM hanja_usages
             WHERE word_id = ?1
             ORDER BY hanja ASC;",
        )?;
        let rows = stmt.query_map([word_id], |row| row.get::<_, String>(0))?;
        let mut letters = Vec::new();
        for row in rows {
            let text = row?;
            letters.push(Hanja::parse(&text).map_err(|_| {
                RepoError::InvalidData(format!("invalid letter `{text}` in hanja_usages.hanja"))
            })?);
        }
        Ok(letters)
    }

    fn list_words_for_hanja(&self, letter: char) -> RepoResult<Vec<KoreanWord>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                w.id AS id,
                w.word AS word,
                w.unit AS unit,
                w.word_type AS word_type,
                w.hanja AS hanja
             FROM korean_words w
             INNER JOIN hanja_usages u ON u.word_id = w.id
             WHERE u.hanja = ?1
             ORDER BY w.id ASC;",
        )?;
        let mut rows = stmt.query([letter.to_string()])?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            words.push(parse_word_row(row)?);
        }
        Ok(words)
    }

    fn create_sense(&self, sense: &KoreanWordSense) -> RepoResult<SenseId> {
        self.conn.execute(
            "INSERT INTO korean_word_senses (
                id,
                word_id,
                pos,
                definition,
                definition_original
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                sense.id,
                sense.word_id,
                sense.pos.code(),
                sense.definition.as_str(),
                sense.definition_original.as_str(),
            ],
        )?;

        let mut link = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO korean_word_sense_categories (sense_id, category)
             VALUES (?1, ?2);",
        )?;
        for category in &sense.categories {
            link.execute(params![sense.id, category.as_str()])?;
        }

        Ok(sense.id)
    }

    fn list_senses_for_word(&self, word_id: WordId) -> RepoResult<Vec<KoreanWordSense>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                word_id,
                pos,
                definition,
                definition_original
             FROM korean_word_senses
             WHERE word_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([word_id])?;
        let mut senses = Vec::new();
        while let Some(row) = rows.next()? {
            let pos_code: i64 = row.get("pos")?;
            let pos = PartOfSpeech::from_code(pos_code).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid pos code `{pos_code}` in korean_word_senses.pos"
                ))
            })?;
            let id: SenseId = row.get("id")?;
            senses.push(KoreanWordSense {
                id,
                word_id: row.get("word_id")?,
                pos,
                categories: load_categories_for_sense(self.conn, id)?,
                definition: row.get("definition")?,
                definition_original: row.get("definition_original")?,
            });
        }
        Ok(senses)
    }
}

fn load_categories_for_sense(conn: &Connection, sense_id: SenseId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT category
         FROM korean_word_sense_categories
         WHERE sense_id = ?1
         ORDER BY category ASC;",
    )?;
    let rows = stmt.query_map([sense_id], |row| row.get::<_, String>(0))?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

fn parse_word_row(row: &Row<'_>) -> RepoResult<KoreanWord> {
    let unit_code: i64 = row.get("unit")?;
    let unit = WordUnit::from_code(unit_code).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid unit code `{unit_code}` in korean_words.unit"))
    })?;

    let type_code: i64 = row.get("word_type")?;
    let word_type = WordType::from_code(type_code).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid word type code `{type_code}` in korean_words.word_type"
        ))
    })?;

    let word = KoreanWord::new(
        row.get("id")?,
        row.get::<_, String>("word")?,
        unit,
        word_type,
        row.get::<_, String>("hanja")?,
    )?;
    Ok(word)
}
