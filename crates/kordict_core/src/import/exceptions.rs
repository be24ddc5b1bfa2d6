//! Per-record corrections for known-bad dictionary entries.
//!
//! # Responsibility
//! - Apply the default cleaning every record gets (word markers, hanja
//!   normalization).
//! - Apply the hand-audited correction registered for a record id, if any.
//! - Load the correction registry from a versioned JSON data file.
//!
//! # Invariants
//! - Unregistered ids pass through with only the default cleaning applied.
//! - Each id maps to at most one correction.
//! - `apply` is a pure function of its input; applying it twice equals once.
//! - An empty word after correction means the record must be dropped.

use crate::model::word::{WordId, WordType, WordUnit};
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Correction registry shipped with the crate.
const BUILTIN_FIXES_JSON: &str = include_str!("../../data/word_fixes.json");

/// Highest data file version this binary understands.
pub const SUPPORTED_FIXES_VERSION: u32 = 1;

const WORD_MARKER_CHARS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '-'];
const WORD_SPACE_MARKER: char = '^';
const HANJA_PLACEHOLDER_VARIANT: char = '\u{2207}';
const HANJA_PLACEHOLDER: char = '\u{25BD}';

/// Word fields derived from one source item, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDraft {
    pub id: WordId,
    pub word: String,
    pub unit: WordUnit,
    pub word_type: WordType,
    pub hanja: String,
}

impl WordDraft {
    /// `true` when corrections emptied the word, meaning "skip this record".
    pub fn is_rejected(&self) -> bool {
        self.word.is_empty()
    }
}

/// One hand-audited fix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Correction {
    /// Drop every space from the hanja spelling.
    StripHanjaSpaces,
    /// Remove `<EQU>`/`</EQU>` wrappers, keeping the glyph between them.
    UnwrapEquTags,
    /// Replace every occurrence of `from` in the hanja spelling with `to`.
    ReplaceInHanja { from: String, to: String },
    /// Replace the hanja spelling outright.
    SetHanja { hanja: String },
    /// Replace any of word text, word type and hanja spelling.
    Override {
        #[serde(default)]
        word: Option<String>,
        #[serde(default)]
        word_type: Option<WordType>,
        #[serde(default)]
        hanja: Option<String>,
    },
    /// Empty the word text so the record is dropped.
    Reject,
}

impl Correction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StripHanjaSpaces => "strip_hanja_spaces",
            Self::UnwrapEquTags => "unwrap_equ_tags",
            Self::ReplaceInHanja { .. } => "replace_in_hanja",
            Self::SetHanja { .. } => "set_hanja",
            Self::Override { .. } => "override",
            Self::Reject => "reject",
        }
    }

    pub fn apply(&self, draft: &mut WordDraft) {
        match self {
            Self::StripHanjaSpaces => draft.hanja = draft.hanja.replace(' ', ""),
            Self::UnwrapEquTags => {
                draft.hanja = draft.hanja.replace("<EQU>", "").replace("</EQU>", "");
            }
            Self::ReplaceInHanja { from, to } => draft.hanja = draft.hanja.replace(from, to),
            Self::SetHanja { hanja } => draft.hanja = hanja.clone(),
            Self::Override {
                word,
                word_type,
                hanja,
            } => {
                if let Some(word) = word {
                    draft.word = word.clone();
                }
                if let Some(word_type) = word_type {
                    draft.word_type = *word_type;
                }
                if let Some(hanja) = hanja {
                    draft.hanja = hanja.clone();
                }
            }
            Self::Reject => draft.word.clear(),
        }
    }
}

#[derive(Debug)]
pub enum ExceptionTableError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    DuplicateId(WordId),
}

impl Display for ExceptionTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read word fixes: {err}"),
            Self::Parse(err) => write!(f, "malformed word fixes: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "word fixes version {found} is newer than supported {supported}"
            ),
            Self::DuplicateId(id) => write!(f, "word fixes register id {id} more than once"),
        }
    }
}

impl Error for ExceptionTableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExceptionTableError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExceptionTableError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Deserialize)]
struct FixesHeader {
    version: u32,
}

#[derive(Deserialize)]
struct FixesFile {
    fixes: Vec<FixEntry>,
}

#[derive(Deserialize)]
struct FixEntry {
    ids: Vec<WordId>,
    correction: Correction,
}

/// Record id -> correction registry.
#[derive(Debug, Clone, Default)]
pub struct ExceptionTable {
    version: u32,
    corrections: HashMap<WordId, Correction>,
}

impl ExceptionTable {
    /// Loads the registry embedded in the crate.
    pub fn builtin() -> Result<Self, ExceptionTableError> {
        Self::from_json(BUILTIN_FIXES_JSON)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExceptionTableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ExceptionTableError> {
        let header: FixesHeader = serde_json::from_str(text)?;
        if header.version > SUPPORTED_FIXES_VERSION {
            return Err(ExceptionTableError::UnsupportedVersion {
                found: header.version,
                supported: SUPPORTED_FIXES_VERSION,
            });
        }

        let file: FixesFile = serde_json::from_str(text)?;
        let mut corrections = HashMap::new();
        for entry in file.fixes {
            for id in entry.ids {
                if corrections.insert(id, entry.correction.clone()).is_some() {
                    return Err(ExceptionTableError::DuplicateId(id));
                }
            }
        }

        Ok(Self {
            version: header.version,
            corrections,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    pub fn correction_for(&self, id: WordId) -> Option<&Correction> {
        self.corrections.get(&id)
    }

    /// Applies default cleaning, then the registered correction for `draft.id`.
    pub fn apply(&self, mut draft: WordDraft) -> WordDraft {
        draft.word = clean_word_text(&draft.word);
        draft.hanja = normalize_hanja_text(&draft.hanja);
        if let Some(correction) = self.correction_for(draft.id) {
            correction.apply(&mut draft);
        }
        draft
    }
}

/// Drops homograph digits and `-` morpheme markers; `^` becomes a space.
pub fn clean_word_text(word: &str) -> String {
    word.chars()
        .filter(|c| !WORD_MARKER_CHARS.contains(c))
        .map(|c| if c == WORD_SPACE_MARKER { ' ' } else { c })
        .collect()
}

/// NFC-normalizes and maps U+2207 to the U+25BD placeholder.
pub fn normalize_hanja_text(hanja: &str) -> String {
    hanja
        .nfc()
        .map(|c| {
            if c == HANJA_PLACEHOLDER_VARIANT {
                HANJA_PLACEHOLDER
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_word_text_strips_markers() {
        assert_eq!(clean_word_text("테스트^단어01"), "테스트 단어");
        assert_eq!(clean_word_text("권-업02"), "권업");
        assert_eq!(clean_word_text("경주^감은사지"), "경주 감은사지");
    }

    #[test]
    fn normalize_hanja_text_maps_placeholder_variant() {
        assert_eq!(normalize_hanja_text("水\u{2207}"), "水▽");
        assert_eq!(normalize_hanja_text("\u{F900}"), "\u{8C48}");
    }

    #[test]
    fn builtin_table_loads_every_registered_id() {
        let table = ExceptionTable::builtin().unwrap();
        assert_eq!(table.version(), 1);
        assert_eq!(table.len(), 221);
        assert_eq!(table.correction_for(99_999_999), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"version": 1, "fixes": [
            {"ids": [1], "correction": {"action": "reject"}},
            {"ids": [1], "correction": {"action": "strip_hanja_spaces"}}
        ]}"#;
        let err = ExceptionTable::from_json(json).unwrap_err();
        assert!(matches!(err, ExceptionTableError::DuplicateId(1)));
    }

    #[test]
    fn newer_versions_are_rejected_before_parsing_entries() {
        let json = r#"{"version": 2, "fixes": [{"ids": [1], "correction": {"action": "future"}}]}"#;
        let err = ExceptionTable::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ExceptionTableError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
    }

    #[test]
    fn unknown_actions_fail_to_parse() {
        let json = r#"{"version": 1, "fixes": [{"ids": [1], "correction": {"action": "rename"}}]}"#;
        assert!(matches!(
            ExceptionTable::from_json(json).unwrap_err(),
            ExceptionTableError::Parse(_)
        ));
    }
}
