//! Raw item -> validated entity transformation.
//!
//! # Responsibility
//! - Resolve source labels into closed enums.
//! - Assemble the hanja spelling from `original_language_info` blocks.
//! - Run the exception table, then build validated entities.
//! - Condense cross-references in `definition_original`.
//!
//! # Invariants
//! - Pure: no storage access; persisting is the caller's job.
//! - A rejected record yields `Dropped`, never a partial entity set.

use crate::import::exceptions::{Correction, ExceptionTable, WordDraft};
use crate::import::source::{RawItem, RawOriginalLanguage};
use crate::model::category::NO_CATEGORY_LABEL;
use crate::model::hanja::usage_characters;
use crate::model::sense::{KoreanWordSense, PartOfSpeech};
use crate::model::validation::{ValidationError, HANJA_ALTERNATE_SEPARATOR};
use crate::model::word::{KoreanWord, WordId, WordType, WordUnit};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<word_no>(\d+)</word_no>|<sense_no>(\d+)</sense_no>")
        .expect("valid reference regex")
});

/// `language_type` of a block carrying hanja text.
const LANGUAGE_TYPE_HANJA: &str = "한자";
/// `language_type` of a block separating two alternate spellings.
const LANGUAGE_TYPE_ALTERNATE: &str = "/(병기)";

// Mixed-origin has a nonzero code, so this operand of the collection gate is
// always true and every entry collects hanja. Entries without hanja blocks
// still end up with an empty spelling.
const MIXED_ORIGIN_GATE: bool = WordType::MixedOrigin.code() != 0;

#[derive(Debug)]
pub enum TransformError {
    UnknownWordUnit { id: WordId, label: String },
    Validation { id: WordId, source: ValidationError },
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWordUnit { id, label } => {
                write!(f, "word {id} has unknown word unit `{label}`")
            }
            Self::Validation { id, source } => write!(f, "word {id} failed validation: {source}"),
        }
    }
}

impl Error for TransformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownWordUnit { .. } => None,
            Self::Validation { source, .. } => Some(source),
        }
    }
}

/// Entities derived from one accepted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRecord {
    pub word: KoreanWord,
    /// Distinct hanja characters used by `word.hanja()`.
    pub hanja_letters: BTreeSet<char>,
    /// Senses in document order; category labels exclude the no-category sentinel.
    pub senses: Vec<KoreanWordSense>,
    /// Name of the correction applied, if the id is registered.
    pub correction: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Accepted(TransformedRecord),
    Dropped {
        id: WordId,
        correction: Option<&'static str>,
    },
}

pub struct RecordTransformer {
    exceptions: ExceptionTable,
}

impl RecordTransformer {
    pub fn new(exceptions: ExceptionTable) -> Self {
        Self { exceptions }
    }

    /// Converts one raw item.
    ///
    /// # Errors
    /// - `UnknownWordUnit` when the unit label is outside the closed set.
    /// - `Validation` when the corrected word or hanja is still invalid.
    pub fn transform(&self, item: &RawItem) -> Result<TransformOutcome, TransformError> {
        let id = item.target_code;
        let unit =
            WordUnit::from_label(&item.word_unit).ok_or_else(|| TransformError::UnknownWordUnit {
                id,
                label: item.word_unit.clone(),
            })?;
        let word_type = WordType::from_label(item.word_type.as_deref());

        let hanja = if collects_hanja(unit, word_type) {
            collect_hanja_spelling(&item.original_languages)
        } else {
            String::new()
        };

        let correction = self.exceptions.correction_for(id).map(Correction::name);
        let draft = self.exceptions.apply(WordDraft {
            id,
            word: item.word.clone(),
            unit,
            word_type,
            hanja,
        });
        if draft.is_rejected() {
            return Ok(TransformOutcome::Dropped { id, correction });
        }

        let word = KoreanWord::new(id, draft.word, draft.unit, draft.word_type, draft.hanja)
            .map_err(|source| TransformError::Validation { id, source })?;
        let hanja_letters = usage_characters(word.hanja());

        let mut senses = Vec::new();
        for group in &item.pos_groups {
            let pos = PartOfSpeech::from_label(group.pos.as_deref());
            for sense in &group.senses {
                senses.push(KoreanWordSense {
                    id: sense.sense_code,
                    word_id: id,
                    pos,
                    categories: sense
                        .categories
                        .iter()
                        .filter(|label| label.as_str() != NO_CATEGORY_LABEL)
                        .cloned()
                        .collect(),
                    definition: sense.definition.clone(),
                    definition_original: condense_definition_original(
                        id,
                        &sense.definition,
                        &sense.definition_original,
                    ),
                });
            }
        }

        Ok(TransformOutcome::Accepted(TransformedRecord {
            word,
            hanja_letters,
            senses,
            correction,
        }))
    }
}

/// Collection gate for hanja spellings; see `MIXED_ORIGIN_GATE`.
pub fn collects_hanja(unit: WordUnit, word_type: WordType) -> bool {
    (unit == WordUnit::SingleWord && word_type == WordType::HanjaDerived) || MIXED_ORIGIN_GATE
}

/// Concatenates hanja blocks; each `/(병기)` marker closes one alternate.
///
/// Empty alternates are skipped and the rest are joined with `/`.
pub fn collect_hanja_spelling(languages: &[RawOriginalLanguage]) -> String {
    let mut alternates = Vec::new();
    let mut current = String::new();
    for language in languages {
        match language.language_type.as_deref() {
            Some(LANGUAGE_TYPE_HANJA) => current.push_str(&language.text),
            Some(LANGUAGE_TYPE_ALTERNATE) => {
                if !current.is_empty() {
                    alternates.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        alternates.push(current);
    }

    let separator = HANJA_ALTERNATE_SEPARATOR.to_string();
    alternates.join(separator.as_str())
}

/// Condenses `<word_no>N</word_no>` / `<sense_no>N</sense_no>` references.
///
/// Returns an empty string when `original` equals `definition`, the
/// concatenated tokens when references are present, and `original`
/// unchanged otherwise.
///
/// The token prefix is chosen from the owning `word_id`, not from which
/// reference matched. Word ids are never zero, so every token is `w` followed
/// by the word reference, and a sense reference becomes a bare `w`.
pub fn condense_definition_original(word_id: WordId, definition: &str, original: &str) -> String {
    if original == definition {
        return String::new();
    }

    let mut condensed = String::new();
    let mut matched = false;
    for captures in REFERENCE_RE.captures_iter(original) {
        matched = true;
        let word_ref = captures.get(1).map_or("", |m| m.as_str());
        let sense_ref = captures.get(2).map_or("", |m| m.as_str());
        if word_id != 0 {
            condensed.push('w');
            condensed.push_str(word_ref);
        } else {
            condensed.push('s');
            condensed.push_str(sense_ref);
        }
    }

    if matched {
        condensed
    } else {
        original.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(language_type: &str, text: &str) -> RawOriginalLanguage {
        RawOriginalLanguage {
            text: text.to_string(),
            language_type: Some(language_type.to_string()),
        }
    }

    #[test]
    fn hanja_gate_passes_for_every_unit_and_type() {
        for unit in WordUnit::ALL {
            for word_type in WordType::ALL {
                assert!(collects_hanja(unit, word_type), "{unit:?} {word_type:?}");
            }
        }
    }

    #[test]
    fn spelling_concatenates_blocks_until_alternate_marker() {
        let languages = vec![
            block("한자", "阻"),
            block("한자", "擋"),
            block("/(병기)", ""),
            block("한자", "阻攩"),
        ];
        assert_eq!(collect_hanja_spelling(&languages), "阻擋/阻攩");
    }

    #[test]
    fn spelling_skips_empty_alternates_and_foreign_blocks() {
        let languages = vec![
            block("/(병기)", ""),
            block("영어", "tea"),
            block("한자", "茶"),
            block("/(병기)", ""),
            block("/(병기)", ""),
        ];
        assert_eq!(collect_hanja_spelling(&languages), "茶");
        assert_eq!(collect_hanja_spelling(&[]), "");
    }

    #[test]
    fn definition_original_equal_to_definition_is_emptied() {
        assert_eq!(condense_definition_original(7, "뜻", "뜻"), "");
    }

    #[test]
    fn definition_original_without_references_is_kept() {
        assert_eq!(
            condense_definition_original(7, "뜻", "<FL>뜻</FL>"),
            "<FL>뜻</FL>"
        );
    }

    #[test]
    fn word_references_condense_without_separators() {
        let original = "‘<word_no>123</word_no>’의 준말. ‘<word_no>45</word_no>’ 참고.";
        assert_eq!(condense_definition_original(7, "준말", original), "w123w45");
    }

    #[test]
    fn sense_references_follow_the_word_branch() {
        let original = "<sense_no>900</sense_no>과 <word_no>12</word_no>";
        assert_eq!(condense_definition_original(7, "x", original), "ww12");
        assert_eq!(condense_definition_original(0, "x", original), "s900s");
    }
}
