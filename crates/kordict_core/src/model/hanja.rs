//! Hanja character and per-word usage models.

use crate::model::validation::{
    validate_hanja_field, ValidationError, ValidationErrorKind, HANJA_FIELD_EXTRAS,
};
use crate::model::word::WordId;
use serde::Serialize;
use std::collections::BTreeSet;

/// A single validated Hanja character, keyed by the character itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Hanja(char);

impl Hanja {
    pub fn new(letter: char) -> Result<Self, ValidationError> {
        let mut buf = [0u8; 4];
        let text = letter.encode_utf8(&mut buf);
        validate_hanja_field("letter", text)?;
        // `/` and `▽` are field separators, never standalone characters.
        if HANJA_FIELD_EXTRAS.contains(&letter) {
            return Err(ValidationError {
                kind: ValidationErrorKind::InvalidCharacter,
                field: "letter",
                value: text.to_string(),
            });
        }
        Ok(Self(letter))
    }

    /// Parses a stored single-character key.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::new(letter),
            _ => Err(ValidationError {
                kind: ValidationErrorKind::NotSingleCharacter,
                field: "letter",
                value: text.to_string(),
            }),
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

/// Records that a Hanja character appears in a word's hanja spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HanjaUsage {
    pub hanja: Hanja,
    pub word_id: WordId,
}

/// Distinct characters of a cleaned hanja field, without separators or placeholders.
pub fn usage_characters(hanja: &str) -> BTreeSet<char> {
    hanja
        .chars()
        .filter(|c| !HANJA_FIELD_EXTRAS.contains(c))
        .collect()
}
