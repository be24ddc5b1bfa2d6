//! Field-level validators shared by dictionary entities.
//!
//! # Responsibility
//! - Reject word text outside the Hangul repertoire.
//! - Reject hanja text outside the Hanja repertoire or not in NFC.
//!
//! # Invariants
//! - Validators never modify their input; they only report the offending value.

use crate::charset::{is_hangul, is_hanja};
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_normalization::is_nfc;

/// Non-Hangul characters permitted inside a word field.
pub const HANGUL_FIELD_EXTRAS: &[char] = &[' ', 'ㆍ'];
/// Separator between alternate hanja spellings.
pub const HANJA_ALTERNATE_SEPARATOR: char = '/';
/// Placeholder for a glyph that has no hanja form in the source.
pub const HANJA_PLACEHOLDER: char = '▽';
/// Non-Hanja characters permitted inside a hanja field.
pub const HANJA_FIELD_EXTRAS: &[char] = &[HANJA_ALTERNATE_SEPARATOR, HANJA_PLACEHOLDER];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    InvalidCharacter,
    NotNormalized,
    NotSingleCharacter,
}

/// Validation failure raised at entity-construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Column the value was destined for, e.g. `word` or `hanja`.
    pub field: &'static str,
    pub value: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, field: &'static str, value: &str) -> Self {
        Self {
            kind,
            field,
            value: value.to_string(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ValidationErrorKind::InvalidCharacter => write!(
                f,
                "{} `{}` contains invalid character(s)",
                self.field, self.value
            ),
            ValidationErrorKind::NotNormalized => write!(
                f,
                "{} `{}` contains non-normalized character(s)",
                self.field, self.value
            ),
            ValidationErrorKind::NotSingleCharacter => write!(
                f,
                "{} `{}` must be exactly one character",
                self.field, self.value
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks that every character is Hangul, a space or `ㆍ`.
pub fn validate_hangul_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| is_hangul(c) || HANGUL_FIELD_EXTRAS.contains(&c))
    {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::InvalidCharacter,
            field,
            value,
        ))
    }
}

/// Checks that every character is Hanja, `/` or `▽`, and that the text is NFC.
pub fn validate_hanja_field(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value
        .chars()
        .all(|c| is_hanja(c) || HANJA_FIELD_EXTRAS.contains(&c))
    {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidCharacter,
            field,
            value,
        ));
    }
    if !is_nfc(value) {
        return Err(ValidationError::new(
            ValidationErrorKind::NotNormalized,
            field,
            value,
        ));
    }
    Ok(())
}
