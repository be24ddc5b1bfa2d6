//! Dictionary headword model.
//!
//! # Responsibility
//! - Define `KoreanWord` and its closed classification enums.
//! - Map source labels and storage codes to enum variants.
//!
//! # Invariants
//! - `word` holds only Hangul, spaces and `ㆍ`.
//! - `hanja` holds only Hanja, `/` and `▽`, in NFC.
//! - A constructed `KoreanWord` is never mutated.

use crate::model::validation::{validate_hangul_field, validate_hanja_field, ValidationError};
use serde::{Deserialize, Serialize};

/// Source-supplied headword identifier (`target_code`).
pub type WordId = i64;

/// Granularity of a headword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordUnit {
    /// 관용구
    PhraseIdiom,
    /// 구
    Phrase,
    /// 단어
    SingleWord,
    /// 속담
    Proverb,
}

impl WordUnit {
    pub const ALL: [WordUnit; 4] = [
        Self::PhraseIdiom,
        Self::Phrase,
        Self::SingleWord,
        Self::Proverb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PhraseIdiom => "관용구",
            Self::Phrase => "구",
            Self::SingleWord => "단어",
            Self::Proverb => "속담",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.label() == label)
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::PhraseIdiom => 0,
            Self::Phrase => 1,
            Self::SingleWord => 2,
            Self::Proverb => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.code() == code)
    }
}

/// Etymological origin of a headword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordType {
    /// No origin recorded in the source.
    None,
    /// 고유어
    Native,
    /// 외래어
    Loanword,
    /// 한자어
    HanjaDerived,
    /// 혼종어
    MixedOrigin,
}

impl WordType {
    pub const ALL: [WordType; 5] = [
        Self::None,
        Self::Native,
        Self::Loanword,
        Self::HanjaDerived,
        Self::MixedOrigin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "-",
            Self::Native => "고유어",
            Self::Loanword => "외래어",
            Self::HanjaDerived => "한자어",
            Self::MixedOrigin => "혼종어",
        }
    }

    /// Resolves an optional source label; absent or unknown labels become `None`.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|label| Self::ALL.into_iter().find(|kind| kind.label() == label))
            .unwrap_or(Self::None)
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::None => -1,
            Self::Native => 0,
            Self::Loanword => 1,
            Self::HanjaDerived => 2,
            Self::MixedOrigin => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// One validated dictionary headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KoreanWord {
    id: WordId,
    word: String,
    unit: WordUnit,
    word_type: WordType,
    hanja: String,
}

impl KoreanWord {
    /// Builds a headword, validating `word` and `hanja`.
    ///
    /// # Errors
    /// - `InvalidCharacter` when either field leaves its repertoire.
    /// - `NotNormalized` when `hanja` is not NFC.
    pub fn new(
        id: WordId,
        word: impl Into<String>,
        unit: WordUnit,
        word_type: WordType,
        hanja: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let word = Self {
            id,
            word: word.into(),
            unit,
            word_type,
            hanja: hanja.into(),
        };
        word.validate()?;
        Ok(word)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_hangul_field("word", &self.word)?;
        validate_hanja_field("hanja", &self.hanja)
    }

    pub fn id(&self) -> WordId {
        self.id
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn unit(&self) -> WordUnit {
        self.unit
    }

    pub fn word_type(&self) -> WordType {
        self.word_type
    }

    /// Hanja spelling; `/` separates alternates and may be empty.
    pub fn hanja(&self) -> &str {
        &self.hanja
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::validation::ValidationErrorKind;

    #[test]
    fn labels_resolve_to_variants() {
        assert_eq!(WordUnit::from_label("단어"), Some(WordUnit::SingleWord));
        assert_eq!(WordUnit::from_label("관용구"), Some(WordUnit::PhraseIdiom));
        assert_eq!(WordUnit::from_label("문장"), None);

        assert_eq!(WordType::from_label(Some("한자어")), WordType::HanjaDerived);
        assert_eq!(WordType::from_label(Some("혼종어")), WordType::MixedOrigin);
        assert_eq!(WordType::from_label(Some("기타")), WordType::None);
        assert_eq!(WordType::from_label(None), WordType::None);
    }

    #[test]
    fn codes_roundtrip() {
        for unit in WordUnit::ALL {
            assert_eq!(WordUnit::from_code(unit.code()), Some(unit));
        }
        for kind in WordType::ALL {
            assert_eq!(WordType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(WordType::None.code(), -1);
        assert_eq!(WordType::from_code(7), None);
    }

    #[test]
    fn new_rejects_unclean_word_text() {
        let err = KoreanWord::new(1, "권-업", WordUnit::SingleWord, WordType::None, "")
            .unwrap_err();
        assert_eq!(err.field, "word");
        assert_eq!(err.kind, ValidationErrorKind::InvalidCharacter);
    }

    #[test]
    fn new_accepts_cleaned_hanja_and_keeps_it_normalized() {
        let word = KoreanWord::new(
            518534,
            "경주 감은사지 동서 삼층 석탑",
            WordUnit::SingleWord,
            WordType::HanjaDerived,
            "慶州感恩寺址東西三層石塔",
        )
        .unwrap();
        let renormalized: String =
            unicode_normalization::UnicodeNormalization::nfc(word.hanja()).collect();
        assert_eq!(renormalized, word.hanja());
    }
}
