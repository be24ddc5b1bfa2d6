//! Word sense model.
//!
//! # Invariants
//! - `definition_original` is empty when it equals `definition`, otherwise it
//!   holds either the verbatim source text or a condensed `w<id>`/`s<id>` run.

use crate::model::word::WordId;
use serde::Serialize;

/// Source-supplied sense identifier (`sense_code`).
pub type SenseId = i64;

/// Part of speech attached to a sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    None,
    Interjection,
    Determiner,
    Phrase,
    Pronoun,
    Verb,
    Noun,
    AuxiliaryVerb,
    AuxiliaryAdjective,
    Adverb,
    Numeral,
    Ending,
    DependentNoun,
    Affix,
    Particle,
    Adjective,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 16] = [
        Self::None,
        Self::Interjection,
        Self::Determiner,
        Self::Phrase,
        Self::Pronoun,
        Self::Verb,
        Self::Noun,
        Self::AuxiliaryVerb,
        Self::AuxiliaryAdjective,
        Self::Adverb,
        Self::Numeral,
        Self::Ending,
        Self::DependentNoun,
        Self::Affix,
        Self::Particle,
        Self::Adjective,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "품사 없음",
            Self::Interjection => "감탄사",
            Self::Determiner => "관형사",
            Self::Phrase => "구",
            Self::Pronoun => "대명사",
            Self::Verb => "동사",
            Self::Noun => "명사",
            Self::AuxiliaryVerb => "보조 동사",
            Self::AuxiliaryAdjective => "보조 형용사",
            Self::Adverb => "부사",
            Self::Numeral => "수사",
            Self::Ending => "어미",
            Self::DependentNoun => "의존 명사",
            Self::Affix => "접사",
            Self::Particle => "조사",
            Self::Adjective => "형용사",
        }
    }

    /// Resolves a source label; absent or unknown labels become `None`.
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|label| Self::ALL.into_iter().find(|pos| pos.label() == label))
            .unwrap_or(Self::None)
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::None => -1,
            Self::Interjection => 0,
            Self::Determiner => 1,
            Self::Phrase => 2,
            Self::Pronoun => 3,
            Self::Verb => 4,
            Self::Noun => 5,
            Self::AuxiliaryVerb => 6,
            Self::AuxiliaryAdjective => 7,
            Self::Adverb => 8,
            Self::Numeral => 9,
            Self::Ending => 10,
            Self::DependentNoun => 11,
            Self::Affix => 12,
            Self::Particle => 13,
            Self::Adjective => 14,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|pos| pos.code() == code)
    }
}

/// One meaning of a headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KoreanWordSense {
    pub id: SenseId,
    pub word_id: WordId,
    pub pos: PartOfSpeech,
    /// Category labels; each must exist in `korean_word_categories`.
    pub categories: Vec<String>,
    pub definition: String,
    pub definition_original: String,
}
