//! Subject-domain categories attached to senses.
//!
//! # Invariants
//! - The category set is closed; rows are seeded once and never modified.
//! - `NO_CATEGORY_LABEL` is a source sentinel and never stored.

use serde::Serialize;

/// Source label meaning "no category"; skipped during import.
pub const NO_CATEGORY_LABEL: &str = "없음";

/// Every category label the dictionary uses, in seeding order.
pub const CATEGORY_LABELS: [&str; 67] = [
    "가톨릭",
    "건설",
    "경영",
    "경제",
    "고유명 일반",
    "공업",
    "공예",
    "공학 일반",
    "광업",
    "교육",
    "교통",
    "군사",
    "기계",
    "기독교",
    "농업",
    "동물",
    "매체",
    "무용",
    "문학",
    "물리",
    "미술",
    "민속",
    "법률",
    "보건 일반",
    "복식",
    "복지",
    "불교",
    "사회 일반",
    "산업 일반",
    "생명",
    "서비스업",
    "수산업",
    "수의",
    "수학",
    "식물",
    "식품",
    "심리",
    "약학",
    "언어",
    "역사",
    "연기",
    "영상",
    "예체능 일반",
    "음악",
    "의학",
    "인명",
    "인문 일반",
    "임업",
    "자연 일반",
    "재료",
    "전기·전자",
    "정보·통신",
    "정치",
    "종교 일반",
    "지구",
    "지리",
    "지명",
    "책명",
    "천문",
    "천연자원",
    "철학",
    "체육",
    "한의",
    "해양",
    "행정",
    "화학",
    "환경",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct KoreanWordCategory {
    pub category: String,
}

impl KoreanWordCategory {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CATEGORY_LABELS, NO_CATEGORY_LABEL};
    use std::collections::BTreeSet;

    #[test]
    fn labels_are_unique_and_exclude_sentinel() {
        let unique: BTreeSet<&str> = CATEGORY_LABELS.iter().copied().collect();
        assert_eq!(unique.len(), CATEGORY_LABELS.len());
        assert!(!unique.contains(NO_CATEGORY_LABEL));
    }
}
