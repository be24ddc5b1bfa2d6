//! Code point classification for Hangul and Hanja repertoires.
//!
//! # Responsibility
//! - Decide membership of a single `char` in the Hangul jamo/composite blocks.
//! - Decide membership in the CJK ideograph blocks across BMP, SIP and TIP.
//!
//! # Invariants
//! - All ranges are inclusive on both ends.
//! - Hangul and Hanja ranges never overlap.

type CodeRange = (u32, u32);

const HANGUL_JAMO: CodeRange = (0x3131, 0x3163);
const HANGUL_COMPOSITE: CodeRange = (0xAC00, 0xD7A3);

const HANJA_BMP: &[CodeRange] = &[
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFA6D),
    (0xFA70, 0xFAD9),
];

const HANJA_SIP: &[CodeRange] = &[
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2B739),
    (0x2B740, 0x2B81D),
    (0x2B820, 0x2CEA1),
    (0x2CEB0, 0x2EBE0),
    (0x2EBF0, 0x2EE5D),
    (0x2F800, 0x2FA1D),
];

const HANJA_TIP: &[CodeRange] = &[(0x30000, 0x3134A), (0x31350, 0x323AF)];

fn in_range(c: char, (start, end): CodeRange) -> bool {
    (start..=end).contains(&u32::from(c))
}

fn in_any(c: char, ranges: &[CodeRange]) -> bool {
    ranges.iter().any(|range| in_range(c, *range))
}

/// Compatibility jamo block (`ㄱ`..`ㅣ`).
pub fn is_hangul_jamo(c: char) -> bool {
    in_range(c, HANGUL_JAMO)
}

/// Precomposed syllable block (`가`..`힣`).
pub fn is_hangul_composite(c: char) -> bool {
    in_range(c, HANGUL_COMPOSITE)
}

pub fn is_hangul(c: char) -> bool {
    is_hangul_composite(c) || is_hangul_jamo(c)
}

/// CJK ideographs in the Basic Multilingual Plane, including compatibility ideographs.
pub fn is_bmp_hanja(c: char) -> bool {
    in_any(c, HANJA_BMP)
}

/// CJK ideographs in the Supplementary Ideographic Plane (extensions B-F, I).
pub fn is_sip_hanja(c: char) -> bool {
    in_any(c, HANJA_SIP)
}

/// CJK ideographs in the Tertiary Ideographic Plane (extensions G-H).
pub fn is_tip_hanja(c: char) -> bool {
    in_any(c, HANJA_TIP)
}

pub fn is_hanja(c: char) -> bool {
    is_bmp_hanja(c) || is_sip_hanja(c) || is_tip_hanja(c)
}
