use serde::{Deserialize, Serialize};

use crate::phonetics::sifa::SifaResult;

/// Output of the phonetic pipeline for one verse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneticOutput {
    pub phonemes: String,
    /// One entry per phoneme chunk.
    pub sifat: Vec<SifaResult>,
    /// For each char of `phonemes`, the index of the Uthmani char it came
    /// from, or `None` for inserted text.
    pub char_map: Vec<Option<usize>>,
}

/// A word offset expressed in both scripts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuranWordIndex {
    pub imlaey: usize,
    pub uthmani: usize,
}

/// A verse-relative word position. End positions are exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpanPoint {
    pub sura: usize,
    pub aya: usize,
    pub word: QuranWordIndex,
}

impl SpanPoint {
    pub fn new(sura: usize, aya: usize, imlaey: usize, uthmani: usize) -> Self {
        Self {
            sura,
            aya,
            word: QuranWordIndex { imlaey, uthmani },
        }
    }
}

/// A half-open range of Imlaey word indices. `end: None` runs to the end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WordSpan {
    pub start: usize,
    pub end: Option<usize>,
}

impl WordSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn starting_at(start: usize) -> Self {
        Self { start, end: None }
    }
}

/// Which fixed formulas surround the verse words.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FormulaFlags {
    /// Seeking refuge, before the first verse of a sura.
    pub istiaatha: bool,
    /// Before the first verse of every sura except 1 and 9.
    pub bismillah: bool,
    /// After the last verse of a sura.
    pub sadaka: bool,
}

impl FormulaFlags {
    pub fn all() -> Self {
        Self {
            istiaatha: true,
            bismillah: true,
            sadaka: true,
        }
    }
}

/// A window of recitation in both scripts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SegmentScripts {
    pub imalaey: String,
    pub uthmani: String,
    /// First verse word in the window. `None` when no verse word is in it.
    pub start_span: Option<SpanPoint>,
    /// One past the last verse word in the window.
    pub end_span: Option<SpanPoint>,
    pub has_quran: bool,
    pub has_istiaatha: bool,
    pub has_bismillah: bool,
    pub has_sadaka: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_span_constructors() {
        assert_eq!(WordSpan::new(1, 3).end, Some(3));
        assert_eq!(WordSpan::starting_at(2).end, None);
    }

    #[test]
    fn test_segment_serde_roundtrip() {
        let seg = SegmentScripts {
            imalaey: "مَلِكِ النَّاسِ".into(),
            uthmani: "مَلِكِ ٱلنَّاسِ".into(),
            start_span: Some(SpanPoint::new(114, 2, 0, 0)),
            end_span: Some(SpanPoint::new(114, 2, 2, 2)),
            has_quran: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&seg).unwrap();
        let back: SegmentScripts = serde_json::from_str(&json).unwrap();
        assert_eq!(seg, back);
    }

    #[test]
    fn test_formula_flags_default_off() {
        let flags = FormulaFlags::default();
        assert!(!flags.istiaatha && !flags.bismillah && !flags.sadaka);
        assert!(FormulaFlags::all().sadaka);
    }
}
