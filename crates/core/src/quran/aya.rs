//! The verse cursor: one `(sura, aya)` position in a loaded store plus a
//! word offset used by the windowing functions.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::quran::rasm::{self, WORD_SEPARATOR};
use crate::quran::store::{QuranStore, Verse};
use crate::types::{FormulaFlags, WordSpan};

/// Everything known about one verse, detached from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AyaFormat {
    pub sura_idx: usize,
    pub aya_idx: usize,
    pub sura_name: String,
    pub num_ayat_in_sura: usize,
    pub uthmani: String,
    pub imlaey: String,
    pub istiaatha_uthmani: String,
    pub istiaatha_imlaey: String,
    pub bismillah_uthmani: Option<String>,
    pub bismillah_imlaey: Option<String>,
}

/// What an Imlaey word of a [`VerseUnit`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Part {
    Istiaatha,
    Bismillah,
    Verse,
    Sadaka,
}

/// A verse with the requested formulas attached, aligned word by word.
#[derive(Debug, Clone)]
pub(crate) struct VerseUnit<'a> {
    pub imlaey: Vec<&'a str>,
    pub uthmani: Vec<&'a str>,
    pub parts: Vec<Part>,
    pub map: Vec<usize>,
}

impl VerseUnit<'_> {
    pub fn len(&self) -> usize {
        self.imlaey.len()
    }

    /// Imlaey indices of the verse words proper.
    pub fn verse_range(&self) -> Range<usize> {
        let start = self.parts.iter().position(|p| *p == Part::Verse).unwrap_or(0);
        let end = self.parts.iter().rposition(|p| *p == Part::Verse).map_or(start, |i| i + 1);
        start..end
    }
}

#[derive(Clone, Copy)]
pub struct Aya<'a> {
    store: &'a QuranStore,
    alphabet: &'a Alphabet,
    sura_idx: usize,
    aya_idx: usize,
    start_imlaey_word_idx: usize,
    formulas: FormulaFlags,
}

impl<'a> Aya<'a> {
    /// A cursor at `(sura, aya)`, both 1-based.
    pub fn new(store: &'a QuranStore, alphabet: &'a Alphabet, sura: usize, aya: usize) -> Result<Self> {
        store.verse(sura, aya)?;
        Ok(Self {
            store,
            alphabet,
            sura_idx: sura,
            aya_idx: aya,
            start_imlaey_word_idx: 0,
            formulas: FormulaFlags::default(),
        })
    }

    /// Formulas the by-words functions treat as part of the text.
    pub fn with_formulas(mut self, formulas: FormulaFlags) -> Self {
        self.formulas = formulas;
        self
    }

    pub(crate) fn with_start_word(mut self, word: usize) -> Self {
        self.start_imlaey_word_idx = word;
        self
    }

    pub fn sura_idx(&self) -> usize {
        self.sura_idx
    }

    pub fn aya_idx(&self) -> usize {
        self.aya_idx
    }

    pub fn start_imlaey_word_idx(&self) -> usize {
        self.start_imlaey_word_idx
    }

    pub fn formulas(&self) -> FormulaFlags {
        self.formulas
    }

    pub fn store(&self) -> &'a QuranStore {
        self.store
    }

    pub fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    fn verse(&self) -> Result<&'a Verse> {
        self.store.verse(self.sura_idx, self.aya_idx)
    }

    pub fn get(&self) -> Result<AyaFormat> {
        let verse = self.verse()?;
        Ok(AyaFormat {
            sura_idx: self.sura_idx,
            aya_idx: self.aya_idx,
            sura_name: self.store.sura_name(self.sura_idx)?.to_string(),
            num_ayat_in_sura: self.store.num_ayat(self.sura_idx)?,
            uthmani: verse.uthmani.clone(),
            imlaey: verse.imlaey.clone(),
            istiaatha_uthmani: self.alphabet.istiaatha.uthmani.clone(),
            istiaatha_imlaey: self.alphabet.istiaatha.imlaey.clone(),
            bismillah_uthmani: verse.bismillah_uthmani.clone(),
            bismillah_imlaey: verse.bismillah_imlaey.clone(),
        })
    }

    /// A new cursor at `(sura, aya)` over the same store.
    pub fn set_new(&self, sura: usize, aya: usize) -> Result<Self> {
        Ok(Self::new(self.store, self.alphabet, sura, aya)?.with_formulas(self.formulas))
    }

    /// The verse `step_len` verses away, wrapping between the last and the
    /// first verse of the canon.
    pub fn step(&self, step_len: i64) -> Self {
        let total = self.store.total_verses() as i64;
        let ordinal = self.store.ordinal(self.sura_idx, self.aya_idx) as i64;
        let (sura, aya) = self.store.locate((ordinal + step_len).rem_euclid(total) as usize);
        Self {
            sura_idx: sura,
            aya_idx: aya,
            start_imlaey_word_idx: 0,
            ..*self
        }
    }

    /// Cursors from this verse on: `num_ayat` of them (wrapping), or up to
    /// the last verse of the canon.
    pub fn ayat_after(&self, num_ayat: Option<usize>) -> impl Iterator<Item = Aya<'a>> + 'a {
        let first = self.with_start_word(0);
        let count = num_ayat.unwrap_or_else(|| {
            self.store.total_verses() - self.store.ordinal(self.sura_idx, self.aya_idx)
        });
        std::iter::successors(Some(first), |aya| Some(aya.step(1))).take(count)
    }

    pub(crate) fn unit(&self, formulas: FormulaFlags) -> Result<VerseUnit<'a>> {
        let verse = self.verse()?;
        let num_ayat = self.store.num_ayat(self.sura_idx)?;
        let alphabet = self.alphabet;

        let mut pieces: Vec<(Part, &'a str, &'a str)> = Vec::with_capacity(4);
        if self.aya_idx == 1 && formulas.istiaatha {
            pieces.push((
                Part::Istiaatha,
                alphabet.istiaatha.imlaey.as_str(),
                alphabet.istiaatha.uthmani.as_str(),
            ));
        }
        if let (true, true, Some(imlaey), Some(uthmani)) = (
            self.aya_idx == 1,
            formulas.bismillah,
            verse.bismillah_imlaey.as_deref(),
            verse.bismillah_uthmani.as_deref(),
        ) {
            pieces.push((Part::Bismillah, imlaey, uthmani));
        }
        pieces.push((Part::Verse, verse.imlaey.as_str(), verse.uthmani.as_str()));
        if self.aya_idx == num_ayat && formulas.sadaka {
            pieces.push((
                Part::Sadaka,
                alphabet.sadaka.imlaey.as_str(),
                alphabet.sadaka.uthmani.as_str(),
            ));
        }

        let mut imlaey = Vec::new();
        let mut uthmani = Vec::new();
        let mut parts = Vec::new();
        for (part, iml, uth) in pieces {
            for word in iml.split(WORD_SEPARATOR) {
                imlaey.push(word);
                parts.push(part);
            }
            uthmani.extend(uth.split(WORD_SEPARATOR));
        }
        let map = rasm::encode(&imlaey, &uthmani, &alphabet.unique_rasm)?;
        Ok(VerseUnit {
            imlaey,
            uthmani,
            parts,
            map,
        })
    }

    /// The Uthmani text of the Imlaey words in `span`, counted over the
    /// verse with the requested formulas attached.
    pub fn imlaey_to_uthmani(&self, span: WordSpan, formulas: FormulaFlags) -> Result<String> {
        let unit = self.unit(formulas)?;
        rasm::decode(&unit.map, &unit.uthmani, span)
    }
}

impl fmt::Debug for Aya<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aya")
            .field("sura_idx", &self.sura_idx)
            .field("aya_idx", &self.aya_idx)
            .field("start_imlaey_word_idx", &self.start_imlaey_word_idx)
            .field("formulas", &self.formulas)
            .finish()
    }
}

impl fmt::Display for Aya<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sura_idx, self.aya_idx)
    }
}

impl PartialEq for Aya<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store)
            && self.sura_idx == other.sura_idx
            && self.aya_idx == other.aya_idx
            && self.start_imlaey_word_idx == other.start_imlaey_word_idx
            && self.formulas == other.formulas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::error::QuranError;
    use crate::quran::fixture;

    #[test]
    fn test_get_fields() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let aya = Aya::new(&store, alph, 112, 1).unwrap();
        let fmt = aya.get().unwrap();
        assert_eq!(fmt.sura_name, "الإخلاص");
        assert_eq!(fmt.num_ayat_in_sura, 4);
        assert_eq!(fmt.imlaey, "قُلْ هُوَ اللَّهُ أَحَدٌ");
        assert_eq!(fmt.bismillah_imlaey.as_deref(), Some(fixture::BISMILLAH.1));
        assert_eq!(fmt.istiaatha_imlaey, alph.istiaatha.imlaey);

        let fatiha = aya.set_new(1, 1).unwrap().get().unwrap();
        assert!(fatiha.bismillah_uthmani.is_none());
    }

    #[test]
    fn test_new_checks_indices() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        assert!(matches!(
            Aya::new(&store, alph, 1, 8),
            Err(QuranError::IndexOutOfRange { sura: 1, aya: 8, num_ayat: 7 })
        ));
        assert!(Aya::new(&store, alph, 115, 1).is_err());
    }

    #[test]
    fn test_step_wraps() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let aya = Aya::new(&store, alph, 1, 7).unwrap();
        assert_eq!(aya.step(1).to_string(), "2:1");
        assert_eq!(aya.step(-7).to_string(), "114:6");
        assert_eq!(aya.step(0), aya);
        let last = Aya::new(&store, alph, 114, 6).unwrap();
        assert_eq!(last.step(1).to_string(), "1:1");
        assert_eq!(last.step(6236), last);
    }

    #[test]
    fn test_ayat_after() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let aya = Aya::new(&store, alph, 113, 4).unwrap();
        let to_end: Vec<String> = aya.ayat_after(None).map(|a| a.to_string()).collect();
        assert_eq!(to_end.len(), 2 + 6);
        assert_eq!(to_end.last().map(String::as_str), Some("114:6"));

        let wrapped: Vec<String> = aya.ayat_after(Some(10)).map(|a| a.to_string()).collect();
        assert_eq!(wrapped[8], "1:1");
    }

    #[test]
    fn test_imlaey_to_uthmani_rasm_merge() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let aya = Aya::new(&store, alph, 72, 16).unwrap();
        let flags = FormulaFlags::default();
        assert_eq!(
            aya.imlaey_to_uthmani(WordSpan::new(0, 4), flags).unwrap(),
            "وَأَلَّوِ ٱسْتَقَـٰمُوا۟ عَلَى"
        );
        assert!(matches!(
            aya.imlaey_to_uthmani(WordSpan::new(0, 1), flags),
            Err(QuranError::PartOfUthmaniWord { .. })
        ));
    }

    #[test]
    fn test_imlaey_to_uthmani_full_verse() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        for (sura, aya) in [(1, 7), (113, 4), (114, 5), (2, 21)] {
            let cursor = Aya::new(&store, alph, sura, aya).unwrap();
            let text = cursor
                .imlaey_to_uthmani(WordSpan::starting_at(0), FormulaFlags::default())
                .unwrap();
            assert_eq!(text, store.verse(sura, aya).unwrap().uthmani);
        }
    }

    #[test]
    fn test_imlaey_to_uthmani_with_formulas() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let aya = Aya::new(&store, alph, 112, 1).unwrap();
        let text = aya
            .imlaey_to_uthmani(WordSpan::new(0, 5), FormulaFlags::all())
            .unwrap();
        assert_eq!(text, alph.istiaatha.uthmani);

        let bismillah = FormulaFlags {
            bismillah: true,
            ..Default::default()
        };
        let text = aya.imlaey_to_uthmani(WordSpan::new(3, 5), bismillah).unwrap();
        let expected = format!(
            "{} {}",
            fixture::BISMILLAH.0.rsplit(' ').next().unwrap(),
            store.verse(112, 1).unwrap().uthmani.split(' ').next().unwrap()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_alignment_over_canon() {
        let Ok(path) = std::env::var("QURAN_SCRIPT_PATH") else {
            return;
        };
        let store = QuranStore::from_path(std::path::Path::new(&path)).unwrap();
        let alph = alphabet::builtin().unwrap();
        for (sura, aya, verse) in store.iter() {
            let cursor = Aya::new(&store, alph, sura, aya).unwrap();
            let unit = cursor.unit(FormulaFlags::default()).unwrap();
            assert_eq!(unit.map.len(), verse.imlaey.split(' ').count(), "{sura}:{aya}");
            assert_eq!(unit.map.last().copied(), Some(unit.uthmani.len() - 1), "{sura}:{aya}");
            if unit.imlaey.len() == unit.uthmani.len() {
                let text = cursor
                    .imlaey_to_uthmani(WordSpan::starting_at(0), FormulaFlags::default())
                    .unwrap();
                assert_eq!(text, verse.uthmani, "{sura}:{aya}");
            }
        }
    }

    #[test]
    fn test_unit_parts() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let unit = Aya::new(&store, alph, 112, 4)
            .unwrap()
            .unit(FormulaFlags::all())
            .unwrap();
        assert_eq!(unit.verse_range(), 0..5);
        assert_eq!(unit.len(), 8);
        assert_eq!(unit.parts[7], Part::Sadaka);
    }
}
