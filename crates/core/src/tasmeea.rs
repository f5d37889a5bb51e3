//! Tasmeea: match a recitation, given as consecutive text segments, against
//! a sura.
//!
//! For every segment a set of candidate windows around the cursor is scored
//! with a normalized Levenshtein ratio. The best acceptable window wins and
//! the cursor advances by its length before the next segment.

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::{QuranError, Result};
use crate::normalize::{normalize_aya, NormalizeOptions};
use crate::quran::{Aya, QuranStore};
use crate::types::{FormulaFlags, SegmentScripts};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasmeeaOptions {
    /// Words a segment may reach back before the cursor.
    pub overlap_words: usize,
    /// Words searched ahead of the cursor for a segment start.
    pub window_words: usize,
    pub acceptance_ratio: f64,
    pub formulas: FormulaFlags,
    pub normalize: NormalizeOptions,
}

impl Default for TasmeeaOptions {
    fn default() -> Self {
        Self {
            overlap_words: 6,
            window_words: 30,
            acceptance_ratio: 0.5,
            formulas: FormulaFlags::all(),
            normalize: NormalizeOptions::default(),
        }
    }
}

/// The match for one input segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasmeeaMatch {
    /// `None` when no window reached the acceptance ratio.
    pub segment: Option<SegmentScripts>,
    pub ratio: f64,
}

/// Bounds on the window length in words for a normalized segment.
pub fn estimate_window_len(text: &str) -> (usize, usize) {
    let len = text.chars().count();
    (std::cmp::max(1, len / 6), len.div_ceil(3))
}

/// How far back the first candidate window starts.
pub fn estimate_overlap(prev_text: Option<&str>, max_overlap: usize) -> usize {
    match prev_text {
        Some(_) => max_overlap,
        None => 0,
    }
}

/// Match `text_segments` in order against sura `sura_idx`.
pub fn tasmeea_sura<S: AsRef<str>>(
    store: &QuranStore,
    alphabet: &Alphabet,
    text_segments: &[S],
    sura_idx: usize,
    options: &TasmeeaOptions,
) -> Result<Vec<TasmeeaMatch>> {
    let norm_options = options.normalize.with_spaces(false);
    let mut aya = Aya::new(store, alphabet, sura_idx, 1)?.with_formulas(options.formulas);
    let last_start = options.window_words as i64 - options.overlap_words as i64;

    let mut outputs = Vec::with_capacity(text_segments.len());
    let mut prev: Option<String> = None;
    for (seg_idx, text) in text_segments.iter().enumerate() {
        let norm = normalize_aya(text.as_ref(), &norm_options, alphabet)?;
        let (min_window, max_window) = estimate_window_len(&norm);
        let overlap = estimate_overlap(prev.as_deref(), options.overlap_words) as i64;

        let mut best: Option<SegmentScripts> = None;
        let mut best_ratio = 0.0;
        let mut step_words = min_window;
        for start in -overlap..last_start {
            for window in min_window..=max_window {
                let candidate = match aya.get_by_imlaey_words(start, window) {
                    Ok(segment) => segment,
                    Err(QuranError::PartOfUthmaniWord { .. }) => continue,
                    Err(e) => return Err(e),
                };
                let reference = normalize_aya(&candidate.imalaey, &norm_options, alphabet)?;
                let ratio = strsim::normalized_levenshtein(&norm, &reference);
                if ratio >= options.acceptance_ratio && ratio > best_ratio {
                    step_words = window;
                    best = Some(candidate);
                    best_ratio = ratio;
                }
            }
        }

        match &best {
            Some(segment) => log::debug!(
                "segment {} matched {:.3}: {}",
                seg_idx,
                best_ratio,
                segment.uthmani
            ),
            None => log::warn!("segment {} has no match at or above {}", seg_idx, options.acceptance_ratio),
        }
        outputs.push(TasmeeaMatch {
            segment: best,
            ratio: best_ratio,
        });
        aya = aya.step_by_imlaey_words(step_words as i64)?;
        prev = Some(norm);
    }

    let matched = outputs.iter().filter(|m| m.segment.is_some()).count();
    log::info!("tasmeea matched {}/{} segments of sura {}", matched, outputs.len(), sura_idx);
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::quran::fixture;
    use crate::types::SpanPoint;

    fn options(formulas: FormulaFlags) -> TasmeeaOptions {
        TasmeeaOptions {
            formulas,
            normalize: NormalizeOptions {
                remove_tashkeel: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_estimates() {
        assert_eq!(estimate_window_len("قلأعوذبربالناس"), (2, 5));
        assert_eq!(estimate_window_len(""), (1, 0));
        assert_eq!(estimate_overlap(None, 6), 0);
        assert_eq!(estimate_overlap(Some("x"), 6), 6);
    }

    #[test]
    fn test_consecutive_segments() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let segments = ["قل أعوذ برب الناس", "ملك الناس إله الناس"];
        let out = tasmeea_sura(&store, alph, &segments, 114, &options(FormulaFlags::default())).unwrap();
        assert_eq!(out.len(), 2);

        let first = out[0].segment.as_ref().unwrap();
        assert_eq!(out[0].ratio, 1.0);
        assert_eq!(first.uthmani, store.verse(114, 1).unwrap().uthmani);

        let second = out[1].segment.as_ref().unwrap();
        assert_eq!(out[1].ratio, 1.0);
        assert_eq!(second.start_span, Some(SpanPoint::new(114, 2, 0, 0)));
        assert_eq!(second.end_span, Some(SpanPoint::new(114, 3, 2, 2)));
    }

    #[test]
    fn test_formula_segments() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let segments = [
            "أعوذ بالله من الشيطان الرجيم",
            "بسم الله الرحمن الرحيم",
            "قل أعوذ برب الناس",
        ];
        let out = tasmeea_sura(&store, alph, &segments, 114, &options(FormulaFlags::all())).unwrap();

        let istiaatha = out[0].segment.as_ref().unwrap();
        assert!(istiaatha.has_istiaatha && !istiaatha.has_quran);
        assert_eq!(istiaatha.uthmani, alph.istiaatha.uthmani);

        let bismillah = out[1].segment.as_ref().unwrap();
        assert!(bismillah.has_bismillah && !bismillah.has_quran);

        let verse = out[2].segment.as_ref().unwrap();
        assert!(verse.has_quran && !verse.has_bismillah);
        assert_eq!(verse.start_span, Some(SpanPoint::new(114, 1, 0, 0)));
    }

    #[test]
    fn test_unmatched_segment() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let out = tasmeea_sura(&store, alph, &["xyz"], 114, &options(FormulaFlags::default())).unwrap();
        assert_eq!(out[0].segment, None);
        assert_eq!(out[0].ratio, 0.0);
    }

    #[test]
    fn test_bad_sura() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        assert!(matches!(
            tasmeea_sura(&store, alph, &["قل"], 115, &TasmeeaOptions::default()),
            Err(QuranError::IndexOutOfRange { .. })
        ));
    }
}
