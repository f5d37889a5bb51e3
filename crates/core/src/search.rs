//! Exact search of Imlaey text around a pivot verse.
//!
//! The query and the verses are normalized the same way with spaces removed,
//! matched literally, and every hit that starts and ends on word boundaries
//! is mapped back to a word span and its Uthmani text.

use serde::Serialize;

use crate::error::{QuranError, Result};
use crate::normalize::{normalize_aya, NormalizeOptions};
use crate::quran::rasm::WORD_SEPARATOR;
use crate::quran::Aya;
use crate::types::{FormulaFlags, WordSpan};

/// One search hit.
#[derive(Debug, Clone)]
pub struct SearchItem<'a> {
    /// Verse the hit starts in. `None` when the query is only the istiaatha.
    pub start_aya: Option<Aya<'a>>,
    pub num_ayat: usize,
    /// Start word in the first verse, exclusive end word in the last one.
    pub imlaey_word_span: Option<WordSpan>,
    pub uthmani_script: String,
    pub has_bismillah: bool,
    pub has_istiaatha: bool,
}

/// Plain view of a [`SearchItem`] for printing.
#[derive(Debug, Clone, Serialize)]
pub struct SearchItemView {
    pub sura_idx: Option<usize>,
    pub aya_idx: Option<usize>,
    pub num_ayat: usize,
    pub imlaey_word_span: Option<WordSpan>,
    pub uthmani_script: String,
    pub has_bismillah: bool,
    pub has_istiaatha: bool,
}

impl SearchItem<'_> {
    pub fn view(&self) -> SearchItemView {
        SearchItemView {
            sura_idx: self.start_aya.map(|a| a.sura_idx()),
            aya_idx: self.start_aya.map(|a| a.aya_idx()),
            num_ayat: self.num_ayat,
            imlaey_word_span: self.imlaey_word_span,
            uthmani_script: self.uthmani_script.clone(),
            has_bismillah: self.has_bismillah,
            has_istiaatha: self.has_istiaatha,
        }
    }
}

/// (verse offset, word offset) inside the searched verses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Vertex {
    aya: usize,
    word: usize,
}

/// Word boundaries of the byte range `[start, end)` over the concatenated
/// words, or `None` if either end falls inside a word.
fn words_span(start: usize, end: usize, words: &[Vec<String>]) -> Option<(Vertex, Vertex)> {
    if start >= end {
        return None;
    }
    let mut offset = 0;
    let mut first = None;
    for (aya, aya_words) in words.iter().enumerate() {
        for (word, w) in aya_words.iter().enumerate() {
            if first.is_none() {
                if offset == start {
                    first = Some(Vertex { aya, word });
                } else if offset > start {
                    return None;
                }
            }
            offset += w.len();
            if first.is_some() {
                if offset == end {
                    return first.map(|f| (f, Vertex { aya, word: word + 1 }));
                }
                if offset > end {
                    return None;
                }
            }
        }
    }
    None
}

/// Normalized words of `window` verses from `first`, and their
/// concatenation.
fn window_words(
    first: &Aya<'_>,
    window: usize,
    include_bismillah: bool,
    options: &NormalizeOptions,
) -> Result<(Vec<Vec<String>>, String)> {
    let alphabet = first.alphabet();
    let spaced = options.with_spaces(true);
    let mut words = Vec::with_capacity(window);
    let mut joined = String::new();
    for aya in first.ayat_after(Some(window)) {
        let fmt = aya.get()?;
        let mut aya_words = Vec::new();
        if let (true, Some(bismillah)) = (include_bismillah, fmt.bismillah_imlaey.as_deref()) {
            let norm = normalize_aya(bismillah, &spaced, alphabet)?;
            aya_words.extend(norm.split(WORD_SEPARATOR).map(str::to_string));
        }
        let norm = normalize_aya(&fmt.imlaey, &spaced, alphabet)?;
        aya_words.extend(norm.split(WORD_SEPARATOR).map(str::to_string));
        for w in &aya_words {
            joined.push_str(w);
        }
        words.push(aya_words);
    }
    Ok((words, joined))
}

fn uthmani_of(start_aya: &Aya<'_>, num_ayat: usize, span: WordSpan, has_bismillah: bool) -> Result<String> {
    let formulas = FormulaFlags {
        bismillah: has_bismillah,
        ..Default::default()
    };
    let mut parts = Vec::with_capacity(num_ayat);
    for (idx, aya) in start_aya.ayat_after(Some(num_ayat)).enumerate() {
        let mut aya_span = WordSpan::starting_at(0);
        if idx == 0 {
            aya_span.start = span.start;
        }
        if idx + 1 == num_ayat {
            aya_span.end = span.end;
        }
        parts.push(aya.imlaey_to_uthmani(aya_span, formulas)?);
    }
    Ok(parts.join(WORD_SEPARATOR))
}

/// Search `text` in the verses around `start_aya`: from `window / 2` verses
/// before it over `window + 1` verses.
///
/// A leading istiaatha in the query is recognized and stripped. Verses are
/// first searched without bismillah, then with it.
pub fn search<'a>(
    text: &str,
    start_aya: &Aya<'a>,
    window: usize,
    options: &NormalizeOptions,
) -> Result<Vec<SearchItem<'a>>> {
    let alphabet = start_aya.alphabet();
    let compact = options.with_spaces(false);
    let mut query = normalize_aya(text, &compact, alphabet)?;
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let loop_aya = start_aya.step(-((window as i64 + 1) / 2));

    let istiaatha = normalize_aya(&alphabet.istiaatha.imlaey, &compact, alphabet)?;
    let mut has_istiaatha = false;
    if let Some(pos) = query.find(&istiaatha) {
        query = query[pos + istiaatha.len()..].to_string();
        has_istiaatha = true;
        if query.is_empty() {
            return Ok(vec![SearchItem {
                start_aya: None,
                num_ayat: 0,
                imlaey_word_span: None,
                uthmani_script: alphabet.istiaatha.uthmani.clone(),
                has_bismillah: false,
                has_istiaatha,
            }]);
        }
    }

    let mut found = Vec::new();
    for include_bismillah in [false, true] {
        let (words, joined) = window_words(&loop_aya, window + 1, include_bismillah, options)?;
        for (pos, hit) in joined.match_indices(&query) {
            let Some((first, last)) = words_span(pos, pos + hit.len(), &words) else {
                continue;
            };
            let first_aya = loop_aya.step(first.aya as i64);
            let num_ayat = last.aya - first.aya + 1;
            let span = WordSpan::new(first.word, last.word);
            let uthmani = match uthmani_of(&first_aya, num_ayat, span, include_bismillah) {
                Ok(text) => text,
                Err(QuranError::PartOfUthmaniWord { .. }) => {
                    log::debug!("skipping hit at {first_aya} that splits an uthmani word");
                    continue;
                }
                Err(e) => return Err(e),
            };
            found.push(SearchItem {
                start_aya: Some(first_aya),
                num_ayat,
                imlaey_word_span: Some(span),
                uthmani_script: uthmani,
                has_bismillah: include_bismillah,
                has_istiaatha,
            });
        }
        if !found.is_empty() {
            if has_istiaatha {
                for item in &mut found {
                    item.uthmani_script =
                        format!("{}{}{}", alphabet.istiaatha.uthmani, WORD_SEPARATOR, item.uthmani_script);
                }
            }
            break;
        }
    }
    log::info!("search found {} match(es) around {}", found.len(), start_aya);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use crate::quran::fixture;

    fn plain() -> NormalizeOptions {
        NormalizeOptions {
            remove_tashkeel: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_words_span_boundaries() {
        let words = vec![
            vec!["aaa".to_string(), "bbb".to_string()],
            vec!["cc".to_string(), "ddd".to_string()],
        ];
        assert_eq!(
            words_span(0, 8, &words),
            Some((Vertex { aya: 0, word: 0 }, Vertex { aya: 1, word: 1 }))
        );
        assert_eq!(
            words_span(3, 6, &words),
            Some((Vertex { aya: 0, word: 1 }, Vertex { aya: 0, word: 2 }))
        );
        assert_eq!(words_span(1, 6, &words), None);
        assert_eq!(words_span(0, 7, &words), None);
        assert_eq!(words_span(3, 3, &words), None);
    }

    #[test]
    fn test_search_within_window() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let pivot = Aya::new(&store, alph, 114, 2).unwrap();
        let found = search("ملك الناس إله", &pivot, 2, &plain()).unwrap();
        assert_eq!(found.len(), 1);
        let item = &found[0];
        let start = item.start_aya.unwrap();
        assert_eq!((start.sura_idx(), start.aya_idx()), (114, 2));
        assert_eq!(item.num_ayat, 2);
        assert_eq!(item.imlaey_word_span, Some(WordSpan::new(0, 1)));
        assert_eq!(item.uthmani_script, "مَلِكِ ٱلنَّاسِ إِلَـٰهِ");
        assert!(!item.has_bismillah && !item.has_istiaatha);
    }

    #[test]
    fn test_search_partial_word_is_ignored() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let pivot = Aya::new(&store, alph, 114, 2).unwrap();
        assert!(search("لك الناس", &pivot, 2, &plain()).unwrap().is_empty());
    }

    #[test]
    fn test_search_with_istiaatha_and_bismillah() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let pivot = Aya::new(&store, alph, 112, 1).unwrap();
        let query = "أعوذ بالله من الشيطان الرجيم بسم الله الرحمن الرحيم قل هو الله أحد";
        let found = search(query, &pivot, 2, &plain()).unwrap();
        assert_eq!(found.len(), 1);
        let item = &found[0];
        assert!(item.has_istiaatha && item.has_bismillah);
        assert_eq!(item.imlaey_word_span, Some(WordSpan::new(0, 8)));
        let verse = store.verse(112, 1).unwrap();
        assert_eq!(
            item.uthmani_script,
            format!(
                "{} {} {}",
                alph.istiaatha.uthmani, fixture::BISMILLAH.0, verse.uthmani
            )
        );
    }

    #[test]
    fn test_istiaatha_only() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let pivot = Aya::new(&store, alph, 112, 1).unwrap();
        let found = search(&alph.istiaatha.imlaey, &pivot, 2, &NormalizeOptions::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].start_aya.is_none());
        assert_eq!(found[0].uthmani_script, alph.istiaatha.uthmani);
    }

    #[test]
    fn test_empty_query() {
        let store = fixture::store();
        let alph = alphabet::builtin().unwrap();
        let pivot = Aya::new(&store, alph, 1, 1).unwrap();
        assert!(search("  ", &pivot, 2, &plain()).unwrap().is_empty());
    }
}
