//! Word alignment between the Imlaey and Uthmani spellings of one verse.
//!
//! The two scripts mostly agree word for word. Where they do not, a handful
//! of Uthmani words are written as one glyph group for several Imlaey words:
//! either a fixed spelling from the rasm table or a vocative clitic fused
//! with the word after it.

use crate::alphabet::UniqueRasmMap;
use crate::error::{QuranError, Result};
use crate::types::WordSpan;

pub const WORD_SEPARATOR: &str = " ";

/// Map every Imlaey word index to the Uthmani word index that spells it.
///
/// The result is monotonic, covers every Imlaey word exactly once and ends
/// on the last Uthmani word.
pub fn encode(imlaey: &[&str], uthmani: &[&str], table: &UniqueRasmMap) -> Result<Vec<usize>> {
    let mismatch = || QuranError::AlignmentMismatch {
        imlaey: imlaey.len(),
        uthmani: uthmani.len(),
    };
    if imlaey.len() == uthmani.len() {
        return Ok((0..imlaey.len()).collect());
    }

    let mut entries: Vec<Vec<&str>> = table
        .rasm_map
        .iter()
        .map(|e| e.imlaey.split(WORD_SEPARATOR).collect())
        .collect();
    entries.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut map = Vec::with_capacity(imlaey.len());
    let mut iml_idx = 0;
    for uth_idx in 0..uthmani.len() {
        if iml_idx >= imlaey.len() {
            return Err(mismatch());
        }
        let rest = &imlaey[iml_idx..];
        let span = entries
            .iter()
            .find(|words| rest.starts_with(words))
            .map(|words| words.len());
        let span = match span {
            Some(n) => {
                log::debug!("rasm table merges {} words at {}", n, iml_idx);
                n
            }
            None if rest.len() > 1 && table.imlaey_starts.iter().any(|w| w == rest[0]) => {
                log::debug!("clitic `{}` merges with the next word", rest[0]);
                2
            }
            None => 1,
        };
        map.extend(std::iter::repeat(uth_idx).take(span));
        iml_idx += span;
    }

    if map.len() != imlaey.len() || map.last() != uthmani.len().checked_sub(1).as_ref() {
        return Err(mismatch());
    }
    Ok(map)
}

/// The Uthmani text spelling the Imlaey words in `span`.
///
/// Fails with [`QuranError::PartOfUthmaniWord`] when either boundary of the
/// span falls inside a merged word group.
pub fn decode(map: &[usize], uthmani: &[&str], span: WordSpan) -> Result<String> {
    let start = span.start;
    let end = span.end.unwrap_or(map.len());
    if start > end || end > map.len() {
        return Err(QuranError::InvalidWordSpan {
            start,
            end,
            len: map.len(),
        });
    }
    if start == end {
        return Ok(String::new());
    }
    let cuts_end = end < map.len() && map[end - 1] == map[end];
    let cuts_start = start > 0 && map[start - 1] == map[start];
    if cuts_end || cuts_start {
        return Err(QuranError::PartOfUthmaniWord { start, end });
    }

    let mut words: Vec<usize> = map[start..end].to_vec();
    words.dedup();
    words
        .into_iter()
        .map(|idx| {
            uthmani.get(idx).copied().ok_or(QuranError::InvalidWordSpan {
                start,
                end,
                len: uthmani.len(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(|words| words.join(WORD_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;

    fn words(text: &str) -> Vec<&str> {
        text.split(WORD_SEPARATOR).collect()
    }

    const IML_72_16: &str =
        "وَأَنْ لَوِ اسْتَقَامُوا عَلَى الطَّرِيقَةِ لَأَسْقَيْنَاهُمْ مَاءً غَدَقًا";
    const UTH_72_16: &str =
        "وَأَلَّوِ ٱسْتَقَـٰمُوا۟ عَلَى ٱلطَّرِيقَةِ لَأَسْقَيْنَـٰهُم مَّآءً غَدَقًۭا";

    #[test]
    fn test_equal_counts_are_identity() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let map = encode(&words("مَلِكِ النَّاسِ"), &words("مَلِكِ ٱلنَّاسِ"), table).unwrap();
        assert_eq!(map, vec![0, 1]);
    }

    #[test]
    fn test_rasm_table_merge() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let map = encode(&words(IML_72_16), &words(UTH_72_16), table).unwrap();
        assert_eq!(map, vec![0, 0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_clitic_merge() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let iml = words("يَا أَيُّهَا النَّاسُ");
        let uth = words("يَـٰٓأَيُّهَا ٱلنَّاسُ");
        assert_eq!(encode(&iml, &uth, table).unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_unalignable_counts() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let err = encode(&words("a b c d"), &words("a b"), table).unwrap_err();
        assert!(matches!(err, QuranError::AlignmentMismatch { imlaey: 4, uthmani: 2 }));
    }

    #[test]
    fn test_decode_across_merge() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let uth = words(UTH_72_16);
        let map = encode(&words(IML_72_16), &uth, table).unwrap();
        assert_eq!(
            decode(&map, &uth, WordSpan::new(0, 4)).unwrap(),
            "وَأَلَّوِ ٱسْتَقَـٰمُوا۟ عَلَى"
        );
        assert_eq!(decode(&map, &uth, WordSpan::starting_at(0)).unwrap(), UTH_72_16);
    }

    #[test]
    fn test_decode_rejects_split_group() {
        let table = &alphabet::builtin().unwrap().unique_rasm;
        let uth = words(UTH_72_16);
        let map = encode(&words(IML_72_16), &uth, table).unwrap();
        assert!(matches!(
            decode(&map, &uth, WordSpan::new(0, 1)),
            Err(QuranError::PartOfUthmaniWord { start: 0, end: 1 })
        ));
        assert!(matches!(
            decode(&map, &uth, WordSpan::new(1, 3)),
            Err(QuranError::PartOfUthmaniWord { .. })
        ));
    }

    #[test]
    fn test_decode_bad_span() {
        let map = vec![0, 1];
        let uth = words("a b");
        assert!(matches!(
            decode(&map, &uth, WordSpan::new(1, 3)),
            Err(QuranError::InvalidWordSpan { start: 1, end: 3, len: 2 })
        ));
        assert_eq!(decode(&map, &uth, WordSpan::new(1, 1)).unwrap(), "");
    }
}
