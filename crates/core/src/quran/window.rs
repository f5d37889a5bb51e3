//! Windows of recitation counted in Imlaey words across verse and sura
//! boundaries.
//!
//! Each verse is treated as a unit of words: the verse words plus whichever
//! formulas the cursor carries (istiaatha and bismillah before a first verse,
//! the closing formula after a last verse). Offsets walk these units in
//! canonical order. A negative offset wraps back from the first verse of the
//! canon to the last, so a window may start in sura 114 and finish in sura 1;
//! otherwise reading stops at the end of sura 114.

use crate::error::Result;
use crate::quran::aya::{Aya, Part, VerseUnit};
use crate::quran::rasm::{self, WORD_SEPARATOR};
use crate::types::{SegmentScripts, SpanPoint, WordSpan};

impl<'a> Aya<'a> {
    /// Resolve `offset` words from the cursor's word position to a verse and
    /// an index inside that verse's unit.
    fn seek(&self, offset: i64) -> Result<(Aya<'a>, usize, VerseUnit<'a>)> {
        let formulas = self.formulas();
        let mut cursor = self.with_start_word(0);
        let mut unit = cursor.unit(formulas)?;
        let mut pos = self.start_imlaey_word_idx() as i64 + offset;
        while pos < 0 {
            cursor = cursor.step(-1);
            unit = cursor.unit(formulas)?;
            pos += unit.len() as i64;
        }
        while pos >= unit.len() as i64 {
            pos -= unit.len() as i64;
            cursor = cursor.step(1);
            unit = cursor.unit(formulas)?;
        }
        Ok((cursor, pos as usize, unit))
    }

    /// Both scripts of `window` Imlaey words starting `start` words from the
    /// cursor. `start` may be negative.
    ///
    /// Spans are verse-relative and their ends exclusive. A window that only
    /// covers formula words has no spans and `has_quran == false`.
    pub fn get_by_imlaey_words(&self, start: i64, window: usize) -> Result<SegmentScripts> {
        let formulas = self.formulas();
        let store = self.store();
        let last = store.total_verses() - 1;
        let (mut cursor, mut pos, mut unit) = self.seek(start)?;
        // Set when a negative start wrapped behind the first verse; the
        // window may then cross the end of the canon once to get back.
        let mut may_wrap = start < 0
            && store.ordinal(cursor.sura_idx(), cursor.aya_idx())
                > store.ordinal(self.sura_idx(), self.aya_idx());

        let mut segment = SegmentScripts::default();
        let mut imlaey = Vec::new();
        let mut uthmani = Vec::new();
        let mut remaining = window;
        while remaining > 0 {
            let take = remaining.min(unit.len() - pos);
            let end = pos + take;
            imlaey.push(unit.imlaey[pos..end].join(WORD_SEPARATOR));
            uthmani.push(rasm::decode(&unit.map, &unit.uthmani, WordSpan::new(pos, end))?);

            for part in &unit.parts[pos..end] {
                match part {
                    Part::Istiaatha => segment.has_istiaatha = true,
                    Part::Bismillah => segment.has_bismillah = true,
                    Part::Sadaka => segment.has_sadaka = true,
                    Part::Verse => segment.has_quran = true,
                }
            }

            let verse = unit.verse_range();
            let lo = pos.max(verse.start);
            let hi = end.min(verse.end);
            if lo < hi {
                let base = unit.map[verse.start];
                let (sura, aya) = (cursor.sura_idx(), cursor.aya_idx());
                if segment.start_span.is_none() {
                    segment.start_span = Some(SpanPoint::new(
                        sura,
                        aya,
                        lo - verse.start,
                        unit.map[lo] - base,
                    ));
                }
                segment.end_span = Some(SpanPoint::new(
                    sura,
                    aya,
                    hi - verse.start,
                    unit.map[hi - 1] + 1 - base,
                ));
            }

            remaining -= take;
            if remaining == 0 {
                break;
            }
            if store.ordinal(cursor.sura_idx(), cursor.aya_idx()) == last {
                if !may_wrap {
                    log::debug!("window from {} stopped {} words short at the end of the Quran", self, remaining);
                    break;
                }
                may_wrap = false;
            }
            cursor = cursor.step(1);
            unit = cursor.unit(formulas)?;
            pos = 0;
        }

        segment.imalaey = imlaey.join(WORD_SEPARATOR);
        segment.uthmani = uthmani.join(WORD_SEPARATOR);
        Ok(segment)
    }

    /// A cursor `window` Imlaey words after this one, pointing at the word
    /// where the next window starts.
    pub fn step_by_imlaey_words(&self, window: i64) -> Result<Aya<'a>> {
        let (cursor, pos, _) = self.seek(window)?;
        Ok(cursor.with_start_word(pos))
    }
}
