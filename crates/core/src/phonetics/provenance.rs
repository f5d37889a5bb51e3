//! Character provenance: which input character produced each output
//! character, carried across every rewrite with a sequence diff.

use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Realign `old_map` (one entry per char of `old`) onto `new`.
///
/// Equal spans copy their entries, replaced spans spread the old entries
/// proportionally over the new length, inserted chars get `None` and deleted
/// chars drop out.
pub fn remap(old: &[char], new: &[char], old_map: &[Option<usize>]) -> Vec<Option<usize>> {
    let mut map = Vec::with_capacity(new.len());
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => map.extend(old_range.map(|i| old_map[i])),
            DiffTag::Delete => {}
            DiffTag::Insert => map.extend(new_range.map(|_| None)),
            DiffTag::Replace => {
                let old_len = old_range.len();
                let new_len = new_range.len();
                for j in 0..new_len {
                    map.push(old_map[old_range.start + j * old_len / new_len]);
                }
            }
        }
    }
    map
}

/// Drop whitespace from `text` and the matching entries of `map`.
pub fn strip_spaces(text: &str, map: &[Option<usize>]) -> (String, Vec<Option<usize>>) {
    text.chars()
        .zip(map.iter())
        .filter(|(c, _)| !c.is_whitespace())
        .map(|(c, m)| (c, *m))
        .unzip()
}
