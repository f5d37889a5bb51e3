//! Alphabet registry: named Uthmani, Imlaey and phonetic symbols.
//!
//! The raw tables live in `quran-alphabet.json`, embedded at compile time.
//! [`Alphabet::from_json`] parses them, derives the character classes used
//! by the rewrite rules and validates every table before handing out an
//! immutable record. [`builtin`] shares one parsed copy process-wide, but
//! every consumer takes an explicit `&Alphabet`.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{QuranError, Result};

/// The embedded alphabet artifact.
const ALPHABET_DATA: &str = include_str!("quran-alphabet.json");

static BUILTIN: OnceLock<std::result::Result<Alphabet, String>> = OnceLock::new();

/// The alphabet parsed from the embedded artifact.
pub fn builtin() -> Result<&'static Alphabet> {
    BUILTIN
        .get_or_init(|| Alphabet::from_json(ALPHABET_DATA).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| QuranError::InvalidAlphabet(e.clone()))
}

/// The single character behind a table entry.
pub(crate) fn glyph(symbol: &str) -> Result<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(QuranError::InvalidAlphabet(format!(
            "`{symbol}` is not a single character"
        ))),
    }
}

/// Every Uthmani glyph the rewrite rules refer to by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UthmaniAlphabet {
    pub space: String,
    pub hamza: String,
    pub hamza_above_alif: String,
    pub hamza_above_waw: String,
    pub hamza_below_alif: String,
    pub hamza_above_yaa: String,
    pub alif_madda: String,
    pub alif: String,
    pub baa: String,
    pub taa_marboota: String,
    pub taa_mabsoota: String,
    pub thaa: String,
    pub jeem: String,
    pub haa_mohmala: String,
    pub khaa: String,
    pub daal: String,
    pub thaal: String,
    pub raa: String,
    pub zay: String,
    pub seen: String,
    pub sheen: String,
    pub saad: String,
    pub daad: String,
    pub taa_mofakhama: String,
    pub zaa_mofakhama: String,
    pub ayn: String,
    pub ghyn: String,
    pub kasheeda: String,
    pub faa: String,
    pub qaf: String,
    pub kaf: String,
    pub lam: String,
    pub meem: String,
    pub noon: String,
    pub haa: String,
    pub waw: String,
    pub alif_maksora: String,
    pub yaa: String,
    pub tanween_fath: String,
    pub tanween_dam: String,
    pub tanween_kasr: String,
    pub fatha: String,
    pub damma: String,
    pub kasra: String,
    pub shadda: String,
    pub sukoon: String,
    pub madd: String,
    pub hamza_above: String,
    pub small_alef: String,
    pub hamzat_wasl: String,
    pub small_high_seen: String,
    pub skoon_mostadeer: String,
    pub skoon_mostateel: String,
    pub meem_iqlab: String,
    pub small_low_seen: String,
    pub small_waw: String,
    pub small_yaa: String,
    pub small_high_yaa: String,
    pub small_noon: String,
    pub imala: String,
    pub ishmam: String,
    pub tasheel: String,
    pub small_low_meem: String,
}

/// Character classes derived from [`UthmaniAlphabet`]. Each field is a
/// plain concatenation meant to sit inside a regex `[...]` class.
#[derive(Debug, Clone)]
pub struct UthmaniGroups {
    pub harakat: String,
    pub tanween: String,
    /// Marks that trail a tanween to hint at its realization.
    pub tanween_markers: String,
    pub hamazat: String,
    /// Base consonant letters, long-vowel letters included.
    pub letters: String,
    pub ikhfaa: String,
    pub idgham_ghonna: String,
    /// Every combining mark that can follow a letter.
    pub diacritics: String,
}

impl UthmaniGroups {
    fn derive(u: &UthmaniAlphabet) -> Self {
        let cat = |parts: &[&String]| parts.iter().map(|s| s.as_str()).collect::<String>();
        let letters = cat(&[
            &u.hamza, &u.alif, &u.baa, &u.taa_marboota, &u.taa_mabsoota, &u.thaa, &u.jeem,
            &u.haa_mohmala, &u.khaa, &u.daal, &u.thaal, &u.raa, &u.zay, &u.seen, &u.sheen,
            &u.saad, &u.daad, &u.taa_mofakhama, &u.zaa_mofakhama, &u.ayn, &u.ghyn, &u.faa,
            &u.qaf, &u.kaf, &u.lam, &u.meem, &u.noon, &u.haa, &u.waw, &u.alif_maksora, &u.yaa,
        ]);
        Self {
            harakat: cat(&[&u.fatha, &u.damma, &u.kasra]),
            tanween: cat(&[&u.tanween_fath, &u.tanween_dam, &u.tanween_kasr]),
            tanween_markers: cat(&[&u.meem_iqlab, &u.small_low_meem]),
            hamazat: cat(&[
                &u.hamza_above_alif, &u.hamza_above_waw, &u.hamza_below_alif,
                &u.hamza_above_yaa, &u.hamza_above, &u.alif_madda,
            ]),
            letters,
            ikhfaa: cat(&[
                &u.taa_mabsoota, &u.thaa, &u.jeem, &u.daal, &u.thaal, &u.zay, &u.seen,
                &u.sheen, &u.saad, &u.daad, &u.taa_mofakhama, &u.zaa_mofakhama, &u.faa,
                &u.qaf, &u.kaf,
            ]),
            idgham_ghonna: cat(&[&u.yaa, &u.waw]),
            diacritics: cat(&[
                &u.fatha, &u.damma, &u.kasra, &u.tanween_fath, &u.tanween_dam,
                &u.tanween_kasr, &u.shadda, &u.sukoon, &u.madd, &u.small_alef,
                &u.meem_iqlab, &u.small_low_meem, &u.skoon_mostadeer, &u.skoon_mostateel,
                &u.small_high_seen, &u.small_low_seen, &u.imala, &u.ishmam, &u.tasheel,
            ]),
        }
    }
}

/// Symbols of the modern (Imlaey) script used by text normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImlaeyAlphabet {
    pub alphabet: String,
    pub hamazat: String,
    pub hamza: String,
    pub alef: String,
    pub alef_maksoora: String,
    pub taa_marboota: String,
    pub taa_mabsoota: String,
    pub haa: String,
    pub small_alef: String,
    /// Short vowels, tanween, shadda and sukoon.
    pub tashkeel: String,
    pub skoon: String,
}

/// The output alphabet of the phonetic pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneticAlphabet {
    pub hamza: String,
    pub baa: String,
    pub taa: String,
    pub thaa: String,
    pub jeem: String,
    pub haa_mohmala: String,
    pub khaa: String,
    pub daal: String,
    pub thaal: String,
    pub raa: String,
    pub zay: String,
    pub seen: String,
    pub sheen: String,
    pub saad: String,
    pub daad: String,
    pub taa_mofakhama: String,
    pub zaa_mofakhama: String,
    pub ayn: String,
    pub ghyn: String,
    pub faa: String,
    pub qaf: String,
    pub kaf: String,
    pub lam: String,
    pub meem: String,
    pub noon: String,
    pub haa: String,
    pub waw: String,
    pub yaa: String,
    pub alif: String,
    pub waw_madd: String,
    pub yaa_madd: String,
    pub noon_mokhfah: String,
    pub meem_mokhfah: String,
    pub fatha: String,
    pub damma: String,
    pub kasra: String,
}

impl PhoneticAlphabet {
    /// Every symbol a phoneme chunk can start with, in table order.
    pub fn core(&self) -> Vec<&str> {
        vec![
            &self.hamza, &self.baa, &self.taa, &self.thaa, &self.jeem, &self.haa_mohmala,
            &self.khaa, &self.daal, &self.thaal, &self.raa, &self.zay, &self.seen,
            &self.sheen, &self.saad, &self.daad, &self.taa_mofakhama, &self.zaa_mofakhama,
            &self.ayn, &self.ghyn, &self.faa, &self.qaf, &self.kaf, &self.lam, &self.meem,
            &self.noon, &self.haa, &self.waw, &self.yaa, &self.alif, &self.waw_madd,
            &self.yaa_madd, &self.noon_mokhfah, &self.meem_mokhfah,
        ]
        .into_iter()
        .map(|s| s.as_str())
        .collect()
    }

    /// Short vowels that may trail a chunk.
    pub fn residuals(&self) -> String {
        format!("{}{}{}", self.fatha, self.damma, self.kasra)
    }
}

/// Articulatory classes over the phonetic alphabet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneticGroups {
    pub hams: String,
    pub shidda: String,
    pub between_shidda_rakhawa: String,
    pub tafkheem: String,
    pub itbaq: String,
    pub safeer: String,
    pub qalqla: String,
    pub tikrar: String,
    pub tafashie: String,
    pub istitala: String,
    pub ghonna: String,
}

impl PhoneticGroups {
    fn all(&self) -> [(&'static str, &String); 11] {
        [
            ("hams", &self.hams),
            ("shidda", &self.shidda),
            ("between_shidda_rakhawa", &self.between_shidda_rakhawa),
            ("tafkheem", &self.tafkheem),
            ("itbaq", &self.itbaq),
            ("safeer", &self.safeer),
            ("qalqla", &self.qalqla),
            ("tikrar", &self.tikrar),
            ("tafashie", &self.tafashie),
            ("istitala", &self.istitala),
            ("ghonna", &self.ghonna),
        ]
    }
}

/// Expansion of an abbreviated sura opening into its spelled-out letters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Disassembly {
    pub opening: String,
    pub pronunciation: String,
}

/// Where a special pattern may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// A verse-specific reading exception.
///
/// With `attr_name` set, the active moshaf's value for that attribute picks
/// one of `options`; otherwise `target_replacement` is substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialPattern {
    pub pattern: String,
    #[serde(default)]
    pub attr_name: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub target_replacement: Option<String>,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RasmEntry {
    pub uthmani: String,
    pub imlaey: String,
}

/// Known spelling mergers between the two scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniqueRasmMap {
    /// Multi-word Imlaey spellings written as one Uthmani word.
    pub rasm_map: Vec<RasmEntry>,
    /// Imlaey words always fused with the following word in Uthmani.
    pub imlaey_starts: Vec<String>,
}

/// A fixed formula in both scripts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Formula {
    pub imlaey: String,
    pub uthmani: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAlphabet {
    uthmani: UthmaniAlphabet,
    imlaey: ImlaeyAlphabet,
    phonetics: PhoneticAlphabet,
    phonetic_groups: PhoneticGroups,
    disassembly: Vec<Disassembly>,
    special_patterns: Vec<SpecialPattern>,
    unique_rasm_map: UniqueRasmMap,
    istiaatha: Formula,
    bismillah: Formula,
    sadaka: Formula,
}

/// The fully built, read-only registry.
#[derive(Debug, Clone)]
pub struct Alphabet {
    pub uthmani: UthmaniAlphabet,
    pub groups: UthmaniGroups,
    pub imlaey: ImlaeyAlphabet,
    pub phonetics: PhoneticAlphabet,
    pub phonetic_groups: PhoneticGroups,
    pub disassembly: Vec<Disassembly>,
    pub special_patterns: Vec<SpecialPattern>,
    pub unique_rasm: UniqueRasmMap,
    pub istiaatha: Formula,
    pub bismillah: Formula,
    pub sadaka: Formula,
}

impl Alphabet {
    /// Parse and validate an alphabet document.
    pub fn from_json(data: &str) -> Result<Self> {
        let raw: RawAlphabet = serde_json::from_str(data)?;
        Self::build(raw)
    }

    fn build(raw: RawAlphabet) -> Result<Self> {
        let groups = UthmaniGroups::derive(&raw.uthmani);

        let core: HashSet<&str> = raw.phonetics.core().into_iter().collect();
        if core.iter().any(|s| s.chars().count() != 1) {
            return Err(QuranError::InvalidAlphabet(
                "phonetic symbols must be single characters".into(),
            ));
        }
        for (name, members) in raw.phonetic_groups.all() {
            let mut buf = [0u8; 4];
            if let Some(c) = members.chars().find(|c| !core.contains(&*c.encode_utf8(&mut buf))) {
                return Err(QuranError::InvalidAlphabet(format!(
                    "group `{name}` contains `{c}` which is not a phonetic symbol"
                )));
            }
        }

        for d in &raw.disassembly {
            if d.opening.is_empty() || d.pronunciation.is_empty() {
                return Err(QuranError::InvalidAlphabet("empty disassembly entry".into()));
            }
        }

        for p in &raw.special_patterns {
            if p.pattern.is_empty() {
                return Err(QuranError::InvalidAlphabet("empty special pattern".into()));
            }
            match (&p.attr_name, &p.target_replacement) {
                (Some(_), None) if !p.options.is_empty() => {}
                (Some(attr), None) => {
                    return Err(QuranError::InvalidAlphabet(format!(
                        "special pattern `{}` names `{attr}` but lists no options",
                        p.pattern
                    )))
                }
                (None, Some(_)) => {}
                _ => {
                    return Err(QuranError::InvalidAlphabet(format!(
                        "special pattern `{}` needs exactly one of attr_name or target_replacement",
                        p.pattern
                    )))
                }
            }
        }

        for entry in &raw.unique_rasm_map.rasm_map {
            if entry.uthmani.contains(' ') || entry.imlaey.split(' ').count() < 2 {
                return Err(QuranError::InvalidAlphabet(format!(
                    "rasm entry `{}` must map several imlaey words to one uthmani word",
                    entry.imlaey
                )));
            }
        }

        Ok(Self {
            uthmani: raw.uthmani,
            groups,
            imlaey: raw.imlaey,
            phonetics: raw.phonetics,
            phonetic_groups: raw.phonetic_groups,
            disassembly: raw.disassembly,
            special_patterns: raw.special_patterns,
            unique_rasm: raw.unique_rasm_map,
            istiaatha: raw.istiaatha,
            bismillah: raw.bismillah,
            sadaka: raw.sadaka,
        })
    }
}
