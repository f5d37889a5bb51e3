//! Articulatory features (sifat) of each phoneme chunk.
//!
//! The phoneme string is cut into chunks: a run of one repeated core symbol
//! plus at most one trailing short vowel. Every trait is a pure function of
//! the chunk's leading symbol except emphasis, which for raa, lam, alif and
//! the concealed nasals also reads the neighbouring chunks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::alphabet::{glyph, Alphabet};
use crate::error::{QuranError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HamsOrJahr {
    /// Voiceless.
    Hams,
    /// Voiced.
    Jahr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiddaOrRakhawa {
    /// Stop.
    Shadeed,
    Between,
    /// Fricative.
    Rikhw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TafkheemOrTaqeeq {
    /// Emphatic.
    Mofakham,
    /// Plain.
    Moraqaq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Itbaq {
    Motbaq,
    Monfateh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Safeer {
    Safeer,
    NoSafeer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qalqla {
    Moqalqal,
    NotMoqalqal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tikraar {
    Mokarar,
    NotMokarar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tafashie {
    Motafashie,
    NotMotafashie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Istitala {
    Mostateel,
    NotMostateel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ghonna {
    Maghnoon,
    NotMaghnoon,
}

/// Features of one phoneme chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SifaResult {
    /// The chunk text: repeated core symbol plus optional short vowel.
    pub phonemes: String,
    pub hams_or_jahr: HamsOrJahr,
    pub shidda_or_rakhawa: ShiddaOrRakhawa,
    pub tafkheem_or_taqeeq: TafkheemOrTaqeeq,
    pub itbaq: Itbaq,
    pub safeer: Safeer,
    pub qalqla: Qalqla,
    pub tikraar: Tikraar,
    pub tafashie: Tafashie,
    pub istitala: Istitala,
    pub ghonna: Ghonna,
}

/// Lam and alif runs of the name of Allah, located before chunking.
#[derive(Debug, Clone, Copy)]
struct AllahSpan {
    lam: usize,
    alif: usize,
    emphasis: TafkheemOrTaqeeq,
}

pub struct SifaClassifier {
    chunk: regex::Regex,
    allah: fancy_regex::Regex,
    residuals: HashSet<char>,
    kasra: char,
    raa: char,
    lam: char,
    alif: char,
    noon_mokhfah: char,
    meem_mokhfah: char,
    hams: HashSet<char>,
    shidda: HashSet<char>,
    between: HashSet<char>,
    tafkheem: HashSet<char>,
    itbaq: HashSet<char>,
    safeer: HashSet<char>,
    qalqla: HashSet<char>,
    tikrar: HashSet<char>,
    tafashie: HashSet<char>,
    istitala: HashSet<char>,
    ghonna: HashSet<char>,
}

fn set(group: &str) -> HashSet<char> {
    group.chars().collect()
}

impl SifaClassifier {
    pub fn new(alphabet: &Alphabet) -> Result<Self> {
        let ph = &alphabet.phonetics;
        let groups = &alphabet.phonetic_groups;
        let residuals = ph.residuals();

        let runs: Vec<String> = ph
            .core()
            .iter()
            .map(|s| format!("{}+", regex::escape(s)))
            .collect();
        let chunk_pattern = format!("(?:{})[{}]?", runs.join("|"), residuals);
        let chunk = regex::Regex::new(&chunk_pattern)
            .map_err(|e| QuranError::InvalidAlphabet(e.to_string()))?;

        let allah_pattern = format!(
            "(?<!{kaf}{fatha})(?<!{hamza}{kasra})(?<!{haa}{fatha})({lam}{lam}+{fatha})({alif}+)(?={haa}(?!{damma}{meem}(?!{meem})))",
            kaf = ph.kaf,
            fatha = ph.fatha,
            hamza = ph.hamza,
            kasra = ph.kasra,
            haa = ph.haa,
            lam = ph.lam,
            alif = ph.alif,
            damma = ph.damma,
            meem = ph.meem,
        );
        let allah = fancy_regex::Regex::new(&allah_pattern).map_err(|e| QuranError::InvalidRule {
            operation: "Sifa",
            pattern: allah_pattern.clone(),
            source: Box::new(e),
        })?;

        Ok(Self {
            chunk,
            allah,
            residuals: set(&residuals),
            kasra: glyph(&ph.kasra)?,
            raa: glyph(&ph.raa)?,
            lam: glyph(&ph.lam)?,
            alif: glyph(&ph.alif)?,
            noon_mokhfah: glyph(&ph.noon_mokhfah)?,
            meem_mokhfah: glyph(&ph.meem_mokhfah)?,
            hams: set(&groups.hams),
            shidda: set(&groups.shidda),
            between: set(&groups.between_shidda_rakhawa),
            tafkheem: set(&groups.tafkheem),
            itbaq: set(&groups.itbaq),
            safeer: set(&groups.safeer),
            qalqla: set(&groups.qalqla),
            tikrar: set(&groups.tikrar),
            tafashie: set(&groups.tafashie),
            istitala: set(&groups.istitala),
            ghonna: set(&groups.ghonna),
        })
    }

    /// Locate every name of Allah. Offsets are bytes in the space-free text.
    fn allah_spans(&self, phonemes: &str) -> Result<Vec<AllahSpan>> {
        let mut spans = Vec::new();
        for caps in self.allah.captures_iter(phonemes) {
            let caps = caps?;
            let (Some(lam), Some(alif)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let before = phonemes[..lam.start()].chars().rev().find(|c| !c.is_whitespace());
            let emphasis = if before == Some(self.kasra) {
                TafkheemOrTaqeeq::Moraqaq
            } else {
                TafkheemOrTaqeeq::Mofakham
            };
            let spaces = |pos: usize| phonemes[..pos].chars().filter(|c| c.is_whitespace()).count();
            spans.push(AllahSpan {
                lam: lam.start() - spaces(lam.start()),
                alif: alif.start() - spaces(alif.start()),
                emphasis,
            });
        }
        Ok(spans)
    }

    /// Split a space-free phoneme string into chunks with byte offsets.
    fn chunks<'t>(&self, text: &'t str) -> Result<Vec<(usize, &'t str)>> {
        let mut chunks = Vec::new();
        let mut pos = 0;
        for m in self.chunk.find_iter(text) {
            if m.start() != pos {
                break;
            }
            chunks.push((m.start(), m.as_str()));
            pos = m.end();
        }
        if pos != text.len() {
            let position = text[..pos].chars().count();
            let symbol = text[pos..].chars().next().unwrap_or_default();
            return Err(QuranError::UnknownPhoneme { symbol, position });
        }
        Ok(chunks)
    }

    /// Features for every chunk of `phonemes`. Spaces are ignored.
    pub fn classify(&self, phonemes: &str) -> Result<Vec<SifaResult>> {
        let allah = self.allah_spans(phonemes)?;
        let text: String = phonemes.chars().filter(|c| !c.is_whitespace()).collect();
        let chunks = self.chunks(&text)?;

        let mut matched = 0;
        let mut results = Vec::with_capacity(chunks.len());
        for (i, &(start, chunk)) in chunks.iter().enumerate() {
            let lead = chunk.chars().next().unwrap_or_default();
            let last = chunk.chars().last().unwrap_or_default();
            let has_residual = chunk.chars().count() > 1 && self.residuals.contains(&last);

            let in_allah = allah
                .iter()
                .find(|s| (lead == self.lam && s.lam == start) || (lead == self.alif && s.alif == start));
            if in_allah.is_some() {
                matched += 1;
            }

            let lead_of = |j: usize| chunks.get(j).and_then(|(_, c)| c.chars().next());
            let emphasis = match in_allah {
                Some(span) => span.emphasis,
                None => self.emphasis(lead, last, has_residual, i, &chunks, &lead_of)?,
            };

            results.push(self.describe(chunk, lead, has_residual, emphasis));
        }

        if matched != allah.len() * 2 {
            return Err(QuranError::SifaMismatch {
                kind: "lam",
                expected: allah.len() * 2,
                found: matched,
            });
        }
        Ok(results)
    }

    fn emphasis(
        &self,
        lead: char,
        last: char,
        has_residual: bool,
        i: usize,
        chunks: &[(usize, &str)],
        lead_of: &dyn Fn(usize) -> Option<char>,
    ) -> Result<TafkheemOrTaqeeq> {
        let emphatic = |c: Option<char>| {
            if c.is_some_and(|c| self.tafkheem.contains(&c)) {
                TafkheemOrTaqeeq::Mofakham
            } else {
                TafkheemOrTaqeeq::Moraqaq
            }
        };
        Ok(if self.tafkheem.contains(&lead) {
            TafkheemOrTaqeeq::Mofakham
        } else if lead == self.raa {
            // A sakin raa takes its colour from the vowel before it.
            let vowel = if has_residual {
                Some(last)
            } else {
                i.checked_sub(1)
                    .and_then(|j| chunks.get(j))
                    .and_then(|(_, c)| c.chars().last())
            };
            if vowel == Some(self.kasra) {
                TafkheemOrTaqeeq::Moraqaq
            } else {
                TafkheemOrTaqeeq::Mofakham
            }
        } else if lead == self.alif {
            if i == 0 {
                return Err(QuranError::LeadingAlif);
            }
            emphatic(lead_of(i - 1))
        } else if lead == self.noon_mokhfah || lead == self.meem_mokhfah {
            emphatic(lead_of(i + 1))
        } else {
            TafkheemOrTaqeeq::Moraqaq
        })
    }

    fn describe(
        &self,
        chunk: &str,
        lead: char,
        has_residual: bool,
        emphasis: TafkheemOrTaqeeq,
    ) -> SifaResult {
        SifaResult {
            phonemes: chunk.to_string(),
            hams_or_jahr: if self.hams.contains(&lead) {
                HamsOrJahr::Hams
            } else {
                HamsOrJahr::Jahr
            },
            shidda_or_rakhawa: if self.shidda.contains(&lead) {
                ShiddaOrRakhawa::Shadeed
            } else if self.between.contains(&lead) {
                ShiddaOrRakhawa::Between
            } else {
                ShiddaOrRakhawa::Rikhw
            },
            tafkheem_or_taqeeq: emphasis,
            itbaq: if self.itbaq.contains(&lead) {
                Itbaq::Motbaq
            } else {
                Itbaq::Monfateh
            },
            safeer: if self.safeer.contains(&lead) {
                Safeer::Safeer
            } else {
                Safeer::NoSafeer
            },
            qalqla: if self.qalqla.contains(&lead) && !has_residual {
                Qalqla::Moqalqal
            } else {
                Qalqla::NotMoqalqal
            },
            tikraar: if self.tikrar.contains(&lead) {
                Tikraar::Mokarar
            } else {
                Tikraar::NotMokarar
            },
            tafashie: if self.tafashie.contains(&lead) {
                Tafashie::Motafashie
            } else {
                Tafashie::NotMotafashie
            },
            istitala: if self.istitala.contains(&lead) {
                Istitala::Mostateel
            } else {
                Istitala::NotMostateel
            },
            ghonna: if self.ghonna.contains(&lead) {
                Ghonna::Maghnoon
            } else {
                Ghonna::NotMaghnoon
            },
        }
    }
}
