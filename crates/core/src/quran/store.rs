//! The verse store: both scripts of every verse, addressed by 1-based
//! `(sura, aya)` indices.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{QuranError, Result};

pub const NUM_SURAS: usize = 114;

/// One verse in both scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(rename = "@uthmani")]
    pub uthmani: String,
    #[serde(rename = "@imlaey")]
    pub imlaey: String,
    /// Bismillah read before this verse, only on the first verse of a sura.
    #[serde(rename = "@bismillah_uthmani", default, skip_serializing_if = "Option::is_none")]
    pub bismillah_uthmani: Option<String>,
    #[serde(rename = "@bismillah_imlaey", default, skip_serializing_if = "Option::is_none")]
    pub bismillah_imlaey: Option<String>,
}

impl Verse {
    pub fn new(uthmani: &str, imlaey: &str) -> Self {
        Self {
            uthmani: uthmani.to_string(),
            imlaey: imlaey.to_string(),
            bismillah_uthmani: None,
            bismillah_imlaey: None,
        }
    }

    pub fn with_bismillah(mut self, uthmani: &str, imlaey: &str) -> Self {
        self.bismillah_uthmani = Some(uthmani.to_string());
        self.bismillah_imlaey = Some(imlaey.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sura {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "aya")]
    pub verses: Vec<Verse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawQuran {
    sura: Vec<Sura>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDocument {
    quran: RawQuran,
}

/// The whole canon, read-only once built.
#[derive(Debug, Clone)]
pub struct QuranStore {
    suras: Vec<Sura>,
}

impl QuranStore {
    /// Build a store from 114 non-empty suras.
    pub fn from_suras(suras: Vec<Sura>) -> Result<Self> {
        if suras.len() != NUM_SURAS {
            return Err(QuranError::InvalidStore(format!(
                "expected {NUM_SURAS} suras, found {}",
                suras.len()
            )));
        }
        if let Some(idx) = suras.iter().position(|s| s.verses.is_empty()) {
            return Err(QuranError::InvalidStore(format!("sura {} has no verses", idx + 1)));
        }
        Ok(Self { suras })
    }

    /// Parse the merged Tanzil document.
    pub fn from_json(data: &str) -> Result<Self> {
        let doc: RawDocument = serde_json::from_str(data)?;
        Self::from_suras(doc.quran.sura)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading verse store {}", path.display()))?;
        let store = Self::from_json(&data)
            .with_context(|| format!("parsing verse store {}", path.display()))?;
        log::info!("Loaded {} verses from {}", store.total_verses(), path.display());
        Ok(store)
    }

    pub fn to_json(&self) -> Result<String> {
        let doc = RawDocument {
            quran: RawQuran {
                sura: self.suras.clone(),
            },
        };
        Ok(serde_json::to_string(&doc)?)
    }

    pub fn num_suras(&self) -> usize {
        self.suras.len()
    }

    /// Verse count of `sura`, or 0 for an invalid index.
    pub(crate) fn sura_len(&self, sura: usize) -> usize {
        sura.checked_sub(1)
            .and_then(|i| self.suras.get(i))
            .map_or(0, |s| s.verses.len())
    }

    pub fn num_ayat(&self, sura: usize) -> Result<usize> {
        match self.sura_len(sura) {
            0 => Err(QuranError::IndexOutOfRange {
                sura,
                aya: 0,
                num_ayat: 0,
            }),
            n => Ok(n),
        }
    }

    pub fn sura_name(&self, sura: usize) -> Result<&str> {
        self.num_ayat(sura)?;
        Ok(&self.suras[sura - 1].name)
    }

    pub fn verse(&self, sura: usize, aya: usize) -> Result<&Verse> {
        let num_ayat = self.sura_len(sura);
        if aya == 0 || aya > num_ayat {
            return Err(QuranError::IndexOutOfRange {
                sura,
                aya,
                num_ayat,
            });
        }
        Ok(&self.suras[sura - 1].verses[aya - 1])
    }

    pub fn total_verses(&self) -> usize {
        self.suras.iter().map(|s| s.verses.len()).sum()
    }

    /// Zero-based position of a valid `(sura, aya)` in canonical order.
    pub(crate) fn ordinal(&self, sura: usize, aya: usize) -> usize {
        self.suras[..sura - 1]
            .iter()
            .map(|s| s.verses.len())
            .sum::<usize>()
            + aya
            - 1
    }

    /// Inverse of [`Self::ordinal`], wrapping around the canon.
    pub(crate) fn locate(&self, ordinal: usize) -> (usize, usize) {
        let mut rest = ordinal % self.total_verses();
        for (idx, sura) in self.suras.iter().enumerate() {
            if rest < sura.verses.len() {
                return (idx + 1, rest + 1);
            }
            rest -= sura.verses.len();
        }
        (NUM_SURAS, self.sura_len(NUM_SURAS))
    }

    /// Every verse in canonical order with its indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Verse)> {
        self.suras.iter().enumerate().flat_map(|(s, sura)| {
            sura.verses
                .iter()
                .enumerate()
                .map(move |(a, verse)| (s + 1, a + 1, verse))
        })
    }
}
