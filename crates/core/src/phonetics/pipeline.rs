//! The phonetic pipeline driver: runs the catalog in order over one verse,
//! tracking provenance, then classifies the phoneme chunks.

use std::sync::OnceLock;

use crate::alphabet::{self, Alphabet};
use crate::error::{QuranError, Result};
use crate::moshaf::MoshafAttributes;
use crate::phonetics::operation::Mode;
use crate::phonetics::operations::OperationCatalog;
use crate::phonetics::provenance;
use crate::phonetics::sifa::SifaClassifier;
use crate::types::PhoneticOutput;

/// A built pipeline. Construction compiles every rule once.
pub struct Phonetizer<'a> {
    alphabet: &'a Alphabet,
    catalog: OperationCatalog,
    sifa: SifaClassifier,
}

impl<'a> Phonetizer<'a> {
    pub fn new(alphabet: &'a Alphabet) -> Result<Self> {
        Ok(Self {
            alphabet,
            catalog: OperationCatalog::new(alphabet)?,
            sifa: SifaClassifier::new(alphabet)?,
        })
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Transcribe one verse of Uthmani text.
    pub fn phonetize(
        &self,
        uthmani: &str,
        moshaf: &MoshafAttributes,
        remove_spaces: bool,
    ) -> Result<PhoneticOutput> {
        moshaf.validate()?;
        moshaf.check_special_patterns(&self.alphabet.special_patterns)?;

        let offset = uthmani.len() - uthmani.trim_start().len();
        let offset = uthmani[..offset].chars().count();
        let mut text = uthmani.trim().to_string();
        let mut chars: Vec<char> = text.chars().collect();
        let mut char_map: Vec<Option<usize>> = (offset..offset + chars.len()).map(Some).collect();

        for op in self.catalog.iter() {
            let next = op.apply(&text, moshaf, Mode::Inference)?;
            if next != text {
                let next_chars: Vec<char> = next.chars().collect();
                char_map = provenance::remap(&chars, &next_chars, &char_map);
                log::debug!("{}: {}", op.name(), next);
                chars = next_chars;
                text = next;
            }
        }

        let sifat = self.sifa.classify(&text)?;
        let (phonemes, char_map) = if remove_spaces {
            provenance::strip_spaces(&text, &char_map)
        } else {
            (text, char_map)
        };
        Ok(PhoneticOutput {
            phonemes,
            sifat,
            char_map,
        })
    }
}

static DEFAULT: OnceLock<std::result::Result<Phonetizer<'static>, String>> = OnceLock::new();

fn default_phonetizer() -> Result<&'static Phonetizer<'static>> {
    DEFAULT
        .get_or_init(|| {
            alphabet::builtin()
                .and_then(Phonetizer::new)
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| QuranError::InvalidAlphabet(e.clone()))
}

/// Transcribe `uthmani` with the built-in alphabet.
pub fn quran_phonetizer(
    uthmani: &str,
    moshaf: &MoshafAttributes,
    remove_spaces: bool,
) -> Result<PhoneticOutput> {
    default_phonetizer()?.phonetize(uthmani, moshaf, remove_spaces)
}
