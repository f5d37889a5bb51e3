//! Quran transcript core: Uthmani to phonetic transcription, Imlaey to
//! Uthmani word alignment, windowed verse slicing and recitation matching.

pub mod alphabet;
pub mod error;
pub mod moshaf;
pub mod normalize;
pub mod phonetics;
pub mod quran;
pub mod search;
pub mod tasmeea;
pub mod types;

pub use error::{QuranError, Result};
pub use moshaf::MoshafAttributes;
pub use phonetics::quran_phonetizer;
