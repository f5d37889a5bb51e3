//! Error types shared by the phonetic pipeline and the verse aligner.

use thiserror::Error;

/// Everything the library can fail with.
#[derive(Debug, Error)]
pub enum QuranError {
    #[error("unknown moshaf attribute `{name}`")]
    UnknownMoshafAttribute { name: String },

    #[error("moshaf attribute `{name}` has no option `{value}`")]
    UnknownMoshafOption { name: String, value: String },

    #[error("invalid alphabet table: {0}")]
    InvalidAlphabet(String),

    #[error("operation `{operation}` has an invalid pattern `{pattern}`: {source}")]
    InvalidRule {
        operation: &'static str,
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    /// A requested Imlaey span cuts through a many-to-one word group.
    #[error("imlaey words [{start}, {end}) split an uthmani word")]
    PartOfUthmaniWord { start: usize, end: usize },

    #[error("index out of range: sura={sura} aya={aya} (sura has {num_ayat} ayat)")]
    IndexOutOfRange { sura: usize, aya: usize, num_ayat: usize },

    #[error("invalid word span [{start}, {end}) for {len} words")]
    InvalidWordSpan { start: usize, end: usize, len: usize },

    #[error("{kind} emphasis scan found {expected} occurrences but chunking produced {found}")]
    SifaMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("alif cannot open a phonetic script")]
    LeadingAlif,

    #[error("`{symbol}` at position {position} is not a phonetic symbol")]
    UnknownPhoneme { symbol: char, position: usize },

    #[error("could not align {imlaey} imlaey words onto {uthmani} uthmani words")]
    AlignmentMismatch { imlaey: usize, uthmani: usize },

    #[error("invalid verse store: {0}")]
    InvalidStore(String),

    #[error("invalid option combination: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuranError>;
