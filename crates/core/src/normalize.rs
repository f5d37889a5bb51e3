//! Imlaey text normalization for matching.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::error::{QuranError, Result};

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static pattern");
}

/// Filters applied by [`normalize_aya`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub remove_spaces: bool,
    /// Every hamza form becomes the bare hamza.
    pub ignore_hamazat: bool,
    /// Alif maksura becomes alif.
    pub ignore_alef_maksoora: bool,
    /// Taa marbuta becomes haa.
    pub ignore_taa_marboota: bool,
    /// Taa marbuta becomes taa.
    pub normalize_taat: bool,
    pub remove_small_alef: bool,
    pub remove_tashkeel: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            remove_spaces: true,
            ignore_hamazat: false,
            ignore_alef_maksoora: true,
            ignore_taa_marboota: false,
            normalize_taat: false,
            remove_small_alef: true,
            remove_tashkeel: false,
        }
    }
}

impl NormalizeOptions {
    pub fn with_spaces(mut self, keep: bool) -> Self {
        self.remove_spaces = !keep;
        self
    }
}

fn replace_any(text: &str, set: &str, with: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if set.contains(c) {
            out.push_str(with);
        } else {
            out.push(c);
        }
    }
    out
}

/// Apply `options` to Imlaey `text`.
pub fn normalize_aya(text: &str, options: &NormalizeOptions, alphabet: &Alphabet) -> Result<String> {
    if options.ignore_taa_marboota && options.normalize_taat {
        return Err(QuranError::InvalidOptions(
            "ignore_taa_marboota and normalize_taat cannot both be set".into(),
        ));
    }
    let imlaey = &alphabet.imlaey;
    let mut text = if options.remove_spaces {
        WHITESPACE.replace_all(text, "").into_owned()
    } else {
        text.to_string()
    };

    if options.ignore_alef_maksoora {
        text = text.replace(imlaey.alef_maksoora.as_str(), &imlaey.alef);
    }
    if options.ignore_hamazat {
        text = replace_any(&text, &imlaey.hamazat, &imlaey.hamza);
    }
    if options.ignore_taa_marboota {
        text = replace_any(&text, &imlaey.taa_marboota, &imlaey.haa);
    }
    if options.normalize_taat {
        text = replace_any(&text, &imlaey.taa_marboota, &imlaey.taa_mabsoota);
    }
    if options.remove_small_alef {
        text = text.replace(imlaey.small_alef.as_str(), "");
    }
    if options.remove_tashkeel {
        text = replace_any(&text, &imlaey.tashkeel, "");
    }
    Ok(text)
}
