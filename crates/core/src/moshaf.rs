//! Moshaf attributes: the recitation-style profile a transcription follows.
//!
//! Field names and option strings are the vocabulary the special-pattern
//! table refers to, so both are validated eagerly: an unknown attribute or
//! option is a configuration error, never a silent no-op.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alphabet::SpecialPattern;
use crate::error::{QuranError, Result};

macro_rules! moshaf_option {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const OPTIONS: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
    };
}

moshaf_option!(Rewaya { Hafs => "hafs" });
moshaf_option!(
    /// Whether a sakin noon is merged into the following letter.
    IzharOrIdgham { Izhar => "izhar", Idgham => "idgham" }
);
moshaf_option!(SeenOrSaad { Seen => "seen", Saad => "saad" });
moshaf_option!(IshmamOrRawm { Ishmam => "ishmam", Rawm => "rawm" });
moshaf_option!(
    /// Pausal treatment of a written trailing alif.
    AlifOrSukoon { Alif => "alif", Sukoon => "sukoon" }
);

const MONFASEL_LENS: &[u8] = &[2, 3, 4, 5];
const MOTTASEL_LENS: &[u8] = &[4, 5, 6];
const AARED_LENS: &[u8] = &[2, 4, 6];
const GHONNA_LENS: &[u8] = &[2, 3];

/// A recitation profile. Every field has a Hafs default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoshafAttributes {
    pub rewaya: Rewaya,
    /// Madd letter at a word end followed by a hamza opening the next word.
    pub madd_monfasel_len: u8,
    /// Madd letter followed by a hamza in the same word.
    pub madd_mottasel_len: u8,
    /// Mottasel madd when the hamza is the last sound of the recitation.
    pub madd_mottasel_waqf: u8,
    /// Madd letter before a consonant made sakin by the pause.
    pub madd_aared_len: u8,
    /// Repeats of a concealed (ikhfaa/iqlab) or geminated nasal.
    pub ikhfaa_ghonna_len: u8,
    /// Repeats of a noon partially assimilated into yaa or waw.
    pub idgham_ghonna_len: u8,
    pub noon_and_yaseen: IzharOrIdgham,
    pub yabsut: SeenOrSaad,
    pub bastah: SeenOrSaad,
    pub almusaytirun: SeenOrSaad,
    pub bimusaytir: SeenOrSaad,
    pub irkab_maana: IzharOrIdgham,
    pub yalhath_dhalik: IzharOrIdgham,
    pub noon_tamnna: IshmamOrRawm,
    pub alif_salasila: AlifOrSukoon,
}

impl Default for MoshafAttributes {
    fn default() -> Self {
        Self {
            rewaya: Rewaya::Hafs,
            madd_monfasel_len: 4,
            madd_mottasel_len: 4,
            madd_mottasel_waqf: 4,
            madd_aared_len: 4,
            ikhfaa_ghonna_len: 3,
            idgham_ghonna_len: 2,
            noon_and_yaseen: IzharOrIdgham::Izhar,
            yabsut: SeenOrSaad::Seen,
            bastah: SeenOrSaad::Seen,
            almusaytirun: SeenOrSaad::Saad,
            bimusaytir: SeenOrSaad::Saad,
            irkab_maana: IzharOrIdgham::Idgham,
            yalhath_dhalik: IzharOrIdgham::Idgham,
            noon_tamnna: IshmamOrRawm::Ishmam,
            alif_salasila: AlifOrSukoon::Alif,
        }
    }
}

fn numeric_options(lens: &[u8]) -> Vec<String> {
    lens.iter().map(|l| l.to_string()).collect()
}

fn static_options(options: &[&str]) -> Vec<String> {
    options.iter().map(|o| o.to_string()).collect()
}

impl MoshafAttributes {
    /// Load a profile from a JSON file and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let moshaf: Self = serde_json::from_str(&data)?;
        moshaf.validate()?;
        Ok(moshaf)
    }

    /// The option strings `name` may take.
    pub fn options(name: &str) -> Result<Vec<String>> {
        let options = match name {
            "rewaya" => static_options(Rewaya::OPTIONS),
            "madd_monfasel_len" => numeric_options(MONFASEL_LENS),
            "madd_mottasel_len" | "madd_mottasel_waqf" => numeric_options(MOTTASEL_LENS),
            "madd_aared_len" => numeric_options(AARED_LENS),
            "ikhfaa_ghonna_len" | "idgham_ghonna_len" => numeric_options(GHONNA_LENS),
            "noon_and_yaseen" | "irkab_maana" | "yalhath_dhalik" => {
                static_options(IzharOrIdgham::OPTIONS)
            }
            "yabsut" | "bastah" | "almusaytirun" | "bimusaytir" => {
                static_options(SeenOrSaad::OPTIONS)
            }
            "noon_tamnna" => static_options(IshmamOrRawm::OPTIONS),
            "alif_salasila" => static_options(AlifOrSukoon::OPTIONS),
            _ => {
                return Err(QuranError::UnknownMoshafAttribute {
                    name: name.to_string(),
                })
            }
        };
        Ok(options)
    }

    /// The current value of `name` as its option string.
    pub fn attribute(&self, name: &str) -> Result<String> {
        let value = match name {
            "rewaya" => self.rewaya.as_str().to_string(),
            "madd_monfasel_len" => self.madd_monfasel_len.to_string(),
            "madd_mottasel_len" => self.madd_mottasel_len.to_string(),
            "madd_mottasel_waqf" => self.madd_mottasel_waqf.to_string(),
            "madd_aared_len" => self.madd_aared_len.to_string(),
            "ikhfaa_ghonna_len" => self.ikhfaa_ghonna_len.to_string(),
            "idgham_ghonna_len" => self.idgham_ghonna_len.to_string(),
            "noon_and_yaseen" => self.noon_and_yaseen.as_str().to_string(),
            "yabsut" => self.yabsut.as_str().to_string(),
            "bastah" => self.bastah.as_str().to_string(),
            "almusaytirun" => self.almusaytirun.as_str().to_string(),
            "bimusaytir" => self.bimusaytir.as_str().to_string(),
            "irkab_maana" => self.irkab_maana.as_str().to_string(),
            "yalhath_dhalik" => self.yalhath_dhalik.as_str().to_string(),
            "noon_tamnna" => self.noon_tamnna.as_str().to_string(),
            "alif_salasila" => self.alif_salasila.as_str().to_string(),
            _ => {
                return Err(QuranError::UnknownMoshafAttribute {
                    name: name.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// Check the numeric fields against their advertised options.
    pub fn validate(&self) -> Result<()> {
        for name in [
            "madd_monfasel_len",
            "madd_mottasel_len",
            "madd_mottasel_waqf",
            "madd_aared_len",
            "ikhfaa_ghonna_len",
            "idgham_ghonna_len",
        ] {
            let value = self.attribute(name)?;
            if !Self::options(name)?.contains(&value) {
                return Err(QuranError::UnknownMoshafOption {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Check that every attribute-driven special pattern refers to a real
    /// attribute, lists only advertised options and covers the current value.
    pub fn check_special_patterns(&self, patterns: &[SpecialPattern]) -> Result<()> {
        for pattern in patterns {
            let Some(name) = &pattern.attr_name else {
                continue;
            };
            let advertised = Self::options(name)?;
            if let Some(bad) = pattern.options.keys().find(|k| !advertised.contains(*k)) {
                return Err(QuranError::UnknownMoshafOption {
                    name: name.clone(),
                    value: bad.clone(),
                });
            }
            let value = self.attribute(name)?;
            if !pattern.options.contains_key(&value) {
                return Err(QuranError::UnknownMoshafOption {
                    name: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let moshaf = MoshafAttributes::default();
        moshaf.validate().unwrap();
        assert_eq!(moshaf.attribute("madd_monfasel_len").unwrap(), "4");
        assert_eq!(moshaf.attribute("yabsut").unwrap(), "seen");
    }

    #[test]
    fn test_unknown_attribute() {
        let moshaf = MoshafAttributes::default();
        assert!(matches!(
            moshaf.attribute("sakt_iwaja"),
            Err(QuranError::UnknownMoshafAttribute { .. })
        ));
    }

    #[test]
    fn test_out_of_range_length() {
        let moshaf = MoshafAttributes {
            madd_mottasel_len: 2,
            ..Default::default()
        };
        assert!(matches!(
            moshaf.validate(),
            Err(QuranError::UnknownMoshafOption { .. })
        ));
    }

    #[test]
    fn test_builtin_patterns_are_consistent() {
        let alph = alphabet::builtin().unwrap();
        let moshaf = MoshafAttributes {
            noon_and_yaseen: IzharOrIdgham::Idgham,
            almusaytirun: SeenOrSaad::Seen,
            ..Default::default()
        };
        moshaf.check_special_patterns(&alph.special_patterns).unwrap();
    }

    #[test]
    fn test_pattern_with_unknown_attribute_fails() {
        let mut patterns = alphabet::builtin().unwrap().special_patterns.clone();
        patterns[0].attr_name = Some("no_such_attr".into());
        let moshaf = MoshafAttributes::default();
        assert!(moshaf.check_special_patterns(&patterns).is_err());
    }

    #[test]
    fn test_from_path_partial_and_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"madd_monfasel_len": 2, "yabsut": "saad"}}"#).unwrap();
        let moshaf = MoshafAttributes::from_path(file.path()).unwrap();
        assert_eq!(moshaf.madd_monfasel_len, 2);
        assert_eq!(moshaf.yabsut, SeenOrSaad::Saad);
        assert_eq!(moshaf.madd_aared_len, 4);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, r#"{{"sakt_iwaja": "sakt"}}"#).unwrap();
        assert!(matches!(
            MoshafAttributes::from_path(bad.path()),
            Err(QuranError::Json(_))
        ));
    }
}
