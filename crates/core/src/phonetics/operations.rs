//! The operation catalog: every rewrite step from Uthmani script to phonemes,
//! in pipeline order.
//!
//! Regex-only steps are [`RegexOperation`]s whose rules are built from the
//! alphabet's named glyphs. Table lookups and moshaf-dependent lengths get
//! their own types below.
//!
//! Uthmani text orders marks as letter, haraka, shadda, so the rules that
//! look for a geminated letter accept an optional haraka before the shadda.

use std::collections::HashSet;
use std::sync::Arc;

use fancy_regex::Regex;

use crate::alphabet::{glyph, Alphabet, Anchor, Disassembly, SpecialPattern};
use crate::error::{QuranError, Result};
use crate::moshaf::MoshafAttributes;
use crate::phonetics::operation::{ConversionOperation, RegexOperation};

type Op = Arc<dyn ConversionOperation>;

fn rule(pattern: String, replacement: String) -> (String, String) {
    (pattern, replacement)
}

fn compile(operation: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| QuranError::InvalidRule {
        operation,
        pattern: pattern.to_string(),
        source: Box::new(e),
    })
}

// ─── Table-driven operations ─────────────────────────────────────────────

/// Expands an abbreviated sura opening at the start of the text.
pub struct DisassembleOpenings {
    entries: Vec<Disassembly>,
}

impl DisassembleOpenings {
    pub fn new(alphabet: &Alphabet) -> Self {
        let mut entries = alphabet.disassembly.clone();
        entries.sort_by_key(|d| std::cmp::Reverse(d.opening.chars().count()));
        Self { entries }
    }
}

impl ConversionOperation for DisassembleOpenings {
    fn name(&self) -> &'static str {
        "DisassembleOpenings"
    }

    fn prerequisites(&self) -> &[Op] {
        &[]
    }

    fn forward(&self, text: &str, _moshaf: &MoshafAttributes) -> Result<String> {
        for entry in &self.entries {
            if let Some(rest) = text.strip_prefix(entry.opening.as_str()) {
                if rest.is_empty() || rest.starts_with(' ') {
                    log::debug!("expanding opening {}", entry.opening);
                    return Ok(format!("{}{}", entry.pronunciation, rest));
                }
            }
        }
        Ok(text.to_string())
    }
}

/// Substitutes verse-specific readings chosen by the moshaf.
pub struct SpecialPatterns {
    patterns: Vec<SpecialPattern>,
    prerequisites: Vec<Op>,
}

impl SpecialPatterns {
    pub fn new(alphabet: &Alphabet, prerequisites: Vec<Op>) -> Self {
        Self {
            patterns: alphabet.special_patterns.clone(),
            prerequisites,
        }
    }

    fn target(pattern: &SpecialPattern, moshaf: &MoshafAttributes) -> Result<String> {
        match (&pattern.attr_name, &pattern.target_replacement) {
            (Some(name), _) => {
                let value = moshaf.attribute(name)?;
                pattern
                    .options
                    .get(&value)
                    .cloned()
                    .ok_or_else(|| QuranError::UnknownMoshafOption {
                        name: name.clone(),
                        value,
                    })
            }
            (None, Some(target)) => Ok(target.clone()),
            (None, None) => Err(QuranError::InvalidAlphabet(format!(
                "special pattern `{}` has no replacement",
                pattern.pattern
            ))),
        }
    }
}

impl ConversionOperation for SpecialPatterns {
    fn name(&self) -> &'static str {
        "SpecialPatterns"
    }

    fn prerequisites(&self) -> &[Op] {
        &self.prerequisites
    }

    fn forward(&self, text: &str, moshaf: &MoshafAttributes) -> Result<String> {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            if !out.contains(pattern.pattern.as_str()) {
                continue;
            }
            let target = Self::target(pattern, moshaf)?;
            match pattern.anchor {
                Anchor::Start => {
                    if let Some(rest) = out.strip_prefix(pattern.pattern.as_str()) {
                        out = format!("{target}{rest}");
                    }
                }
                Anchor::End => {
                    if let Some(head) = out.strip_suffix(pattern.pattern.as_str()) {
                        out = format!("{head}{target}");
                    }
                }
                Anchor::Middle => out = out.replace(pattern.pattern.as_str(), &target),
            }
        }
        Ok(out)
    }
}

// ─── Madd ────────────────────────────────────────────────────────────────

/// Shortens madd letters cut by a following sakin and writes every remaining
/// madd out at its moshaf length.
pub struct ResolveMadd {
    shorten: Vec<Regex>,
    fatha: char,
    damma: char,
    kasra: char,
    shadda: char,
    sukoon: char,
    madd: char,
    hamza: char,
    alif: char,
    waw: char,
    yaa: char,
    waw_madd: char,
    yaa_madd: char,
    noon_mokhfah: char,
    letters: HashSet<char>,
    marks: HashSet<char>,
    prerequisites: Vec<Op>,
}

impl ResolveMadd {
    pub fn new(alphabet: &Alphabet, prerequisites: Vec<Op>) -> Result<Self> {
        let u = &alphabet.uthmani;
        let g = &alphabet.groups;
        let cut = format!(
            r"(?=\s[{}](?:{}|[{}]?{}))",
            g.letters, u.sukoon, g.harakat, u.shadda
        );
        let shorten = [
            format!("(?<={}){}{cut}", u.fatha, u.alif),
            format!("(?<={}){}{cut}", u.damma, u.waw),
            format!("(?<={}){}{cut}", u.kasra, u.yaa),
        ]
        .iter()
        .map(|p| compile("ResolveMadd", p))
        .collect::<Result<Vec<_>>>()?;

        let marks = [&u.fatha, &u.damma, &u.kasra, &u.shadda, &u.sukoon, &u.madd]
            .iter()
            .map(|s| glyph(s))
            .collect::<Result<HashSet<_>>>()?;
        Ok(Self {
            shorten,
            fatha: glyph(&u.fatha)?,
            damma: glyph(&u.damma)?,
            kasra: glyph(&u.kasra)?,
            shadda: glyph(&u.shadda)?,
            sukoon: glyph(&u.sukoon)?,
            madd: glyph(&u.madd)?,
            hamza: glyph(&u.hamza)?,
            alif: glyph(&u.alif)?,
            waw: glyph(&u.waw)?,
            yaa: glyph(&u.yaa)?,
            waw_madd: glyph(&alphabet.phonetics.waw_madd)?,
            yaa_madd: glyph(&alphabet.phonetics.yaa_madd)?,
            noon_mokhfah: glyph(&alphabet.phonetics.noon_mokhfah)?,
            letters: g.letters.chars().collect(),
            marks,
            prerequisites,
        })
    }

    /// The vowel carried by the consonant before position `i`.
    fn vowel_before(&self, chars: &[char], i: usize) -> Option<char> {
        let mut k = i.checked_sub(1)?;
        if chars[k] == self.shadda {
            k = k.checked_sub(1)?;
        }
        Some(chars[k])
    }

    /// The output symbol if `chars[i]` is a madd letter.
    fn madd_symbol(&self, chars: &[char], i: usize) -> Option<char> {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let vowel = self.vowel_before(chars, i)?;
        let bare = next.map_or(true, |n| n == self.madd || !self.marks.contains(&n));
        if c == self.alif && vowel == self.fatha && next != Some(self.alif) {
            Some(self.alif)
        } else if c == self.waw && vowel == self.damma && bare && next != Some(c) {
            Some(self.waw_madd)
        } else if c == self.yaa && vowel == self.kasra && bare && next != Some(c) {
            Some(self.yaa_madd)
        } else {
            None
        }
    }

    fn only_marks(&self, rest: &[char]) -> bool {
        rest.iter().all(|c| self.marks.contains(c))
    }

    /// A letter at `k` that carries sukoon or shadda, or a concealed noon.
    fn sakin_or_geminated(&self, chars: &[char], k: usize) -> bool {
        if chars.get(k) == Some(&self.noon_mokhfah) {
            return true;
        }
        if !chars.get(k).is_some_and(|c| self.letters.contains(c)) {
            return false;
        }
        match chars.get(k + 1) {
            Some(&c) if c == self.sukoon || c == self.shadda => true,
            Some(&c) if c == self.fatha || c == self.damma || c == self.kasra => {
                chars.get(k + 2) == Some(&self.shadda)
            }
            None => true,
            _ => false,
        }
    }

    /// Repeats for a madd letter whose trigger context starts at `j`.
    fn length(&self, chars: &[char], j: usize, marked: bool, moshaf: &MoshafAttributes) -> u8 {
        let next = chars.get(j).copied();
        if marked {
            if next == Some(self.hamza) {
                return if self.only_marks(&chars[j + 1..]) {
                    moshaf.madd_mottasel_waqf
                } else {
                    moshaf.madd_mottasel_len
                };
            }
            if next == Some(' ') && chars.get(j + 1) == Some(&self.hamza) {
                return moshaf.madd_monfasel_len;
            }
            let k = if next == Some(' ') { j + 1 } else { j };
            if self.sakin_or_geminated(chars, k) {
                return 6;
            }
            return 2;
        }
        match next {
            Some(c) if self.letters.contains(&c) && self.only_marks(&chars[j + 1..]) => {
                moshaf.madd_aared_len
            }
            _ => 2,
        }
    }
}

impl ConversionOperation for ResolveMadd {
    fn name(&self) -> &'static str {
        "ResolveMadd"
    }

    fn prerequisites(&self) -> &[Op] {
        &self.prerequisites
    }

    fn forward(&self, text: &str, moshaf: &MoshafAttributes) -> Result<String> {
        let mut shortened = text.to_string();
        for regex in &self.shorten {
            shortened = regex.try_replacen(&shortened, 0, "")?.into_owned();
        }

        let chars: Vec<char> = shortened.chars().collect();
        let mut out = String::with_capacity(shortened.len() * 2);
        let mut i = 0;
        while i < chars.len() {
            let Some(symbol) = self.madd_symbol(&chars, i) else {
                if chars[i] != self.madd {
                    out.push(chars[i]);
                }
                i += 1;
                continue;
            };
            let mut j = i + 1;
            let marked = chars.get(j) == Some(&self.madd);
            if marked {
                j += 1;
            }
            let len = self.length(&chars, j, marked, moshaf);
            out.extend(std::iter::repeat(symbol).take(len as usize));
            i = j;
        }
        Ok(out)
    }
}

// ─── Ghonna and gemination ───────────────────────────────────────────────

/// Nasalization lengths, gemination and the final sukoon sweep. Only a lone
/// concealed noon is stretched, so a stretched run stays as it is.
pub struct RealizeGhonna {
    meem_before_baa: Regex,
    noon_before_waw_yaa: Regex,
    noon_before_ikhfaa: Regex,
    geminated_noon: Regex,
    geminated_meem: Regex,
    geminated: Regex,
    sukoon: Regex,
    noon: String,
    meem: String,
    noon_mokhfah: String,
    meem_mokhfah: String,
    prerequisites: Vec<Op>,
}

impl RealizeGhonna {
    pub fn new(alphabet: &Alphabet, prerequisites: Vec<Op>) -> Result<Self> {
        let u = &alphabet.uthmani;
        let g = &alphabet.groups;
        let name = "RealizeGhonna";
        let noon_mokhfah = &alphabet.phonetics.noon_mokhfah;
        Ok(Self {
            meem_before_baa: compile(name, &format!(r"{}{}?(?=\s?{})", u.meem, u.sukoon, u.baa))?,
            noon_before_waw_yaa: compile(
                name,
                &format!(r"(?<!{nm}){nm}(?=\s[{}])", g.idgham_ghonna, nm = noon_mokhfah),
            )?,
            noon_before_ikhfaa: compile(
                name,
                &format!(r"(?<!{nm}){nm}(?=\s?[{}])", g.ikhfaa, nm = noon_mokhfah),
            )?,
            geminated_noon: compile(name, &format!("{}([{}]?){}", u.noon, g.harakat, u.shadda))?,
            geminated_meem: compile(name, &format!("{}([{}]?){}", u.meem, g.harakat, u.shadda))?,
            geminated: compile(name, &format!("([{}])([{}]?){}", g.letters, g.harakat, u.shadda))?,
            sukoon: compile(name, &u.sukoon)?,
            noon: u.noon.clone(),
            meem: u.meem.clone(),
            noon_mokhfah: alphabet.phonetics.noon_mokhfah.clone(),
            meem_mokhfah: alphabet.phonetics.meem_mokhfah.clone(),
            prerequisites,
        })
    }
}

impl ConversionOperation for RealizeGhonna {
    fn name(&self) -> &'static str {
        "RealizeGhonna"
    }

    fn prerequisites(&self) -> &[Op] {
        &self.prerequisites
    }

    fn forward(&self, text: &str, moshaf: &MoshafAttributes) -> Result<String> {
        let ikhfaa = moshaf.ikhfaa_ghonna_len as usize;
        let idgham = moshaf.idgham_ghonna_len as usize;
        let steps: [(&Regex, String); 7] = [
            (&self.meem_before_baa, self.meem_mokhfah.repeat(ikhfaa)),
            (&self.noon_before_waw_yaa, self.noon_mokhfah.repeat(idgham)),
            (&self.noon_before_ikhfaa, self.noon_mokhfah.repeat(ikhfaa)),
            (&self.geminated_noon, format!("{}${{1}}", self.noon.repeat(ikhfaa))),
            (&self.geminated_meem, format!("{}${{1}}", self.meem.repeat(ikhfaa))),
            (&self.geminated, "${1}${1}${2}".to_string()),
            (&self.sukoon, String::new()),
        ];
        let mut out = text.to_string();
        for (regex, replacement) in steps {
            out = regex.try_replacen(&out, 0, replacement.as_str())?.into_owned();
        }
        Ok(out)
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────────

/// All operations in pipeline order, each holding its prerequisites.
pub struct OperationCatalog {
    ops: Vec<Op>,
}

impl OperationCatalog {
    pub fn new(alphabet: &Alphabet) -> Result<Self> {
        let u = &alphabet.uthmani;
        let g = &alphabet.groups;
        let mut ops: Vec<Op> = Vec::with_capacity(18);

        ops.push(Arc::new(DisassembleOpenings::new(alphabet)));
        let p = ops.clone();
        ops.push(Arc::new(SpecialPatterns::new(alphabet, p)));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "ConvertAlifMaksora",
            &[
                rule(
                    format!("([{}][{}]?){}", u.tanween_fath, g.tanween_markers, u.alif_maksora),
                    "${1}".into(),
                ),
                rule(format!("{}{}", u.alif_maksora, u.small_alef), u.alif.clone()),
                rule(
                    format!(
                        "({}){}(?![{}{}{}{}])",
                        u.fatha, u.alif_maksora, g.harakat, g.tanween, u.shadda, u.sukoon
                    ),
                    format!("${{1}}{}", u.alif),
                ),
                rule(format!("({}){}", u.kasra, u.alif_maksora), format!("${{1}}{}", u.yaa)),
                rule(
                    format!(
                        "{}(?=[{}{}{}{}{}])",
                        u.alif_maksora, g.harakat, g.tanween, u.shadda, u.sukoon, u.madd
                    ),
                    u.yaa.clone(),
                ),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "NormalizeHamazat",
            &[
                rule(
                    format!("{}([{}]*){}", u.kasheeda, g.diacritics, u.hamza_above),
                    format!("{}${{1}}", u.hamza),
                ),
                rule(
                    format!("(?<=[{}{}]){}", g.harakat, u.shadda, u.alif_madda),
                    format!("{}{}", u.alif, u.madd),
                ),
                rule(u.alif_madda.clone(), format!("{}{}{}", u.hamza, u.fatha, u.alif)),
                rule(format!("[{}]", g.hamazat), u.hamza.clone()),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "RestoreElidedYaa",
            &[rule(
                format!("[{}{}](?=[{}{}])", u.small_yaa, u.small_high_yaa, g.harakat, u.shadda),
                u.yaa.clone(),
            )],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "RemoveKasheeda",
            &[rule(u.kasheeda.clone(), String::new())],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "RealizeHamzatWasl",
            &[
                rule(
                    format!("^{}(?={})", u.hamzat_wasl, u.lam),
                    format!("{}{}", u.hamza, u.fatha),
                ),
                rule(
                    format!(
                        "^{}(?=[{}]{}?[{}]{}?{})",
                        u.hamzat_wasl, g.letters, u.sukoon, g.letters, u.shadda, u.damma
                    ),
                    format!("{}{}", u.hamza, u.damma),
                ),
                rule(format!("^{}", u.hamzat_wasl), format!("{}{}", u.hamza, u.kasra)),
                rule(u.hamzat_wasl.clone(), String::new()),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "RemoveSkoonMostadeer",
            &[rule(format!("[{}]{}", g.letters, u.skoon_mostadeer), String::new())],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "SkoonMostateel",
            &[
                rule(format!("{}{}$", u.alif, u.skoon_mostateel), u.alif.clone()),
                rule(format!("{}{}", u.alif, u.skoon_mostateel), String::new()),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "TanweenFathAlif",
            &[
                rule(
                    format!("{}[{}]?{}?$", u.tanween_fath, g.tanween_markers, u.alif),
                    format!("{}{}", u.fatha, u.alif),
                ),
                rule(
                    format!("({}[{}]?){}", u.tanween_fath, g.tanween_markers, u.alif),
                    "${1}".into(),
                ),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "SalahWaw",
            &[rule(
                format!("({}){}{}", u.fatha, u.waw, u.small_alef),
                format!("${{1}}{}", u.alif),
            )],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "EnlargeSmallLetters",
            &[
                rule(format!("({}){}$", u.damma, u.small_waw), "${1}".into()),
                rule(
                    format!("({})[{}{}]$", u.kasra, u.small_yaa, u.small_high_yaa),
                    "${1}".into(),
                ),
                rule(u.small_alef.clone(), u.alif.clone()),
                rule(u.small_waw.clone(), u.waw.clone()),
                rule(format!("[{}{}]", u.small_yaa, u.small_high_yaa), u.yaa.clone()),
                rule(u.small_noon.clone(), u.noon.clone()),
                rule(
                    format!(
                        "[{}{}{}{}{}]",
                        u.small_high_seen, u.small_low_seen, u.imala, u.ishmam, u.tasheel
                    ),
                    String::new(),
                ),
            ],
            p,
        )?));

        let pausal_vowels = format!("{}{}{}", g.harakat, u.tanween_dam, u.tanween_kasr);
        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "PausalCleanup",
            &[
                rule(
                    format!("[{pausal_vowels}][{}]?({}?)$", g.tanween_markers, u.shadda),
                    "${1}".into(),
                ),
                rule(
                    format!("({})[{pausal_vowels}][{}]?$", u.shadda, g.tanween_markers),
                    "${1}".into(),
                ),
            ],
            p,
        )?));

        let p = ops.clone();
        ops.push(Arc::new(RegexOperation::new(
            "TaaMarboota",
            &[
                rule(format!("{}$", u.taa_marboota), u.haa.clone()),
                rule(u.taa_marboota.clone(), u.taa_mabsoota.clone()),
            ],
            p,
        )?));

        // The name of Allah does not assume alif maksora or wasl handling.
        let p: Vec<Op> = ops
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2 && *i != 6)
            .map(|(_, op)| op.clone())
            .collect();
        ops.push(Arc::new(RegexOperation::new(
            "AllahName",
            &[rule(
                format!(
                    "({lam}{kasra}?{lam}(?:{fatha}{shadda}|{shadda}{fatha}))(?={haa}(?!{sukoon}))",
                    lam = u.lam,
                    kasra = u.kasra,
                    fatha = u.fatha,
                    shadda = u.shadda,
                    haa = u.haa,
                    sukoon = u.sukoon,
                ),
                format!("${{1}}{}", u.alif),
            )],
            p,
        )?));

        ops.push(Arc::new(noon_and_tanween(alphabet, ops.clone())?));
        let p = ops.clone();
        ops.push(Arc::new(ResolveMadd::new(alphabet, p)?));
        let p = ops.clone();
        ops.push(Arc::new(RealizeGhonna::new(alphabet, p)?));

        Ok(Self { ops })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Op> {
        self.ops.iter().find(|op| op.name() == name)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Tanween expansion, iqlab and assimilation of a sakin letter into a
/// following geminated one.
fn noon_and_tanween(alphabet: &Alphabet, prerequisites: Vec<Op>) -> Result<RegexOperation> {
    let u = &alphabet.uthmani;
    let g = &alphabet.groups;
    let markers = &g.tanween_markers;
    let mut rules = Vec::new();

    let pairs = [
        (&u.tanween_fath, &u.fatha),
        (&u.tanween_dam, &u.damma),
        (&u.tanween_kasr, &u.kasra),
    ];
    // Before a word opening on a sakin the noon takes a kasra.
    for (tanween, vowel) in pairs {
        rules.push(rule(
            format!(
                r"{tanween}({}?)[{markers}]?(?=\s[{}](?:{}|[{}]))",
                u.shadda, g.letters, u.sukoon, g.letters
            ),
            format!("{vowel}${{1}}{}{}", u.noon, u.kasra),
        ));
    }
    for (tanween, vowel) in pairs {
        rules.push(rule(
            format!("{tanween}({}?)[{markers}]?", u.shadda),
            format!("{vowel}${{1}}{}", u.noon),
        ));
    }

    rules.push(rule(
        format!(r"{}[{}{}]?(?=\s?{})", u.noon, u.meem_iqlab, u.sukoon, u.baa),
        u.meem.clone(),
    ));

    let skip: HashSet<char> = [&u.alif, &u.alif_maksora, &u.hamza, &u.waw, &u.yaa]
        .iter()
        .flat_map(|s| s.chars())
        .collect();
    let assimilable: String = g.letters.chars().filter(|c| !skip.contains(c)).collect();
    rules.push(rule(
        format!(
            r"(?:[{assimilable}]|(?<!{}){}|(?<!{}){}){}?(?=\s?[{}][{}]?{})",
            u.damma, u.waw, u.kasra, u.yaa, u.sukoon, g.letters, g.harakat, u.shadda
        ),
        String::new(),
    ));
    // A noon sakin written bare after a vowel or a sakin mark is concealed or
    // merged. An izhar noon still carries its sukoon here, and a noon after a
    // phonetic long vowel has already been resolved.
    rules.push(rule(
        format!(
            r"(?<=[{}{}{}{}]){}(?=\s[{}]|\s?[{}])",
            g.harakat, u.shadda, u.sukoon, u.madd, u.noon, g.idgham_ghonna, g.ikhfaa
        ),
        alphabet.phonetics.noon_mokhfah.clone(),
    ));
    rules.push(rule(format!("[{markers}]"), String::new()));

    RegexOperation::new("NoonAndTanween", &rules, prerequisites)
}
