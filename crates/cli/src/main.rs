//! quran-transcript CLI: phonetic transcription, script alignment, verse
//! windows, search and tasmeea.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use quran_transcript_core::alphabet::{self, Alphabet};
use quran_transcript_core::moshaf::MoshafAttributes;
use quran_transcript_core::normalize::NormalizeOptions;
use quran_transcript_core::phonetics::Phonetizer;
use quran_transcript_core::quran::{Aya, QuranStore};
use quran_transcript_core::search::search;
use quran_transcript_core::tasmeea::{tasmeea_sura, TasmeeaOptions};
use quran_transcript_core::types::{FormulaFlags, WordSpan};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "quran-transcript",
    about = "Quranic script tools: phonetic transcription, alignment and recitation matching",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe Uthmani text into the phonetic script
    Phonetize(PhonetizeArgs),
    /// Uthmani text of an Imlaey word span of one verse
    Align(AlignArgs),
    /// Both scripts of a window of Imlaey words around a verse
    Window(WindowArgs),
    /// Search Imlaey text around a pivot verse
    Search(SearchArgs),
    /// Match recited text segments against a sura
    Tasmeea(TasmeeaArgs),
}

// ─── Shared arguments (embedded in each subcommand) ──────────────

#[derive(Parser, Debug)]
struct SharedArgs {
    /// Merged Tanzil JSON holding both scripts of every verse
    #[arg(long)]
    quran: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct VerseArgs {
    /// Sura index, 1 to 114
    #[arg(long, default_value_t = 1)]
    sura: usize,

    /// Aya index within the sura, from 1
    #[arg(long, default_value_t = 1)]
    aya: usize,
}

#[derive(Parser, Debug)]
struct FormulaArgs {
    /// Count the istiaatha before a first verse
    #[arg(long, default_value_t = false)]
    istiaatha: bool,

    /// Count the bismillah before a first verse
    #[arg(long, default_value_t = false)]
    bismillah: bool,

    /// Count the closing formula after a last verse
    #[arg(long, default_value_t = false)]
    sadaka: bool,
}

impl FormulaArgs {
    fn flags(&self) -> FormulaFlags {
        FormulaFlags {
            istiaatha: self.istiaatha,
            bismillah: self.bismillah,
            sadaka: self.sadaka,
        }
    }
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Treat every hamza form as a bare hamza
    #[arg(long, default_value_t = false)]
    ignore_hamazat: bool,

    /// Keep alif maksura distinct from alif
    #[arg(long, default_value_t = false)]
    keep_alef_maksoora: bool,

    /// Read taa marbuta as haa
    #[arg(long, default_value_t = false)]
    ignore_taa_marboota: bool,

    /// Read taa marbuta as taa
    #[arg(long, default_value_t = false)]
    normalize_taat: bool,

    /// Keep the small alif
    #[arg(long, default_value_t = false)]
    keep_small_alef: bool,

    /// Drop short vowels, tanween, shadda and sukoon
    #[arg(long, default_value_t = false)]
    remove_tashkeel: bool,
}

impl NormalizeArgs {
    fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            remove_spaces: true,
            ignore_hamazat: self.ignore_hamazat,
            ignore_alef_maksoora: !self.keep_alef_maksoora,
            ignore_taa_marboota: self.ignore_taa_marboota,
            normalize_taat: self.normalize_taat,
            remove_small_alef: !self.keep_small_alef,
            remove_tashkeel: self.remove_tashkeel,
        }
    }
}

// ─── Phonetize ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Transcribe Uthmani text into the phonetic script")]
struct PhonetizeArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Uthmani text; read from --quran at --sura/--aya when omitted
    text: Option<String>,

    #[command(flatten)]
    verse: VerseArgs,

    /// Moshaf attributes JSON (default: Hafs, 4-count madd)
    #[arg(long)]
    moshaf: Option<PathBuf>,

    /// Drop spaces from the phonetic output
    #[arg(long, default_value_t = false)]
    remove_spaces: bool,

    /// Print the full output (sifat and character map) as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Align ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Uthmani text of an Imlaey word span of one verse")]
struct AlignArgs {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(flatten)]
    verse: VerseArgs,

    /// First Imlaey word
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// One past the last Imlaey word (default: end of verse)
    #[arg(long)]
    end: Option<usize>,

    #[command(flatten)]
    formulas: FormulaArgs,
}

// ─── Window ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Both scripts of a window of Imlaey words around a verse")]
#[command(allow_negative_numbers = true)]
struct WindowArgs {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(flatten)]
    verse: VerseArgs,

    /// Window start in words from the verse, may be negative
    #[arg(long, default_value_t = 0)]
    start: i64,

    /// Window length in Imlaey words
    #[arg(long, default_value_t = 10)]
    window: usize,

    #[command(flatten)]
    formulas: FormulaArgs,
}

// ─── Search ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Search Imlaey text around a pivot verse")]
struct SearchArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Imlaey text to look for
    text: String,

    #[command(flatten)]
    verse: VerseArgs,

    /// Verses searched around the pivot
    #[arg(long, default_value_t = 2)]
    window: usize,

    #[command(flatten)]
    normalize: NormalizeArgs,
}

// ─── Tasmeea ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Match recited text segments against a sura")]
struct TasmeeaArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Recited text, one argument per segment, in order
    #[arg(required = true)]
    segments: Vec<String>,

    /// Sura index, 1 to 114
    #[arg(long)]
    sura: usize,

    /// Words a segment may reach back before the cursor
    #[arg(long, default_value_t = 6)]
    overlap_words: usize,

    /// Words searched ahead of the cursor
    #[arg(long, default_value_t = 30)]
    window_words: usize,

    /// Minimum Levenshtein ratio for a match
    #[arg(long, default_value_t = 0.5)]
    acceptance_ratio: f64,

    /// Do not expect the istiaatha
    #[arg(long, default_value_t = false)]
    no_istiaatha: bool,

    /// Do not expect the bismillah
    #[arg(long, default_value_t = false)]
    no_bismillah: bool,

    /// Do not expect the closing formula
    #[arg(long, default_value_t = false)]
    no_sadaka: bool,

    #[command(flatten)]
    normalize: NormalizeArgs,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Phonetize(a) if a.shared.verbose => "debug",
        Command::Align(a) if a.shared.verbose => "debug",
        Command::Window(a) if a.shared.verbose => "debug",
        Command::Search(a) if a.shared.verbose => "debug",
        Command::Tasmeea(a) if a.shared.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Phonetize(args) => run_phonetize(args),
        Command::Align(args) => run_align(args),
        Command::Window(args) => run_window(args),
        Command::Search(args) => run_search(args),
        Command::Tasmeea(args) => run_tasmeea(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn builtin_alphabet() -> Result<&'static Alphabet> {
    alphabet::builtin().context("loading the built-in alphabet")
}

/// Load the verse store named by --quran.
fn load_store(shared: &SharedArgs) -> Result<QuranStore> {
    let Some(path) = &shared.quran else {
        bail!("--quran <PATH> is required for this command");
    };
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    QuranStore::from_path(path)
}

fn load_moshaf(path: Option<&PathBuf>) -> Result<MoshafAttributes> {
    match path {
        Some(p) => MoshafAttributes::from_path(p)
            .with_context(|| format!("loading moshaf attributes {}", p.display())),
        None => Ok(MoshafAttributes::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_phonetize(args: PhonetizeArgs) -> Result<()> {
    let alphabet = builtin_alphabet()?;
    let moshaf = load_moshaf(args.moshaf.as_ref())?;
    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let store = load_store(&args.shared)?;
            store.verse(args.verse.sura, args.verse.aya)?.uthmani.clone()
        }
    };

    let phonetizer = Phonetizer::new(alphabet)?;
    log::debug!("Running {} operations", phonetizer.catalog().len());
    let output = phonetizer.phonetize(&text, &moshaf, args.remove_spaces)?;
    if args.json {
        print_json(&output)
    } else {
        println!("{}", output.phonemes);
        Ok(())
    }
}

fn run_align(args: AlignArgs) -> Result<()> {
    let alphabet = builtin_alphabet()?;
    let store = load_store(&args.shared)?;
    let aya = Aya::new(&store, alphabet, args.verse.sura, args.verse.aya)?;
    let span = WordSpan {
        start: args.start,
        end: args.end,
    };
    let uthmani = aya
        .imlaey_to_uthmani(span, args.formulas.flags())
        .with_context(|| format!("aligning words {:?} of {}", span, aya))?;
    println!("{uthmani}");
    Ok(())
}

fn run_window(args: WindowArgs) -> Result<()> {
    let alphabet = builtin_alphabet()?;
    let store = load_store(&args.shared)?;
    let aya = Aya::new(&store, alphabet, args.verse.sura, args.verse.aya)?
        .with_formulas(args.formulas.flags());
    let segment = aya.get_by_imlaey_words(args.start, args.window)?;
    print_json(&segment)
}

fn run_search(args: SearchArgs) -> Result<()> {
    let alphabet = builtin_alphabet()?;
    let store = load_store(&args.shared)?;
    let pivot = Aya::new(&store, alphabet, args.verse.sura, args.verse.aya)?;
    let found = search(&args.text, &pivot, args.window, &args.normalize.options())?;
    if found.is_empty() {
        log::warn!("No match for the given text around {}", pivot);
    }
    let views: Vec<_> = found.iter().map(|item| item.view()).collect();
    print_json(&views)
}

fn run_tasmeea(args: TasmeeaArgs) -> Result<()> {
    if args.acceptance_ratio <= 0.0 || args.acceptance_ratio > 1.0 {
        bail!("--acceptance-ratio must be in (0, 1]");
    }
    let alphabet = builtin_alphabet()?;
    let store = load_store(&args.shared)?;
    let options = TasmeeaOptions {
        overlap_words: args.overlap_words,
        window_words: args.window_words,
        acceptance_ratio: args.acceptance_ratio,
        formulas: FormulaFlags {
            istiaatha: !args.no_istiaatha,
            bismillah: !args.no_bismillah,
            sadaka: !args.no_sadaka,
        },
        normalize: args.normalize.options(),
    };
    let matches = tasmeea_sura(&store, alphabet, args.segments.as_slice(), args.sura, &options)?;
    print_json(&matches)
}
