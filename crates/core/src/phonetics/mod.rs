//! Uthmani script to phonetic script.
//!
//! [`pipeline::Phonetizer`] runs the [`operations::OperationCatalog`] in
//! order over one verse, carries a character provenance map through every
//! rewrite and finishes with the sifa layer.

pub mod operation;
pub mod operations;
pub mod pipeline;
pub mod provenance;
pub mod sifa;

pub use operation::{ConversionOperation, Mode};
pub use pipeline::{quran_phonetizer, Phonetizer};
pub use sifa::SifaResult;
