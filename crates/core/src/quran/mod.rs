//! Verse storage, the verse cursor and Imlaey to Uthmani alignment.

pub mod aya;
pub mod rasm;
pub mod store;
pub mod window;

#[cfg(test)]
pub(crate) mod fixture;

pub use aya::{Aya, AyaFormat};
pub use store::{QuranStore, Sura, Verse};
