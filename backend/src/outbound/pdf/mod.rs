//! PDF form renderer adapter backed by the external `pdftk` Java build.

mod pdftk;

pub use pdftk::{PdftkRenderer, PdftkSettings};
