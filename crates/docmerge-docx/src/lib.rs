//! Document filler for docmerge.
//!
//! A [`Template`] holds the raw bytes of a `.docx` file. Each merge job calls
//! [`Template::instantiate`] to get a private [`DocxPackage`], fills its
//! placeholder tokens with [`DocxPackage::fill`] and writes it out with
//! [`DocxPackage::save`]. Only `word/document.xml` is rewritten; every other
//! part is copied through byte for byte.

mod error;
mod fill;
mod package;
mod pattern;

pub use error::DocxError;
pub use fill::{fill_document_xml, DocumentXml, FillStats};
pub use package::{DocxPackage, Template, MAIN_PART};
pub use pattern::{PlaceholderPattern, PlaceholderRule, Substitution, ValueCursor};

/// Extension given to generated documents.
pub const DOCX_EXTENSION: &str = "docx";
