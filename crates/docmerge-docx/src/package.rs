use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocxError;
use crate::fill::{fill_document_xml, DocumentXml, FillStats};
use crate::pattern::{PlaceholderPattern, ValueCursor};

/// Main document part of a WordprocessingML package.
pub const MAIN_PART: &str = "word/document.xml";

/// Template bytes, loaded once and shared read-only between workers.
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Arc<[u8]>,
}

impl Template {
    /// Read and validate a template file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocxError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Wrap template bytes, checking once that they form a usable package.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, DocxError> {
        let bytes: Arc<[u8]> = Arc::from(bytes.into());
        DocxPackage::from_bytes(&bytes)?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A fresh, independently mutable copy of the document.
    pub fn instantiate(&self) -> Result<DocxPackage, DocxError> {
        DocxPackage::from_bytes(&self.bytes)
    }
}

struct Part {
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// In-memory `.docx` package: every zip entry, in archive order.
pub struct DocxPackage {
    parts: IndexMap<String, Part>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = IndexMap::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            let name = file.name().to_string();
            let mut data = Vec::new();
            if !file.is_dir() {
                file.read_to_end(&mut data)?;
            }
            parts.insert(
                name,
                Part {
                    data,
                    compression: file.compression(),
                    is_dir: file.is_dir(),
                },
            );
        }
        if !parts.contains_key(MAIN_PART) {
            return Err(DocxError::MissingPart(MAIN_PART.to_string()));
        }
        Ok(Self { parts })
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(|p| p.data.as_slice())
    }

    fn main_part(&self) -> Result<&Part, DocxError> {
        self.parts
            .get(MAIN_PART)
            .ok_or_else(|| DocxError::MissingPart(MAIN_PART.to_string()))
    }

    /// Substitute `values` into the placeholder tokens of the main part.
    pub fn fill(&mut self, pattern: &PlaceholderPattern, values: &[String]) -> Result<FillStats, DocxError> {
        let mut cursor = ValueCursor::new(values);
        let (xml, stats) = fill_document_xml(&self.main_part()?.data, pattern, &mut cursor)?;
        if let Some(part) = self.parts.get_mut(MAIN_PART) {
            part.data = xml;
        }
        tracing::debug!(
            tokens = stats.tokens,
            substituted = stats.substituted,
            values = values.len(),
            "filled main part"
        );
        Ok(stats)
    }

    /// Text of the main part's `<w:t>` nodes, in substitution order.
    pub fn document_text(&self) -> Result<Vec<String>, DocxError> {
        let doc = DocumentXml::parse(&self.main_part()?.data)?;
        Ok(doc.texts().into_iter().map(String::from).collect())
    }

    pub fn write_to<W: Write + Seek>(&self, w: W) -> Result<W, DocxError> {
        let mut out = ZipWriter::new(w);
        for (name, part) in &self.parts {
            let opts = SimpleFileOptions::default().compression_method(part.compression);
            if part.is_dir {
                out.add_directory(name.as_str(), opts)?;
                continue;
            }
            out.start_file(name.as_str(), opts)?;
            out.write_all(&part.data)?;
        }
        Ok(out.finish()?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The archive is assembled in a temporary file next to `path` and moved
    /// into place once complete, so a failed save never leaves a truncated
    /// document behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocxError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        let tmp = self.write_to(tmp)?;
        tmp.persist(path).map_err(|e| DocxError::Io(e.error))?;
        Ok(())
    }
}
