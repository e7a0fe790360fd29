//! XML document loading.
//!
//! Documents are parsed into a `roxmltree` tree that borrows the input text,
//! so the caller keeps the decoded `String` alive for as long as the
//! [`InvoiceDocument`] is in use.

mod path;

pub use path::{Axis, FieldPath, Step};

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::trace;

use crate::error::{KsefError, Result};

const UTF8_BOM: char = '\u{feff}';

/// One parsed invoice document.
pub struct InvoiceDocument<'input> {
    source: String,
    tree: Document<'input>,
}

impl<'input> InvoiceDocument<'input> {
    /// Parse XML text. `source` names the document in diagnostics and records.
    pub fn parse(source: impl Into<String>, text: &'input str) -> Result<Self> {
        let source = source.into();
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        // Default options reject DTDs, which rules out entity expansion.
        let tree = Document::parse(text).map_err(|e| KsefError::malformed(&source, e))?;
        trace!("Parsed {} ({} nodes)", source, tree.descendants().count());

        Ok(Self { source, tree })
    }

    /// Decode raw bytes as UTF-8 and parse them.
    pub fn from_bytes(source: impl Into<String>, bytes: &'input [u8]) -> Result<Self> {
        let source = source.into();
        let text = decode(&source, bytes)?;
        Self::parse(source, text)
    }

    /// Name the document was loaded under.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The document's root element (`Faktura` for a KSeF invoice).
    pub fn root(&self) -> Node<'_, 'input> {
        self.tree.root_element()
    }
}

impl std::fmt::Debug for InvoiceDocument<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceDocument")
            .field("source", &self.source)
            .field("root", &self.root().tag_name())
            .finish()
    }
}

/// Interpret bytes as UTF-8 text.
///
/// Invalid UTF-8 is a [`KsefError::MalformedDocument`], not an I/O failure.
pub fn decode<'a>(source: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| KsefError::malformed(source, e))
}

/// Read a document from disk.
///
/// Returns the decoded text ready for [`InvoiceDocument::parse`]. Read failures
/// propagate as [`KsefError::Io`].
pub fn load_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Err(KsefError::malformed(path.display().to_string(), e.utf8_error())),
    }
}
