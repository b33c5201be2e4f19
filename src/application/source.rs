//! Text source boundary
//!
//! Format-specific extraction (PDF, DOCX, OCR, ...) happens outside this crate.
//! Here documents are classified by extension and plain-text kinds are read directly.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, ResultPathExt};
use crate::infrastructure::traits::FileSystem;

/// Document types known to the surrounding extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Text,
    Markdown,
    Pdf,
    Docx,
    Odt,
    Rtf,
    Image,
    Unknown,
}

impl DocumentKind {
    /// Classify by file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt" | "text") => Self::Text,
            Some("md" | "markdown") => Self::Markdown,
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("odt") => Self::Odt,
            Some("rtf") => Self::Rtf,
            Some("png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp") => Self::Image,
            _ => Self::Unknown,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Odt => "application/vnd.oasis.opendocument.text",
            Self::Rtf => "application/rtf",
            Self::Image => "image/*",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Kinds whose bytes already are the text to structure.
    pub fn is_plain_text(&self) -> bool {
        matches!(self, Self::Text | Self::Markdown)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Produces the UTF-8 text of a document.
pub trait TextSource: Send + Sync {
    fn extract(&self, path: &Path) -> ApplicationResult<String>;
}

/// Reads text and markdown files verbatim (trimmed); rejects every other kind.
pub struct PlainTextSource {
    fs: Arc<dyn FileSystem>,
}

impl PlainTextSource {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl TextSource for PlainTextSource {
    fn extract(&self, path: &Path) -> ApplicationResult<String> {
        let kind = DocumentKind::from_path(path);
        if !kind.is_plain_text() {
            return Err(ApplicationError::UnsupportedDocument {
                path: path.to_path_buf(),
                kind,
            });
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        debug!("extracted {} bytes from {}", text.len(), path.display());
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("law.txt", DocumentKind::Text)]
    #[case("README.MD", DocumentKind::Markdown)]
    #[case("scan.pdf", DocumentKind::Pdf)]
    #[case("contract.docx", DocumentKind::Docx)]
    #[case("photo.JPG", DocumentKind::Image)]
    #[case("noext", DocumentKind::Unknown)]
    fn given_extension_when_classifying_then_returns_kind(
        #[case] path: &str,
        #[case] expected: DocumentKind,
    ) {
        assert_eq!(DocumentKind::from_path(&PathBuf::from(path)), expected);
    }

    #[test]
    fn given_docx_kind_when_displaying_then_shows_mime_type() {
        assert_eq!(
            DocumentKind::Docx.to_string(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }
}
