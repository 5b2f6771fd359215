//! Legal documents (terms, privacy, Q&A)
//!
//! The `.docx` sources are embedded into the binary; `docs_dir` in the config
//! can point at a directory with newer copies under the same file names.

mod docx;

pub use docx::{docx_to_html, DocxError};

use rust_embed::RustEmbed;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(RustEmbed)]
#[folder = "assets/docs/"]
struct EmbeddedDocs;

/// A publishable document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentInfo {
    pub slug: &'static str,
    pub file_name: &'static str,
    pub title: &'static str,
}

pub const DOCUMENTS: &[DocumentInfo] = &[
    DocumentInfo {
        slug: "terms",
        file_name: "terms.docx",
        title: "Terms of Service",
    },
    DocumentInfo {
        slug: "privacy",
        file_name: "privacy.docx",
        title: "Privacy Policy",
    },
    DocumentInfo {
        slug: "qa",
        file_name: "qa.docx",
        title: "Q&A",
    },
];

pub fn find(slug: &str) -> Option<&'static DocumentInfo> {
    DOCUMENTS.iter().find(|d| d.slug == slug)
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLibrary {
    override_dir: Option<PathBuf>,
}

impl DocumentLibrary {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Raw `.docx` bytes; `None` for unknown slugs
    pub async fn raw(&self, slug: &str) -> Option<Vec<u8>> {
        let info = find(slug)?;

        if let Some(dir) = &self.override_dir {
            let path = dir.join(info.file_name);
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    debug!(path = %path.display(), "Serving document from docs_dir");
                    return Some(bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), "Failed to read document: {}", e),
            }
        }

        EmbeddedDocs::get(info.file_name).map(|file| file.data.into_owned())
    }

    /// Rendered HTML fragment; `Ok(None)` for unknown slugs
    pub async fn render(&self, slug: &str) -> Result<Option<String>, DocxError> {
        match self.raw(slug).await {
            Some(bytes) => docx_to_html(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embedded_documents_render() {
        let library = DocumentLibrary::default();
        for info in DOCUMENTS {
            let html = library.render(info.slug).await.unwrap().unwrap();
            assert!(html.starts_with("<h1>"), "{} has no title", info.slug);
        }

        let terms = library.render("terms").await.unwrap().unwrap();
        assert!(terms.contains("Terms of Service"));
        assert!(terms.contains("<ul>"));
        assert!(terms.contains("<strong>No real money. </strong>"));
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let library = DocumentLibrary::default();
        assert!(library.raw("../Cargo.toml").await.is_none());
        assert!(library.render("cookies").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_override_dir_wins_over_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qa.docx"), b"not a zip").unwrap();
        let library = DocumentLibrary::new(Some(dir.path().to_path_buf()));

        assert_eq!(library.raw("qa").await.unwrap(), b"not a zip");
        assert!(library.render("qa").await.is_err());
        // Files missing from the override fall back to the embedded copy
        assert!(library.render("privacy").await.unwrap().is_some());
    }
}
