//! quizbank-extract: PDF-to-text extraction for quizbank.
//!
//! Implements the `TextExtractor` trait against the remote extraction
//! service, plus a mock for tests, and loads the workspace configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_extractor, load_config, ExtractorConfig, QuizbankConfig};
pub use error::ExtractError;
pub use http::HttpTextExtractor;
pub use mock::MockTextExtractor;

use std::path::Path;

use anyhow::Context;
use quizbank_core::traits::ExtractRequest;

/// Read a document from disk into an extraction request.
pub async fn read_document(path: &Path) -> anyhow::Result<ExtractRequest> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read document: {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file.pdf".to_string());

    Ok(ExtractRequest { filename, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_document_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let request = read_document(&path).await.unwrap();
        assert_eq!(request.filename, "exam.pdf");
        assert_eq!(request.content, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn read_missing_document() {
        let err = read_document(Path::new("/no/such/exam.pdf"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read document"));
    }
}
