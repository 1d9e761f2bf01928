//! The text extraction seam.
//!
//! Turning PDF bytes into text is done by an external service. This trait is
//! implemented by the `quizbank-extract` crate; the core only consumes the
//! resulting text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::parser::{extract_with_diagnostics, Extraction};

/// Trait for backends that turn a document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Extract the text of a document.
    async fn extract_text(&self, request: &ExtractRequest) -> anyhow::Result<ExtractResponse>;
}

/// A document to extract text from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// File name reported to the service.
    pub filename: String,
    /// Raw document bytes.
    pub content: Vec<u8>,
}

/// Text produced by an extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// The extracted text.
    pub text: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Extract a document's text and parse it into questions.
pub async fn extract_document(
    extractor: &dyn TextExtractor,
    request: &ExtractRequest,
) -> anyhow::Result<Extraction> {
    let response = extractor.extract_text(request).await?;
    tracing::debug!(
        extractor = extractor.name(),
        file = %request.filename,
        chars = response.text.len(),
        latency_ms = response.latency_ms,
        "document text extracted"
    );
    Ok(extract_with_diagnostics(&response.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionNumber;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextExtractor for FixedText {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn extract_text(&self, _: &ExtractRequest) -> anyhow::Result<ExtractResponse> {
            Ok(ExtractResponse {
                text: self.0.to_string(),
                latency_ms: 0,
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl TextExtractor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn extract_text(&self, _: &ExtractRequest) -> anyhow::Result<ExtractResponse> {
            anyhow::bail!("service unavailable")
        }
    }

    fn request() -> ExtractRequest {
        ExtractRequest {
            filename: "exam.pdf".into(),
            content: b"%PDF-1.4".to_vec(),
        }
    }

    #[tokio::test]
    async fn document_is_parsed_after_extraction() {
        let extractor = FixedText("Question 4\nQ?\nA. yes\nB. no\nAnswer proposed: B");
        let extraction = extract_document(&extractor, &request()).await.unwrap();
        let q = extraction.bank.get(QuestionNumber(4)).unwrap();
        assert_eq!(q.proposed_answer, vec!["B".to_string()]);
    }

    #[tokio::test]
    async fn extractor_errors_propagate() {
        let err = extract_document(&Failing, &request()).await.unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }
}
