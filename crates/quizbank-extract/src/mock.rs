//! Mock extractor for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizbank_core::traits::{ExtractRequest, ExtractResponse, TextExtractor};

/// A text extractor that never leaves the process.
///
/// Returns configurable text based on the requested file name.
pub struct MockTextExtractor {
    /// Map of file name → extracted text.
    texts: HashMap<String, String>,
    /// Text returned when no file name matches.
    default_text: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<ExtractRequest>>,
}

impl MockTextExtractor {
    /// Create a mock with the given file-name→text mappings.
    pub fn new(texts: HashMap<String, String>) -> Self {
        Self {
            texts,
            default_text: String::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn with_fixed_text(text: &str) -> Self {
        Self {
            texts: HashMap::new(),
            default_text: text.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<ExtractRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract_text(&self, request: &ExtractRequest) -> anyhow::Result<ExtractResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let text = self
            .texts
            .get(&request.filename)
            .cloned()
            .unwrap_or_else(|| self.default_text.clone());

        Ok(ExtractResponse {
            text,
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizbank_core::model::QuestionNumber;
    use quizbank_core::traits::extract_document;

    fn request(filename: &str) -> ExtractRequest {
        ExtractRequest {
            filename: filename.into(),
            content: vec![],
        }
    }

    #[tokio::test]
    async fn fixed_text() {
        let extractor = MockTextExtractor::with_fixed_text("Question 1\nA. x");
        let response = extractor.extract_text(&request("any.pdf")).await.unwrap();
        assert_eq!(response.text, "Question 1\nA. x");
        assert_eq!(extractor.call_count(), 1);
        assert_eq!(extractor.last_request().unwrap().filename, "any.pdf");
    }

    #[tokio::test]
    async fn filename_matching_feeds_the_parser() {
        let mut texts = HashMap::new();
        texts.insert(
            "a.pdf".to_string(),
            "Question 1\nFirst?\nA. yes\nAnswer proposed: A".to_string(),
        );
        texts.insert(
            "b.pdf".to_string(),
            "Question 2\nSecond?\nA. no\nAnswer proposed: A".to_string(),
        );
        let extractor = MockTextExtractor::new(texts);

        let a = extract_document(&extractor, &request("a.pdf")).await.unwrap();
        let b = extract_document(&extractor, &request("b.pdf")).await.unwrap();
        assert!(a.bank.get(QuestionNumber(1)).is_some());
        assert!(b.bank.get(QuestionNumber(2)).is_some());

        let missing = extract_document(&extractor, &request("c.pdf")).await.unwrap();
        assert!(missing.bank.is_empty());
        assert_eq!(extractor.call_count(), 3);
    }
}
