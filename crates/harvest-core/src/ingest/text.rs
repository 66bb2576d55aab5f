use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::docx::DocxExtractor;
use super::pdf::PdfExtractor;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("Document contains no text")]
    Empty,
    #[error("Text extraction timed out after {0:?}")]
    TimedOut(Duration),
}

pub type TextResult<T> = Result<T, TextError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            _ => None,
        }
    }
}

/// Decodes document bytes into a single text string.
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    fn supported_formats(&self) -> &[DocumentFormat];

    fn can_extract(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    async fn extract_bytes(&self, data: &[u8], format: DocumentFormat) -> TextResult<String>;

    async fn extract_file(&self, path: &Path) -> TextResult<String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| TextError::UnsupportedFormat("no extension".into()))?;

        let format = DocumentFormat::from_extension(ext)
            .ok_or_else(|| TextError::UnsupportedFormat(ext.into()))?;

        if !self.can_extract(format) {
            return Err(TextError::UnsupportedFormat(format!("{format:?}")));
        }

        let data = tokio::fs::read(path).await?;
        self.extract_bytes(&data, format).await
    }
}

/// Dispatches on format, bounds each call with a timeout and rejects
/// documents that decode to blank text.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn TextExtractor>>,
    timeout: Option<Duration>,
}

impl CompositeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.push(extractor);
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn find_extractor(&self, format: DocumentFormat) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(format))
            .map(AsRef::as_ref)
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::new()
            .with_extractor(Box::new(PdfExtractor::new()))
            .with_extractor(Box::new(DocxExtractor::new()))
    }
}

#[async_trait::async_trait]
impl TextExtractor for CompositeExtractor {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf, DocumentFormat::Docx]
    }

    fn can_extract(&self, format: DocumentFormat) -> bool {
        self.find_extractor(format).is_some()
    }

    async fn extract_bytes(&self, data: &[u8], format: DocumentFormat) -> TextResult<String> {
        let extractor = self
            .find_extractor(format)
            .ok_or_else(|| TextError::UnsupportedFormat(format!("{format:?}")))?;

        let text = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, extractor.extract_bytes(data, format))
                .await
                .map_err(|_| TextError::TimedOut(limit))??,
            None => extractor.extract_bytes(data, format).await?,
        };

        if text.trim().is_empty() {
            return Err(TextError::Empty);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowExtractor;

    #[async_trait::async_trait]
    impl TextExtractor for SlowExtractor {
        fn supported_formats(&self) -> &[DocumentFormat] {
            &[DocumentFormat::Pdf]
        }

        async fn extract_bytes(&self, _data: &[u8], _format: DocumentFormat) -> TextResult<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("late".into())
        }
    }

    struct BlankExtractor;

    #[async_trait::async_trait]
    impl TextExtractor for BlankExtractor {
        fn supported_formats(&self) -> &[DocumentFormat] {
            &[DocumentFormat::Docx]
        }

        async fn extract_bytes(&self, _data: &[u8], _format: DocumentFormat) -> TextResult<String> {
            Ok(" \n\t ".into())
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("doc"), None);
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv/jane.Docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("notes")), None);
    }

    #[test]
    fn test_format_from_mime() {
        assert_eq!(
            DocumentFormat::from_mime("application/pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_mime("text/plain"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_at_extractor_boundary() {
        let extractor = CompositeExtractor::new()
            .with_extractor(Box::new(SlowExtractor))
            .with_timeout(Duration::from_secs(5));

        let result = extractor.extract_bytes(b"%PDF", DocumentFormat::Pdf).await;

        assert!(matches!(result, Err(TextError::TimedOut(_))));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let extractor = CompositeExtractor::new().with_extractor(Box::new(BlankExtractor));

        let result = extractor.extract_bytes(b"PK", DocumentFormat::Docx).await;

        assert!(matches!(result, Err(TextError::Empty)));
    }

    #[tokio::test]
    async fn test_missing_extractor_is_unsupported() {
        let extractor = CompositeExtractor::new().with_extractor(Box::new(BlankExtractor));

        assert!(!extractor.can_extract(DocumentFormat::Pdf));
        let result = extractor.extract_bytes(b"%PDF", DocumentFormat::Pdf).await;
        assert!(matches!(result, Err(TextError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_extract_file_rejects_unknown_extension() {
        let extractor = CompositeExtractor::default();

        let result = extractor.extract_file(Path::new("resume.txt")).await;

        assert!(matches!(result, Err(TextError::UnsupportedFormat(_))));
    }
}
