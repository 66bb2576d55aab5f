use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::text::{CompositeExtractor, DocumentFormat, TextError, TextExtractor, TextResult};
use crate::assemble::Assembler;
use crate::llm::LlmExtractor;
use crate::record::{Document, DocumentKind, ExtractionRecord};

/// Conditions that abort a whole batch. Per-file failures are reported in
/// [`BatchOutput::skipped`] instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub record: ExtractionRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchOutput {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl BatchOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn add_processed(&mut self, file: ProcessedFile) {
        self.processed.push(file);
    }

    fn add_skipped(&mut self, path: PathBuf, error: &TextError) {
        tracing::warn!("Skipping {}: {}", path.display(), error);
        self.skipped.push(SkippedFile {
            path,
            reason: error.to_string(),
        });
    }

    pub fn records(&self) -> impl Iterator<Item = &ExtractionRecord> {
        self.processed.iter().map(|p| &p.record)
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ExtractionRecord> {
        self.processed.into_iter().map(|p| p.record).collect()
    }

    pub fn success_count(&self) -> usize {
        self.processed.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Decodes files, assembles one record per document and drives directories.
pub struct HarvestPipeline {
    extractor: Box<dyn TextExtractor>,
    assembler: Assembler,
    llm: Option<Box<dyn LlmExtractor>>,
}

impl HarvestPipeline {
    #[must_use]
    pub fn new(assembler: Assembler) -> Self {
        Self {
            extractor: Box::new(CompositeExtractor::default()),
            assembler,
            llm: None,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Prefer model output; the rule-based record is used whenever the model
    /// call fails.
    #[must_use]
    pub fn with_llm(mut self, llm: Box<dyn LlmExtractor>) -> Self {
        self.llm = Some(llm);
        self
    }

    #[must_use]
    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    pub async fn record_for(&self, document: &Document) -> ExtractionRecord {
        if let Some(llm) = &self.llm {
            match llm.extract(&document.text, document.kind).await {
                Ok(record) => return record,
                Err(e) => tracing::warn!(
                    "LLM extraction with '{}' failed, using rules: {}",
                    llm.model(),
                    e
                ),
            }
        }

        self.assemble(document).await
    }

    /// An NER engine blocks on a child process, so it runs off the async
    /// workers.
    async fn assemble(&self, document: &Document) -> ExtractionRecord {
        if !self.assembler.annotator().is_available() {
            return self.assembler.assemble(document);
        }

        let assembler = self.assembler.clone();
        let owned = document.clone();
        match tokio::task::spawn_blocking(move || assembler.assemble(&owned)).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Record assembly aborted: {}", e);
                ExtractionRecord::empty(document.kind)
            }
        }
    }

    pub async fn process_file(&self, path: &Path, kind: DocumentKind) -> TextResult<ProcessedFile> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| TextError::UnsupportedFormat(path.display().to_string()))?;

        let text = self.extractor.extract_file(path).await?;
        let record = self.record_for(&Document::new(kind, text)).await;

        tracing::info!("Processed {}", path.display());

        Ok(ProcessedFile {
            path: path.to_path_buf(),
            format,
            record,
        })
    }

    /// Processes the regular files directly inside `dir` in file name order.
    /// Files that are not `.pdf` / `.docx` are reported as skipped. Only an
    /// unusable `dir` is an error.
    pub async fn process_directory(&self, dir: &Path, kind: DocumentKind) -> BatchResult<BatchOutput> {
        if !dir.is_dir() {
            return Err(BatchError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut output = BatchOutput::new();

        for path in paths {
            match self.process_file(&path, kind).await {
                Ok(file) => output.add_processed(file),
                Err(e) => output.add_skipped(path, &e),
            }
        }

        tracing::info!(
            "Batch finished: {} processed, {} skipped",
            output.success_count(),
            output.skip_count()
        );

        Ok(output)
    }
}

impl Default for HarvestPipeline {
    fn default() -> Self {
        Self::new(Assembler::default())
    }
}
