pub mod annotate;
pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod llm;
pub mod normalize;
pub mod patterns;
pub mod record;

pub use annotate::{
    detect as detect_annotator, Annotation, AnnotationError, AnnotationResult, Annotator,
    CommandAnnotator, EntityLabel, NoopAnnotator,
};
pub use assemble::Assembler;
pub use config::{ConfigError, HarvestConfig, LlmConfig, NerConfig, Strategy};
pub use error::{Error, Result};
pub use extract::NameStrategy;
pub use ingest::{
    BatchError, BatchOutput, CompositeExtractor, DocumentFormat, HarvestPipeline, ProcessedFile,
    SkippedFile, TextError, TextExtractor,
};
pub use llm::{ChatCompletionsExtractor, LlmError, LlmExtractor};
pub use normalize::{normalize, NormalizedText};
pub use patterns::{Dictionaries, PatternLibrary};
pub use record::{Document, DocumentKind, ExtractionRecord, JobDescriptionRecord, ResumeRecord};
