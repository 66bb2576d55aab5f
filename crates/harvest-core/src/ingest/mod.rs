mod docx;
mod pdf;
mod pipeline;
mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use pipeline::{
    BatchError, BatchOutput, BatchResult, HarvestPipeline, ProcessedFile, SkippedFile,
};
pub use text::{CompositeExtractor, DocumentFormat, TextError, TextExtractor, TextResult};
