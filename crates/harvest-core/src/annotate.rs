//! Named-entity annotation behind a pluggable engine.
//!
//! The NER engine is an external program; `harvest` only consumes the three
//! labels it needs. [`detect`] looks for the engine once at startup and
//! returns either a [`CommandAnnotator`] or the [`NoopAnnotator`], so the
//! whole run uses one strategy.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("NER engine unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to run NER engine: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("NER engine failed: {0}")]
    Failed(String),
    #[error("Invalid NER engine output: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
}

impl EntityLabel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
        }
    }

    /// Maps an engine label onto the closed set; anything else is dropped.
    #[must_use]
    pub fn from_engine_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => Some(Self::Person),
            "ORG" | "ORGANIZATION" => Some(Self::Organization),
            "GPE" | "LOC" | "LOCATION" => Some(Self::Location),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub label: EntityLabel,
}

impl Annotation {
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// First span carrying `label`, trimmed; blank spans are skipped.
#[must_use]
pub fn first_labelled(annotations: &[Annotation], label: EntityLabel) -> Option<String> {
    annotations
        .iter()
        .filter(|a| a.label == label)
        .map(|a| a.text.trim())
        .find(|t| !t.is_empty())
        .map(String::from)
}

pub trait Annotator: Send + Sync {
    /// Human-readable backend identifier.
    fn backend_id(&self) -> &str;

    /// `false` means NLP-based extractors must use their fallbacks.
    fn is_available(&self) -> bool {
        true
    }

    fn annotate(&self, text: &str) -> AnnotationResult<Vec<Annotation>>;
}

/// Stand-in used when no engine could be loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {
    fn backend_id(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn annotate(&self, _text: &str) -> AnnotationResult<Vec<Annotation>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct EngineSpan {
    text: String,
    label: String,
}

/// Runs an external NER program per document.
///
/// The program receives the document text on stdin and must print a JSON
/// array of `{"text": ..., "label": ...}` objects on stdout. It need not
/// read all of stdin before exiting.
#[derive(Debug, Clone)]
pub struct CommandAnnotator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandAnnotator {
    #[must_use]
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    #[must_use]
    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl Annotator for CommandAnnotator {
    fn backend_id(&self) -> &str {
        "command"
    }

    fn annotate(&self, text: &str) -> AnnotationResult<Vec<Annotation>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AnnotationError::Failed("stdin not captured".into()))?;
        let input = text.to_owned();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| AnnotationError::Failed("stdin writer panicked".into()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnnotationError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        // A successful engine may exit without draining stdin.
        match written {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        parse_engine_output(&output.stdout)
    }
}

fn parse_engine_output(stdout: &[u8]) -> AnnotationResult<Vec<Annotation>> {
    let spans: Vec<EngineSpan> = serde_json::from_slice(stdout)?;

    Ok(spans
        .into_iter()
        .filter_map(|span| {
            EntityLabel::from_engine_label(&span.label).map(|label| Annotation::new(span.text, label))
        })
        .collect())
}

/// Looks for `program` on `PATH` (or as a literal path) and returns the
/// annotator for the whole run.
#[must_use]
pub fn detect(program: &str, args: &[String]) -> Box<dyn Annotator> {
    match which::which(program) {
        Ok(path) => {
            tracing::info!("Using NER engine at {}", path.display());
            Box::new(CommandAnnotator::new(path, args.to_vec()))
        }
        Err(e) => {
            tracing::warn!(
                "NER engine '{}' not available ({}); using regex and keyword fallbacks",
                program,
                e
            );
            Box::new(NoopAnnotator)
        }
    }
}
