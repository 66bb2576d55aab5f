//! Runs every extractor of a schema over one document and merges the results.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::annotate::{Annotation, Annotator, NoopAnnotator};
use crate::extract::{
    extract_certifications, extract_date_posted, extract_domain, extract_email,
    extract_experience, extract_job_role, extract_location, extract_location_labelled,
    extract_name, extract_organization, extract_organization_labelled, extract_phone,
    extract_projects, extract_qualifications, extract_responsibilities, extract_skills,
    extract_summary, NameStrategy,
};
use crate::normalize::NormalizedText;
use crate::patterns::PatternLibrary;
use crate::record::{Document, DocumentKind, ExtractionRecord, JobDescriptionRecord, ResumeRecord};

/// Cloning shares the pattern library and the NER engine.
#[derive(Clone)]
pub struct Assembler {
    library: Arc<PatternLibrary>,
    annotator: Arc<dyn Annotator>,
    name_strategy: NameStrategy,
    reference_date: Option<NaiveDate>,
}

impl Assembler {
    /// Rule-based assembler with the built-in dictionaries and no NER engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: Arc::new(PatternLibrary::default()),
            annotator: Arc::new(NoopAnnotator),
            name_strategy: NameStrategy::default(),
            reference_date: None,
        }
    }

    #[must_use]
    pub fn with_library(mut self, library: Arc<PatternLibrary>) -> Self {
        self.library = library;
        self
    }

    #[must_use]
    pub fn with_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotator = Arc::from(annotator);
        self
    }

    #[must_use]
    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = strategy;
        self
    }

    /// Fixes "today" for relative posting dates.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    #[must_use]
    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    #[must_use]
    pub fn assemble(&self, document: &Document) -> ExtractionRecord {
        match document.kind {
            DocumentKind::Resume => self.assemble_resume(&document.text).into(),
            DocumentKind::JobDescription => self.assemble_job_description(&document.text).into(),
        }
    }

    #[must_use]
    pub fn assemble_resume(&self, text: &str) -> ResumeRecord {
        let normalized = NormalizedText::new(text);
        let annotations = match self.name_strategy {
            NameStrategy::Ner => self.annotations(text),
            NameStrategy::Regex => None,
        };

        ResumeRecord {
            name: extract_name(text, annotations.as_deref(), self.name_strategy),
            email: extract_email(text),
            phone: extract_phone(text),
            skills: extract_skills(&normalized, &self.library),
            certifications: extract_certifications(&normalized, &self.library),
            qualifications: extract_qualifications(&normalized, &self.library),
            projects: extract_projects(text),
            summary: extract_summary(text, &self.library),
            experience: extract_experience(text, &self.library),
        }
    }

    #[must_use]
    pub fn assemble_job_description(&self, text: &str) -> JobDescriptionRecord {
        let normalized = NormalizedText::new(text);
        let annotations = self.annotations(text);

        let (location, organization) = match annotations.as_deref() {
            Some(annotations) => (
                extract_location(annotations),
                extract_organization(annotations),
            ),
            None => (
                extract_location_labelled(text, &self.library),
                extract_organization_labelled(text, &self.library),
            ),
        };

        JobDescriptionRecord {
            job_role: extract_job_role(text, &self.library),
            responsibilities: extract_responsibilities(text),
            location,
            organization,
            domain: extract_domain(&normalized, &self.library),
            date_posted: extract_date_posted(text, self.today()),
        }
    }

    /// `None` when NLP-based extractors must use their fallbacks for this
    /// document: no engine was loaded, or the engine failed on this text.
    fn annotations(&self, text: &str) -> Option<Vec<Annotation>> {
        if !self.annotator.is_available() {
            return None;
        }

        match self.annotator.annotate(text) {
            Ok(annotations) => Some(annotations),
            Err(e) => {
                tracing::warn!(
                    "NER engine '{}' failed, using fallbacks for this document: {}",
                    self.annotator.backend_id(),
                    e
                );
                None
            }
        }
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{AnnotationError, AnnotationResult, EntityLabel};

    const RESUME: &str = "John Doe
john.doe@example.com
(123) 456-7890

Summary: Highly motivated software engineer with experience in Python and Java.

Skills:
Python, Java, SQL, Communication, Leadership

Certifications:
AWS Certified Cloud Practitioner

Qualifications:
Bachelor's Degree in Computer Science

Projects:
Project 1: Developed a web application using Python and Flask.

Experience:
Software Engineer at ABC Company
";

    const JOB: &str = "Job Title: Backend Engineer
Company: Globex Corporation
Location: Austin, TX
Posted on: 03/15/2024

We are a healthcare technology company.

Responsibilities:
- Design and build APIs
- Operate services in production
1. Mentor engineers
";

    struct StaticAnnotator(Vec<Annotation>);

    impl Annotator for StaticAnnotator {
        fn backend_id(&self) -> &str {
            "static"
        }

        fn annotate(&self, _text: &str) -> AnnotationResult<Vec<Annotation>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenAnnotator;

    impl Annotator for BrokenAnnotator {
        fn backend_id(&self) -> &str {
            "broken"
        }

        fn annotate(&self, _text: &str) -> AnnotationResult<Vec<Annotation>> {
            Err(AnnotationError::Failed("model crashed".into()))
        }
    }

    #[test]
    fn test_resume_without_engine() {
        let record = Assembler::new().assemble_resume(RESUME);

        assert_eq!(record.name.as_deref(), Some("John Doe"));
        assert_eq!(record.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(record.phone.as_deref(), Some("(123) 456-7890"));
        assert_eq!(
            record.skills,
            vec!["Python", "Java", "SQL", "Communication", "Leadership", "AWS"]
        );
        assert_eq!(record.certifications, vec!["AWS Certified"]);
        assert_eq!(record.qualifications, vec!["Bachelor's Degree", "Bachelor"]);
        assert_eq!(
            record.projects,
            vec!["1: Developed a web application using Python and Flask."]
        );
        assert_eq!(
            record.summary.as_deref(),
            Some("Summary: Highly motivated software engineer with experience in Python and Java.")
        );
        assert_eq!(
            record.experience.as_deref(),
            Some("experience in Python and Java.")
        );
    }

    #[test]
    fn test_resume_with_engine_prefers_annotations() {
        let assembler = Assembler::new().with_annotator(Box::new(StaticAnnotator(vec![
            Annotation::new("Johnathan Doe", EntityLabel::Person),
        ])));

        let record = assembler.assemble_resume(RESUME);

        assert_eq!(record.name.as_deref(), Some("Johnathan Doe"));
    }

    #[test]
    fn test_regex_strategy_skips_engine() {
        let assembler = Assembler::new()
            .with_annotator(Box::new(BrokenAnnotator))
            .with_name_strategy(NameStrategy::Regex);

        assert_eq!(assembler.assemble_resume(RESUME).name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_engine_failure_degrades_to_fallbacks() {
        let assembler = Assembler::new().with_annotator(Box::new(BrokenAnnotator));

        let resume = assembler.assemble_resume(RESUME);
        let job = assembler.assemble_job_description(JOB);

        assert_eq!(resume.name.as_deref(), Some("John Doe"));
        assert_eq!(job.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_job_description_without_engine() {
        let record = Assembler::new().assemble_job_description(JOB);

        assert_eq!(record.job_role.as_deref(), Some("Backend Engineer"));
        assert_eq!(record.organization.as_deref(), Some("Globex Corporation"));
        assert_eq!(record.location.as_deref(), Some("Austin, TX"));
        assert_eq!(record.date_posted.as_deref(), Some("2024-03-15"));
        assert_eq!(record.domain, vec!["Technology", "Healthcare"]);
        assert_eq!(
            record.responsibilities,
            vec![
                "Design and build APIs",
                "Operate services in production",
                "Mentor engineers",
            ]
        );
    }

    #[test]
    fn test_job_description_with_engine_uses_annotations_only() {
        let assembler = Assembler::new().with_annotator(Box::new(StaticAnnotator(vec![
            Annotation::new("Globex", EntityLabel::Organization),
        ])));

        let record = assembler.assemble_job_description(JOB);

        assert_eq!(record.organization.as_deref(), Some("Globex"));
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_relative_date_uses_reference_date() {
        let assembler = Assembler::new()
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        let record = assembler.assemble_job_description("Rust Engineer\nPosted 10 days ago");

        assert_eq!(record.date_posted.as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn test_empty_text_yields_empty_record() {
        let assembler = Assembler::new();

        assert_eq!(
            assembler.assemble(&Document::resume("")),
            ExtractionRecord::empty(DocumentKind::Resume)
        );
        assert_eq!(
            assembler.assemble(&Document::job_description("")),
            ExtractionRecord::empty(DocumentKind::JobDescription)
        );
    }
}
