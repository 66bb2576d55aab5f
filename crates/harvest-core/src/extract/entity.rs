use super::first_capture;
use crate::annotate::{first_labelled, Annotation, EntityLabel};
use crate::patterns::{PatternLibrary, LEADING_WORDS};

/// First `LOCATION` span; empty without an engine.
#[must_use]
pub fn extract_location(annotations: &[Annotation]) -> Option<String> {
    first_labelled(annotations, EntityLabel::Location)
}

/// First `ORGANIZATION` span; empty without an engine.
#[must_use]
pub fn extract_organization(annotations: &[Annotation]) -> Option<String> {
    first_labelled(annotations, EntityLabel::Organization)
}

/// Value after the first matching location label, e.g. `Location: Austin, TX`.
#[must_use]
pub fn extract_location_labelled(text: &str, library: &PatternLibrary) -> Option<String> {
    first_capture(library.location_labels(), text)
        .map(|value| value.trim_end_matches([',', ' ', '\t']).to_string())
        .filter(|value| !value.is_empty())
}

/// Value after the first matching organization label, e.g. `Company: Acme Inc.`.
#[must_use]
pub fn extract_organization_labelled(text: &str, library: &PatternLibrary) -> Option<String> {
    first_capture(library.organization_labels(), text)
}

/// Labelled title (`Role:`, `Title:`, ...) or else the leading words of the
/// first non-blank line.
#[must_use]
pub fn extract_job_role(text: &str, library: &PatternLibrary) -> Option<String> {
    first_capture(library.role_labels(), text).or_else(|| {
        let first_line = text.trim_start().lines().next()?;
        LEADING_WORDS
            .captures(first_line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|role| !role.is_empty())
    })
}
