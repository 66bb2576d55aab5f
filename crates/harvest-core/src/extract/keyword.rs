use crate::normalize::NormalizedText;
use crate::patterns::PatternLibrary;

/// Dictionary keywords found in `text`, in dictionary order, without
/// duplicates.
#[must_use]
pub fn extract_keywords(text: &NormalizedText<'_>, dictionary: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for keyword in dictionary {
        if text.contains(keyword) && !found.contains(keyword) {
            found.push(keyword.clone());
        }
    }

    found
}

#[must_use]
pub fn extract_skills(text: &NormalizedText<'_>, library: &PatternLibrary) -> Vec<String> {
    extract_keywords(text, library.skills())
}

#[must_use]
pub fn extract_certifications(text: &NormalizedText<'_>, library: &PatternLibrary) -> Vec<String> {
    extract_keywords(text, library.certifications())
}

#[must_use]
pub fn extract_qualifications(text: &NormalizedText<'_>, library: &PatternLibrary) -> Vec<String> {
    extract_keywords(text, library.qualifications())
}

#[must_use]
pub fn extract_domain(text: &NormalizedText<'_>, library: &PatternLibrary) -> Vec<String> {
    extract_keywords(text, library.domains())
}
