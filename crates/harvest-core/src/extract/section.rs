use regex::Regex;

use crate::patterns::PatternLibrary;

/// Single-line section heuristic: for the first heading (in list order) that
/// occurs in `text`, returns the text from its first occurrence to the end of
/// that line.
#[must_use]
pub fn extract_section_line(text: &str, headings: &[Regex]) -> Option<String> {
    headings.iter().find_map(|heading| {
        let start = heading.find(text)?.start();
        let rest = &text[start..];
        let line = rest.split(['\n', '\r']).next().unwrap_or(rest).trim();
        (!line.is_empty()).then(|| line.to_string())
    })
}

#[must_use]
pub fn extract_summary(text: &str, library: &PatternLibrary) -> Option<String> {
    extract_section_line(text, library.summary_headings())
}

#[must_use]
pub fn extract_experience(text: &str, library: &PatternLibrary) -> Option<String> {
    extract_section_line(text, library.experience_headings())
}
