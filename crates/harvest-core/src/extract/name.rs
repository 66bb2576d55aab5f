use serde::{Deserialize, Serialize};

use super::first_match;
use crate::annotate::{first_labelled, Annotation, EntityLabel};
use crate::patterns::FULL_NAME;

/// How the candidate name is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStrategy {
    /// First `PERSON` annotation; regex when no engine is loaded.
    #[default]
    Ner,
    /// First `Firstname Lastname` match.
    Regex,
}

impl NameStrategy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ner => "ner",
            Self::Regex => "regex",
        }
    }
}

impl std::fmt::Display for NameStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NameStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ner" | "nlp" => Ok(Self::Ner),
            "regex" => Ok(Self::Regex),
            _ => Err(crate::Error::InvalidNameStrategy(s.to_string())),
        }
    }
}

#[must_use]
pub fn extract_name_regex(text: &str) -> Option<String> {
    first_match(&FULL_NAME, text)
}

#[must_use]
pub fn extract_name_ner(annotations: &[Annotation]) -> Option<String> {
    first_labelled(annotations, EntityLabel::Person)
}

/// `annotations` is `None` when no NER engine is loaded for this run, in
/// which case the NER strategy degrades to the regex one.
#[must_use]
pub fn extract_name(
    text: &str,
    annotations: Option<&[Annotation]>,
    strategy: NameStrategy,
) -> Option<String> {
    match (strategy, annotations) {
        (NameStrategy::Ner, Some(annotations)) => extract_name_ner(annotations),
        (NameStrategy::Ner, None) => {
            tracing::debug!("No NER annotations; extracting name by pattern");
            extract_name_regex(text)
        }
        (NameStrategy::Regex, _) => extract_name_regex(text),
    }
}
