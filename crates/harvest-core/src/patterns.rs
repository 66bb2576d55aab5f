//! Static regex patterns and keyword dictionaries used by the field extractors.
//!
//! Regexes written against raw document punctuation live in `LazyLock`
//! statics. Dictionaries and heading/label lists are data: they have built-in
//! defaults and can be overridden from configuration, after which
//! [`PatternLibrary`] compiles the heading and label lists once. Order is
//! significant everywhere: the first matching pattern wins and keyword output
//! follows dictionary order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("email pattern should compile")
});

pub static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern should compile")
});

/// `Firstname Lastname`: two capitalized words separated by whitespace.
pub static FULL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+)\s+([A-Z][a-z]+)").expect("name pattern should compile")
});

pub static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)\bProject\b[ \t]*[:\-]?[ \t]*(\S.*)$")
        .expect("project pattern should compile")
});

pub static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-\x{2022}\x{2023}\x{25E6}\x{2043}][ \t]*(\S.*)$")
        .expect("bullet pattern should compile")
});

pub static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\d+\.[ \t]*(\S.*)$").expect("numbered item pattern should compile")
});

/// Leading run of letters, spaces and hyphens on a line.
pub static LEADING_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*([A-Za-z][A-Za-z \t-]*)").expect("leading words pattern should compile")
});

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// How a date-pattern capture is turned into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCapture {
    /// The capture is a literal date, parsed against [`DATE_FORMATS`].
    Literal,
    /// The capture is a day count relative to the reference date.
    DaysAgo,
}

/// Posting-date patterns, tried in order; group 1 is the capture.
pub static DATE_PATTERNS: LazyLock<Vec<(DateCapture, Regex)>> = LazyLock::new(|| {
    vec![
        (
            DateCapture::Literal,
            Regex::new(r"(?i)Posted on:\s*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})")
                .expect("posted-on pattern should compile"),
        ),
        (
            DateCapture::Literal,
            Regex::new(r"(?i)Date Posted:\s*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})")
                .expect("date-posted pattern should compile"),
        ),
        (
            DateCapture::DaysAgo,
            Regex::new(r"(?i)\b(\d{1,4})\s+days?\s+ago\b")
                .expect("days-ago pattern should compile"),
        ),
        (
            DateCapture::Literal,
            Regex::new(&format!(r"(?i)\b((?:{MONTHS})\s+\d{{1,2}},\s+\d{{4}})\b"))
                .expect("month-name pattern should compile"),
        ),
    ]
});

/// `chrono` formats tried in order against a literal date capture.
pub const DATE_FORMATS: [&str; 5] = ["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%m-%d-%Y", "%d-%m-%Y"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Keyword dictionaries and heading/label lists. Every list can be replaced
/// from configuration; missing entries keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dictionaries {
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub qualifications: Vec<String>,
    pub domains: Vec<String>,
    pub summary_headings: Vec<String>,
    pub experience_headings: Vec<String>,
    pub role_labels: Vec<String>,
    pub location_labels: Vec<String>,
    pub organization_labels: Vec<String>,
}

impl Default for Dictionaries {
    fn default() -> Self {
        Self {
            skills: strings(&[
                "Python",
                "Java",
                "SQL",
                "Communication",
                "Leadership",
                "Management",
                "C++",
                "JavaScript",
                "React",
                "AWS",
                "Azure",
                "Data Analysis",
                "Machine Learning",
                "Project Management",
                "Web Development",
            ]),
            certifications: strings(&[
                "AWS Certified",
                "Microsoft Certified",
                "PMP",
                "CCNA",
                "CompTIA",
            ]),
            qualifications: strings(&[
                "Bachelor's Degree",
                "Master's Degree",
                "PhD",
                "MBA",
                "Bachelor",
                "Master",
                "University",
                "College",
            ]),
            domains: strings(&[
                "Technology",
                "Finance",
                "Healthcare",
                "Education",
                "Marketing",
                "Sales",
                "Engineering",
                "Science",
                "Arts",
                "Retail",
            ]),
            summary_headings: strings(&["Summary", "About Me", "Objective"]),
            experience_headings: strings(&["Experience", "Project", "Work History"]),
            role_labels: strings(&["Role:", "Title:", "Position:", "Job Title:"]),
            location_labels: strings(&["Location:", "City:", "Based in:", "Work Location:"]),
            organization_labels: strings(&["Company:", "Organization:", "Hiring at:", "Posted by:"]),
        }
    }
}

/// Process-wide, read-only pattern set built once before any extraction.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    dictionaries: Dictionaries,
    summary_headings: Vec<Regex>,
    experience_headings: Vec<Regex>,
    role_labels: Vec<Regex>,
    location_labels: Vec<Regex>,
    organization_labels: Vec<Regex>,
}

impl PatternLibrary {
    #[must_use]
    pub fn new(dictionaries: Dictionaries) -> Self {
        Self {
            summary_headings: heading_patterns(&dictionaries.summary_headings),
            experience_headings: heading_patterns(&dictionaries.experience_headings),
            role_labels: labelled_patterns(&dictionaries.role_labels, r"[A-Za-z][A-Za-z \t-]*"),
            location_labels: labelled_patterns(&dictionaries.location_labels, r"[A-Za-z][A-Za-z ,\t]*"),
            organization_labels: labelled_patterns(
                &dictionaries.organization_labels,
                r"[A-Za-z][A-Za-z &.\t]*",
            ),
            dictionaries,
        }
    }

    #[must_use]
    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    pub fn skills(&self) -> &[String] {
        &self.dictionaries.skills
    }

    pub fn certifications(&self) -> &[String] {
        &self.dictionaries.certifications
    }

    pub fn qualifications(&self) -> &[String] {
        &self.dictionaries.qualifications
    }

    pub fn domains(&self) -> &[String] {
        &self.dictionaries.domains
    }

    pub fn summary_headings(&self) -> &[Regex] {
        &self.summary_headings
    }

    pub fn experience_headings(&self) -> &[Regex] {
        &self.experience_headings
    }

    pub fn role_labels(&self) -> &[Regex] {
        &self.role_labels
    }

    pub fn location_labels(&self) -> &[Regex] {
        &self.location_labels
    }

    pub fn organization_labels(&self) -> &[Regex] {
        &self.organization_labels
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(Dictionaries::default())
    }
}

/// Case-insensitive literal match for each non-empty heading.
fn heading_patterns(headings: &[String]) -> Vec<Regex> {
    headings
        .iter()
        .filter(|h| !h.trim().is_empty())
        .filter_map(|h| Regex::new(&format!("(?i){}", regex::escape(h))).ok())
        .collect()
}

/// `<label>` followed by a same-line value drawn from `value_class`; group 1
/// is the value.
fn labelled_patterns(labels: &[String], value_class: &str) -> Vec<Regex> {
    labels
        .iter()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| {
            Regex::new(&format!(r"(?i){}[ \t]*({value_class})", regex::escape(l))).ok()
        })
        .collect()
}
