//! One pure function per record field.
//!
//! Extractors never fail: a missing signal yields `None` or an empty list for
//! that field only.

mod contact;
mod date;
mod entity;
mod keyword;
mod lists;
mod name;
mod section;

pub use contact::{extract_email, extract_phone};
pub use date::{extract_date_posted, normalize_date, parse_date};
pub use entity::{
    extract_job_role, extract_location, extract_location_labelled, extract_organization,
    extract_organization_labelled,
};
pub use keyword::{
    extract_certifications, extract_domain, extract_keywords, extract_qualifications,
    extract_skills,
};
pub use lists::{extract_projects, extract_responsibilities};
pub use name::{extract_name, extract_name_ner, extract_name_regex, NameStrategy};
pub use section::{extract_experience, extract_section_line, extract_summary};

use regex::Regex;

/// First match of `pattern`, verbatim.
fn first_match(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().to_string())
}

/// First non-blank capture of group 1 across `patterns`, in order.
fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|value| !value.is_empty())
            .map(String::from)
    })
}
