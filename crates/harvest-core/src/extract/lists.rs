use crate::patterns::{BULLET_ITEM, NUMBERED_ITEM, PROJECT_LINE};

use regex::Regex;

fn line_captures(pattern: &Regex, text: &str) -> impl Iterator<Item = String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
}

/// Text following each `Project` label, in document order.
#[must_use]
pub fn extract_projects(text: &str) -> Vec<String> {
    line_captures(&PROJECT_LINE, text).collect()
}

/// Bulleted items first, then numbered items, each group in document order.
#[must_use]
pub fn extract_responsibilities(text: &str) -> Vec<String> {
    line_captures(&BULLET_ITEM, text)
        .chain(line_captures(&NUMBERED_ITEM, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects() {
        let text = "Projects:\nProject 1: Developed a web application using Python and Flask.\n\
                    project - Data pipeline\r\nExperience:";

        assert_eq!(
            extract_projects(text),
            vec![
                "1: Developed a web application using Python and Flask.",
                "Data pipeline",
            ]
        );
    }

    #[test]
    fn test_no_projects() {
        assert!(extract_projects("Experience at ABC Company").is_empty());
    }

    #[test]
    fn test_responsibilities_bullets_then_numbers() {
        let text = "Responsibilities:\n\
                    1. Own the deployment pipeline\n\
                    - Design APIs\n\
                    \u{2022} Mentor junior engineers\n\
                    2. Review code\n";

        assert_eq!(
            extract_responsibilities(text),
            vec![
                "Design APIs",
                "Mentor junior engineers",
                "Own the deployment pipeline",
                "Review code",
            ]
        );
    }

    #[test]
    fn test_hyphenated_words_are_not_bullets() {
        assert!(extract_responsibilities("A full-time, on-site role").is_empty());
    }

    #[test]
    fn test_crlf_lines_are_trimmed() {
        assert_eq!(
            extract_responsibilities("- Ship features\r\n- Fix bugs\r\n"),
            vec!["Ship features", "Fix bugs"]
        );
    }
}
