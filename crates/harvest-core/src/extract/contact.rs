use super::first_match;
use crate::patterns::{EMAIL, PHONE};

#[must_use]
pub fn extract_email(text: &str) -> Option<String> {
    first_match(&EMAIL, text)
}

#[must_use]
pub fn extract_phone(text: &str) -> Option<String> {
    first_match(&PHONE, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_verbatim() {
        assert_eq!(
            extract_email("Reach me at a.b@x.com now"),
            Some("a.b@x.com".into())
        );
    }

    #[test]
    fn test_email_first_of_many() {
        assert_eq!(
            extract_email("jane@work.io or jane.smith+cv@home.org"),
            Some("jane@work.io".into())
        );
    }

    #[test]
    fn test_no_contact_info() {
        assert_eq!(extract_email("no contact info here"), None);
        assert_eq!(extract_phone("no contact info here"), None);
    }

    #[test]
    fn test_phone_separators() {
        assert_eq!(extract_phone("Tel: (123) 456-7890"), Some("(123) 456-7890".into()));
        assert_eq!(extract_phone("call 987.654.3210 today"), Some("987.654.3210".into()));
        assert_eq!(extract_phone("5551234567"), Some("5551234567".into()));
    }

    #[test]
    fn test_phone_too_short() {
        assert_eq!(extract_phone("ext 12-345"), None);
    }
}
