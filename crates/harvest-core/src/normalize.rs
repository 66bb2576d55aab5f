//! Case folding for keyword matching.
//!
//! Only case is folded. Punctuation, whitespace and Unicode forms are left
//! untouched because the regex patterns are written against raw text, and
//! values captured by regex are always taken from the raw text.

/// Folds `text` for case-insensitive matching.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Raw document text paired with its folded form, computed once per document.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    raw: &'a str,
    folded: String,
}

impl<'a> NormalizedText<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            folded: normalize(raw),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive substring test. Blank keywords never match.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        if keyword.trim().is_empty() {
            return false;
        }
        self.folded.contains(&normalize(keyword))
    }
}

impl<'a> From<&'a str> for NormalizedText<'a> {
    fn from(raw: &'a str) -> Self {
        Self::new(raw)
    }
}
