use serde::{Deserialize, Deserializer, Serialize};

/// Which record schema a document is extracted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Resume,
    JobDescription,
}

impl DocumentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::JobDescription => "job_description",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "resume" | "cv" => Ok(Self::Resume),
            "job_description" | "job" | "jd" => Ok(Self::JobDescription),
            _ => Err(crate::Error::InvalidDocumentKind(s.to_string())),
        }
    }
}

/// Decoded text of one file, alive only while it is being processed.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: DocumentKind,
    pub text: String,
}

impl Document {
    #[must_use]
    pub fn new(kind: DocumentKind, text: String) -> Self {
        Self { kind, text }
    }

    #[must_use]
    pub fn resume(text: impl Into<String>) -> Self {
        Self::new(DocumentKind::Resume, text.into())
    }

    #[must_use]
    pub fn job_description(text: impl Into<String>) -> Self {
        Self::new(DocumentKind::JobDescription, text.into())
    }
}

/// `null` and missing lists both decode to an empty list.
fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub qualifications: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub projects: Vec<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
}

impl ResumeRecord {
    pub const FIELDS: [&'static str; 9] = [
        "name",
        "email",
        "phone",
        "skills",
        "certifications",
        "qualifications",
        "projects",
        "summary",
        "experience",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptionRecord {
    pub job_role: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub responsibilities: Vec<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub domain: Vec<String>,
    /// `YYYY-MM-DD`
    pub date_posted: Option<String>,
}

impl JobDescriptionRecord {
    pub const FIELDS: [&'static str; 6] = [
        "job_role",
        "responsibilities",
        "location",
        "organization",
        "domain",
        "date_posted",
    ];
}

/// One document's extracted fields. Serializes to a flat JSON object whose
/// keys are exactly the schema's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractionRecord {
    Resume(ResumeRecord),
    JobDescription(JobDescriptionRecord),
}

impl ExtractionRecord {
    #[must_use]
    pub fn empty(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Resume => Self::Resume(ResumeRecord::default()),
            DocumentKind::JobDescription => Self::JobDescription(JobDescriptionRecord::default()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Resume(_) => DocumentKind::Resume,
            Self::JobDescription(_) => DocumentKind::JobDescription,
        }
    }

    #[must_use]
    pub fn as_resume(&self) -> Option<&ResumeRecord> {
        match self {
            Self::Resume(record) => Some(record),
            Self::JobDescription(_) => None,
        }
    }

    #[must_use]
    pub fn as_job_description(&self) -> Option<&JobDescriptionRecord> {
        match self {
            Self::JobDescription(record) => Some(record),
            Self::Resume(_) => None,
        }
    }

    /// Decodes a JSON object into the schema for `kind`.
    pub fn from_json(kind: DocumentKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            DocumentKind::Resume => Self::Resume(serde_json::from_str(json)?),
            DocumentKind::JobDescription => Self::JobDescription(serde_json::from_str(json)?),
        })
    }
}

impl From<ResumeRecord> for ExtractionRecord {
    fn from(record: ResumeRecord) -> Self {
        Self::Resume(record)
    }
}

impl From<JobDescriptionRecord> for ExtractionRecord {
    fn from(record: JobDescriptionRecord) -> Self {
        Self::JobDescription(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(value: &serde_json::Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn sorted(fields: &[&str]) -> Vec<String> {
        let mut fields: Vec<String> = fields.iter().map(|f| (*f).to_string()).collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_empty_resume_serializes_nulls_and_lists() {
        let value = serde_json::to_value(ExtractionRecord::empty(DocumentKind::Resume)).unwrap();

        assert_eq!(keys(&value), sorted(&ResumeRecord::FIELDS));
        assert!(value["name"].is_null());
        assert_eq!(value["skills"], serde_json::json!([]));
        assert!(value["experience"].is_null());
    }

    #[test]
    fn test_empty_job_description_serializes_nulls_and_lists() {
        let value =
            serde_json::to_value(ExtractionRecord::empty(DocumentKind::JobDescription)).unwrap();

        assert_eq!(keys(&value), sorted(&JobDescriptionRecord::FIELDS));
        assert!(value["date_posted"].is_null());
        assert_eq!(value["domain"], serde_json::json!([]));
    }

    #[test]
    fn test_from_json_tolerates_nulls_and_missing_keys() {
        let record = ExtractionRecord::from_json(
            DocumentKind::Resume,
            r#"{"name": "Jane Smith", "skills": null, "summary": "Engineer"}"#,
        )
        .unwrap();

        let resume = record.as_resume().unwrap();
        assert_eq!(resume.name.as_deref(), Some("Jane Smith"));
        assert!(resume.skills.is_empty());
        assert!(resume.projects.is_empty());
        assert_eq!(resume.summary.as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("resume".parse::<DocumentKind>().unwrap(), DocumentKind::Resume);
        assert_eq!(
            "job-description".parse::<DocumentKind>().unwrap(),
            DocumentKind::JobDescription
        );
        assert_eq!("JD".parse::<DocumentKind>().unwrap(), DocumentKind::JobDescription);
        assert!("memo".parse::<DocumentKind>().is_err());
        assert_eq!(DocumentKind::JobDescription.to_string(), "job_description");
    }
}
