//! Model-backed extraction through an OpenAI-compatible chat-completions API.

use std::collections::HashSet;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::LlmConfig;
use crate::extract::normalize_date;
use crate::record::{DocumentKind, ExtractionRecord, JobDescriptionRecord, ResumeRecord};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Endpoint returned {0}: {1}")]
    Status(u16, String),
    #[error("Model returned no content")]
    EmptyResponse,
    #[error("Invalid model output: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type LlmResult<T> = Result<T, LlmError>;

#[async_trait::async_trait]
pub trait LlmExtractor: Send + Sync {
    fn model(&self) -> &str;

    async fn extract(&self, text: &str, kind: DocumentKind) -> LlmResult<ExtractionRecord>;
}

pub struct ChatCompletionsExtractor {
    client: Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl ChatCompletionsExtractor {
    pub fn new(endpoint: Url, model: impl Into<String>, api_key: impl Into<String>) -> LlmResult<Self> {
        Ok(Self::with_client(
            Client::builder().build()?,
            endpoint,
            model,
            api_key,
        ))
    }

    #[must_use]
    pub fn with_client(
        client: Client,
        endpoint: Url,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds the client from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &LlmConfig) -> crate::Result<Self> {
        let endpoint = config.endpoint_url()?;
        let api_key = config
            .api_key()
            .ok_or_else(|| LlmError::MissingApiKey(config.api_key_env.clone()))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(LlmError::from)?;

        Ok(Self::with_client(client, endpoint, &config.model, api_key))
    }

    fn request_body(&self, text: &str, kind: DocumentKind) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt(kind) },
                { "role": "user", "content": text },
            ],
        })
    }
}

#[async_trait::async_trait]
impl LlmExtractor for ChatCompletionsExtractor {
    fn model(&self) -> &str {
        &self.model
    }

    async fn extract(&self, text: &str, kind: DocumentKind) -> LlmResult<ExtractionRecord> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text, kind))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16(), body));
        }

        parse_response(kind, &body)
    }
}

fn system_prompt(kind: DocumentKind) -> String {
    let (document, fields): (&str, &[&str]) = match kind {
        DocumentKind::Resume => ("resume", &ResumeRecord::FIELDS),
        DocumentKind::JobDescription => ("job description", &JobDescriptionRecord::FIELDS),
    };

    format!(
        "Extract structured fields from the {document} supplied by the user. \
         Reply with a single JSON object whose keys are exactly: {}. \
         Use null for a missing single value and [] for a missing list. \
         Dates must be YYYY-MM-DD.",
        fields.join(", ")
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

fn parse_response(kind: DocumentKind, body: &str) -> LlmResult<ExtractionRecord> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)?;

    let record = ExtractionRecord::from_json(kind, strip_fence(&content))?;
    Ok(tidy(record))
}

/// Some models wrap JSON in a Markdown code fence despite `json_object`.
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

/// Brings model output in line with rule-based records: blank values become
/// missing, lists are deduplicated and dates are re-rendered as `YYYY-MM-DD`.
fn tidy(record: ExtractionRecord) -> ExtractionRecord {
    match record {
        ExtractionRecord::Resume(r) => ResumeRecord {
            name: present(r.name),
            email: present(r.email),
            phone: present(r.phone),
            skills: dedupe(r.skills),
            certifications: dedupe(r.certifications),
            qualifications: dedupe(r.qualifications),
            projects: dedupe(r.projects),
            summary: present(r.summary),
            experience: present(r.experience),
        }
        .into(),
        ExtractionRecord::JobDescription(r) => JobDescriptionRecord {
            job_role: present(r.job_role),
            responsibilities: dedupe(r.responsibilities),
            location: present(r.location),
            organization: present(r.organization),
            domain: dedupe(r.domain),
            date_posted: present(r.date_posted).and_then(|d| normalize_date(&d)),
        }
        .into(),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ChatCompletionsExtractor {
        ChatCompletionsExtractor::new(
            Url::parse("http://localhost:8080/v1/chat/completions").unwrap(),
            "test-model",
            "sk-test",
        )
        .unwrap()
    }

    fn chat(content: &str) -> String {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
            .to_string()
    }

    #[test]
    fn test_request_body_names_schema_fields() {
        let body = extractor().request_body("Jane Smith", DocumentKind::JobDescription);

        assert_eq!(body["model"], "test-model");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][1]["content"], "Jane Smith");

        let prompt = body["messages"][0]["content"].as_str().unwrap();
        for field in JobDescriptionRecord::FIELDS {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
        assert!(!prompt.contains("certifications"));
    }

    #[test]
    fn test_parse_resume_response() {
        let body = chat(
            r#"{"name": " Jane Smith ", "email": "", "skills": ["Rust", "Rust", "SQL"], "projects": null}"#,
        );

        let record = parse_response(DocumentKind::Resume, &body).unwrap();
        let resume = record.as_resume().unwrap();

        assert_eq!(resume.name.as_deref(), Some("Jane Smith"));
        assert_eq!(resume.email, None);
        assert_eq!(resume.skills, vec!["Rust", "SQL"]);
        assert!(resume.projects.is_empty());
    }

    #[test]
    fn test_parse_job_response_normalizes_date() {
        let body = chat(
            "```json\n{\"job_role\": \"Data Engineer\", \"date_posted\": \"March 15, 2024\"}\n```",
        );

        let record = parse_response(DocumentKind::JobDescription, &body).unwrap();
        let job = record.as_job_description().unwrap();

        assert_eq!(job.job_role.as_deref(), Some("Data Engineer"));
        assert_eq!(job.date_posted.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn test_unparseable_model_date_is_dropped() {
        let body = chat(r#"{"date_posted": "last Tuesday"}"#);

        let record = parse_response(DocumentKind::JobDescription, &body).unwrap();

        assert_eq!(record.as_job_description().unwrap().date_posted, None);
    }

    #[test]
    fn test_empty_and_invalid_responses() {
        assert!(matches!(
            parse_response(DocumentKind::Resume, r#"{"choices": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(DocumentKind::Resume, &chat("   ")),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(DocumentKind::Resume, &chat("I could not find a name.")),
            Err(LlmError::Decode(_))
        ));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = LlmConfig {
            api_key_env: "HARVEST_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..LlmConfig::default()
        };

        assert!(matches!(
            ChatCompletionsExtractor::from_config(&config),
            Err(crate::Error::Llm(LlmError::MissingApiKey(_)))
        ));
    }

    #[test]
    fn test_strip_fence() {
        assert_eq!(strip_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_fence("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_fence("  {}  "), "{}");
    }
}
