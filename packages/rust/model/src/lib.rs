//! External model collaboration.
//!
//! The model restructures document prose (grammar, flow, academic tone,
//! section ordering) while the rest of the pipeline stays deterministic.
//! [`OpenAiClient`] talks to any OpenAI-compatible chat completions API;
//! [`StubModelClient`] passes text through untouched for offline runs and
//! tests.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use paperform_shared::{CitationStyle, DocumentMetadata, ModelConfig, PaperformError, Result};

/// Hard cap on content characters sent to the model. Longer documents are
/// truncated at the last paragraph break under the cap.
const MAX_CONTENT_CHARS: usize = 24_000;

const SYSTEM_PROMPT: &str = "You are an academic writing assistant. Restructure the \
document you are given: fix grammar, improve flow and academic tone, and order \
sections appropriately for the requested citation style. Do not invent citations, \
facts, or content. Do not add a title page or bibliography; only return the body. \
Respond with a JSON object: {\"body\": \"<restructured text>\", \"missing\": \
[\"<description of information the document lacks>\", ...]}.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Everything the model needs to restructure one document.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Plain-text document content.
    pub content: String,
    /// Target citation style.
    pub style: CitationStyle,
    /// One-paragraph summary of the style's formatting rules.
    pub rule_summary: String,
    /// User-supplied metadata, passed along for context.
    pub metadata: DocumentMetadata,
}

/// The model's answer: restructured body plus any gaps it noticed.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelResponse {
    /// Restructured document body.
    pub body: String,
    /// Information the model found missing (unreferenced claims, absent
    /// sections). Merged with deterministic analysis downstream.
    #[serde(default)]
    pub missing: Vec<String>,
}

/// A collaborator that restructures document text.
pub trait ModelClient: Send + Sync {
    fn restructure(
        &self,
        request: &ModelRequest,
    ) -> impl std::future::Future<Output = Result<ModelResponse>> + Send;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: Url,
    model_id: String,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client from config. Reads the API key from the configured
    /// environment variable.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            PaperformError::config(format!(
                "model API key not found in {} environment variable",
                config.api_key_env
            ))
        })?;

        let base = Url::parse(&config.base_url)
            .map_err(|e| PaperformError::config(format!("invalid model base URL: {e}")))?;
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            base.as_str().trim_end_matches('/')
        ))
        .map_err(|e| PaperformError::config(format!("invalid model base URL: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaperformError::ExternalService(format!("http client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            model_id: config.model_id.clone(),
            api_key,
        })
    }

    async fn call(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model_id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PaperformError::ExternalService(format!("model request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaperformError::ExternalService(format!(
                "model API returned {status}: {}",
                body.chars().take(300).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PaperformError::ExternalService(format!("malformed API response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PaperformError::ExternalService("model returned no choices".into()))
    }
}

impl ModelClient for OpenAiClient {
    #[instrument(skip_all, fields(style = %request.style, chars = request.content.len()))]
    async fn restructure(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let user = build_user_prompt(request);
        let content = self.call(SYSTEM_PROMPT, &user).await?;
        let response = parse_model_payload(&content)?;
        debug!(
            body_chars = response.body.len(),
            flags = response.missing.len(),
            "model restructure complete"
        );
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Prompt construction and payload parsing
// ---------------------------------------------------------------------------

fn build_user_prompt(request: &ModelRequest) -> String {
    let mut prompt = format!(
        "Citation style: {}\nStyle rules: {}\n",
        request.style, request.rule_summary
    );

    let metadata = &request.metadata;
    let known: Vec<String> = [
        ("Title", metadata.title.as_deref()),
        ("Author", metadata.author.as_deref()),
        ("Course", metadata.course.as_deref()),
        ("Instructor", metadata.instructor.as_deref()),
        ("Due date", metadata.due_date.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
    .collect();
    if !known.is_empty() {
        prompt.push_str(&format!("Document metadata:\n{}\n", known.join("\n")));
    }

    prompt.push_str("\nDocument:\n");
    prompt.push_str(&truncate_content(&request.content));
    prompt
}

/// Truncate over-long content at the last paragraph break under the cap.
fn truncate_content(content: &str) -> &str {
    if content.len() <= MAX_CONTENT_CHARS {
        return content;
    }
    // The cap is in bytes; back it up so the slice stays on a char boundary.
    let mut limit = MAX_CONTENT_CHARS;
    while !content.is_char_boundary(limit) {
        limit -= 1;
    }
    let cut = content[..limit].rfind("\n\n").unwrap_or(limit);
    warn!(
        original = content.len(),
        truncated = cut,
        "content truncated for model request"
    );
    &content[..cut]
}

/// Parse the model's reply. Accepts the requested JSON shape (optionally
/// inside a code fence); a plain-text reply is treated as the body with no
/// flags. Empty or broken-JSON replies are external service errors.
pub fn parse_model_payload(content: &str) -> Result<ModelResponse> {
    let trimmed = strip_code_fence(content.trim());

    if trimmed.is_empty() {
        return Err(PaperformError::ExternalService(
            "model returned empty content".into(),
        ));
    }

    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed).map_err(|e| {
            PaperformError::ExternalService(format!("malformed model payload: {e}"))
        });
    }

    // The model ignored the JSON instruction; take its text as the body.
    Ok(ModelResponse {
        body: trimmed.to_string(),
        missing: Vec::new(),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the info string ("json") on the fence line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ---------------------------------------------------------------------------
// Offline stub
// ---------------------------------------------------------------------------

/// Pass-through client for `--offline` runs and tests: the body comes back
/// unchanged and no flags are raised.
#[derive(Debug, Default, Clone)]
pub struct StubModelClient;

impl ModelClient for StubModelClient {
    async fn restructure(&self, request: &ModelRequest) -> Result<ModelResponse> {
        Ok(ModelResponse {
            body: request.content.clone(),
            missing: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_payload() {
        let response =
            parse_model_payload(r#"{"body": "Restructured.", "missing": ["No conclusion"]}"#)
                .unwrap();
        assert_eq!(response.body, "Restructured.");
        assert_eq!(response.missing, vec!["No conclusion"]);
    }

    #[test]
    fn missing_field_defaults_to_empty() {
        let response = parse_model_payload(r#"{"body": "Just a body."}"#).unwrap();
        assert!(response.missing.is_empty());
    }

    #[test]
    fn parses_fenced_json_payload() {
        let fenced = "```json\n{\"body\": \"Fenced.\", \"missing\": []}\n```";
        let response = parse_model_payload(fenced).unwrap();
        assert_eq!(response.body, "Fenced.");
    }

    #[test]
    fn plain_text_falls_back_to_body() {
        let response = parse_model_payload("The model just wrote prose.").unwrap();
        assert_eq!(response.body, "The model just wrote prose.");
        assert!(response.missing.is_empty());
    }

    #[test]
    fn empty_reply_is_an_error() {
        let err = parse_model_payload("   ").unwrap_err();
        assert!(matches!(err, PaperformError::ExternalService(_)));
    }

    #[test]
    fn broken_json_is_an_error() {
        let err = parse_model_payload(r#"{"body": "unterminated"#).unwrap_err();
        assert!(matches!(err, PaperformError::ExternalService(_)));
    }

    #[test]
    fn prompt_includes_metadata_and_rules() {
        let request = ModelRequest {
            content: "Body text.".into(),
            style: CitationStyle::Apa,
            rule_summary: "APA rules here".into(),
            metadata: DocumentMetadata {
                title: Some("My Paper".into()),
                author: Some("Jane Doe".into()),
                ..Default::default()
            },
        };
        let prompt = build_user_prompt(&request);
        assert!(prompt.contains("Citation style: apa"));
        assert!(prompt.contains("APA rules here"));
        assert!(prompt.contains("Title: My Paper"));
        assert!(prompt.contains("Author: Jane Doe"));
        assert!(prompt.contains("Body text."));
    }

    #[test]
    fn truncation_respects_paragraph_breaks() {
        let mut content = String::new();
        while content.len() <= MAX_CONTENT_CHARS {
            content.push_str("A paragraph of filler text that repeats itself.\n\n");
        }
        let truncated = truncate_content(&content);
        assert!(truncated.len() <= MAX_CONTENT_CHARS);
        assert!(truncated.ends_with('.'));
    }

    #[test]
    fn truncation_lands_on_char_boundaries() {
        // No paragraph breaks, and the byte cap falls inside a 2-byte char.
        let content = format!("a{}", "é".repeat(MAX_CONTENT_CHARS));
        let truncated = truncate_content(&content);
        assert!(truncated.len() <= MAX_CONTENT_CHARS);
        assert!(content.is_char_boundary(truncated.len()));
        assert!(truncated.ends_with('é'));
    }

    #[tokio::test]
    async fn stub_client_passes_content_through() {
        let request = ModelRequest {
            content: "Unchanged text.".into(),
            style: CitationStyle::Mla,
            rule_summary: String::new(),
            metadata: DocumentMetadata::default(),
        };
        let response = StubModelClient.restructure(&request).await.unwrap();
        assert_eq!(response.body, "Unchanged text.");
        assert!(response.missing.is_empty());
    }
}
