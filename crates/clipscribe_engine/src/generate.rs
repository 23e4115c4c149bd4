use std::time::Duration;

use engine_logging::engine_debug;
use serde::{Deserialize, Serialize};

use crate::{Credential, FailureKind, GenerateError};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Recipe prompt sent alongside every video.
pub const DEFAULT_PROMPT: &str = "\
Write a detailed recipe based on the video, strictly as Markdown.
Requirements:
1. The first line must be the recipe name as a level-one heading (#).
2. Include an \"Ingredients\" section as an unordered list.
3. Include a \"Steps\" section as an ordered list.
4. Output the Markdown directly; never wrap it in a code block (```).
5. No extra conversation, preamble or closing remarks.
6. Estimate ingredient and seasoning quantities from the video and state them precisely.
7. Finish with a technical summary and name the key ingredient that defines the dish.
";

/// Produces generated text for one input with one credential.
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, credential: &Credential, input: &str)
        -> Result<String, GenerateError>;
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model: String,
    pub prompt: String,
    pub mime_type: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub proxy: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            mime_type: "video/mp4".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Video understanding calls routinely take minutes.
            request_timeout: Duration::from_secs(300),
            proxy: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    file_uri: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Gemini `generateContent` client that feeds the input URL as video file data.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerateError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout);
        if let Some(proxy_url) = settings.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|err| GenerateError::new(FailureKind::Network, err.to_string()))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| GenerateError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait::async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate(
        &self,
        credential: &Credential,
        input: &str,
    ) -> Result<String, GenerateError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        file_data: Some(FileData {
                            file_uri: input,
                            mime_type: &self.settings.mime_type,
                        }),
                        text: None,
                    },
                    Part {
                        file_data: None,
                        text: Some(&self.settings.prompt),
                    },
                ],
            }],
        };

        engine_debug!(
            "generateContent model={} credential={} input={}",
            self.settings.model,
            credential,
            input
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| GenerateError::new(FailureKind::InvalidResponse, err.to_string()))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerateError::new(
                FailureKind::Blocked {
                    reason: reason.clone(),
                },
                format!("prompt blocked: {reason}"),
            ));
        }

        let text: String = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        Ok(strip_code_fence(&text))
    }
}

/// Map a non-success response to a failure, spotting quota exhaustion.
fn classify_failure(status: u16, body: &str) -> GenerateError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let exhausted = envelope
        .as_ref()
        .is_some_and(|env| env.error.status == "RESOURCE_EXHAUSTED");
    let message = envelope
        .map(|env| env.error.message)
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    if status == 429 || exhausted {
        GenerateError::new(FailureKind::RateLimited, message)
    } else {
        GenerateError::new(FailureKind::HttpStatus(status), message)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        return GenerateError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return GenerateError::new(FailureKind::InvalidResponse, err.to_string());
    }
    GenerateError::new(FailureKind::Network, err.to_string())
}

/// Remove a wrapping ```` ``` ```` / ```` ```markdown ```` fence some models add anyway.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim_start();
    let Some(after_fence) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };
    // Drop the info string (`markdown`, `md`, ...) on the opening line.
    let body = after_fence
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default()
        .trim_end();
    body.strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}
