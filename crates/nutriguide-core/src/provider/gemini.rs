//! Google Generative Language API client.
//!
//! Sends a single-turn `generateContent` call with `responseMimeType` set to
//! `application/json` and the request's schema as `responseSchema`, then
//! returns the text of the first candidate.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::trait_def::GenerationService;
use super::types::{GenerationError, GenerationRequest};

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Base URL for the v1beta API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-request wall time limit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
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
struct ApiErrorBody {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Gemini structured-output client.
///
/// Built once at startup and handed to the [`crate::generate::Generator`].
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `api_key` with the default model and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingApiKey`] for a blank key and
    /// [`GenerationError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another endpoint (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(request: &GenerationRequest) -> GeminiRequest<'_> {
        GeminiRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
            },
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
        if let Some(error) = response.error {
            return Err(GenerationError::Refused(error.message));
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next());

        let Some(candidate) = candidate else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(GenerationError::Refused(format!("prompt blocked: {reason}")));
            }
            return Err(GenerationError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            tracing::warn!(
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                "gemini candidate carried no text"
            );
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    /// Build an error from a non-2xx response, preferring the API's own message.
    fn map_api_error(status: u16, body: &str) -> GenerationError {
        let message = serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.trim().to_owned(), |e| e.message);
        GenerationError::Api { status, message }
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = Self::build_body(request);

        tracing::debug!(kind = %request.kind, model = %self.model, "sending gemini request");

        // Key travels in a header so it never shows up in URL-bearing errors.
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::error!(status = %status, kind = %request.kind, "gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &text));
        }

        let envelope: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Api {
                status: status.as_u16(),
                message: format!("unreadable response envelope: {e}"),
            })?;

        Self::extract_text(envelope)
    }
}
