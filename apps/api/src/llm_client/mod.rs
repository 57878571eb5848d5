/// LLM Client: the single point of entry for all Gemini API calls in Pagesmith.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All provider interactions MUST go through this module.
///
/// Calls are single-attempt. Failures are surfaced to the workflow, which
/// decides which stable stage to fall back to; nothing here retries.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fast model used for the draft outline.
pub const OUTLINE_MODEL: &str = "gemini-2.5-flash";
/// Model used for detail fill-in, auto content and one-shot pages.
pub const DETAIL_MODEL: &str = "gemini-2.5-pro";
/// Image-capable model used for section images.
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM response contained no image payload")]
    NoImage,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig<'a> {
    aspect_ratio: &'a str,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Part {
    fn text(text: &str) -> Self {
        Part {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .into_iter()
            .flat_map(|c| c.content.parts.iter())
    }

    /// Extracts the text content from the first text part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    /// Returns the first inline image of the first candidate as a `data:` URL.
    pub fn image_data_url(&self) -> Option<String> {
        self.parts()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single provider client used by all services in Pagesmith.
/// Wraps the Gemini generateContent API with structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a raw generateContent call, returning the full response object.
    async fn call(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    /// Calls the model in JSON mode and deserializes the text response.
    /// The prompt must describe the expected JSON shape.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let request = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system)],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json"),
                ..Default::default()
            },
        };

        let response = self.call(model, &request).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }

    /// Generates a single 16:9 image. When `base_image` (a `data:` URL) is given,
    /// it is sent alongside the prompt as the reference product shot.
    pub async fn call_image(
        &self,
        model: &str,
        prompt: &str,
        base_image: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut parts = Vec::with_capacity(2);
        if let Some((mime_type, data)) = base_image.and_then(split_data_url) {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                }),
            });
        }
        parts.push(Part::text(prompt));

        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["TEXT", "IMAGE"]),
                image_config: Some(ImageConfig {
                    aspect_ratio: "16:9",
                }),
                ..Default::default()
            },
        };

        let response = self.call(model, &request).await?;
        response.image_data_url().ok_or(LlmError::NoImage)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Splits `data:<mime>;base64,<payload>` into `(mime, payload)`.
/// A bare base64 payload without a header is treated as PNG.
fn split_data_url(url: &str) -> Option<(&str, &str)> {
    match url.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|h| h.split(';').next())
                .filter(|m| !m.is_empty())
                .unwrap_or("image/png");
            Some((mime, data)).filter(|(_, d)| !d.is_empty())
        }
        None if !url.is_empty() => Some(("image/png", url)),
        None => None,
    }
}
