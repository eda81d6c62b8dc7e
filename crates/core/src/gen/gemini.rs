// crates/core/src/gen/gemini.rs
//! Gemini image API client.
//!
//! Calls `models/{model}:generateContent` with image response modality,
//! decodes the inline image data, and writes the PNG into the requested
//! output directory. Failures are classified into the
//! [`GenerationError`] taxonomy at this boundary; everything downstream
//! only sees the resulting message.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::provider::ImageGenerator;
use super::types::{GeneratedImage, GenerationError, GenerationRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL_NAME: &str = "gemini-3-pro-image-preview";
const MAX_OUTPUT_TOKENS: u32 = 32768;
const TEMPERATURE: f32 = 1.0;
const TOP_P: f32 = 0.95;

/// Image generator backed by the Gemini API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiGenerator {
    /// Create a generator using the production Gemini endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: MODEL_NAME.to_string(),
        }
    }

    /// Override the endpoint base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn call_api(&self, body: &GenerateContentBody) -> Result<GenerateContentResponse, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, text));
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

#[async_trait]
impl ImageGenerator for GeminiGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedImage, GenerationError> {
        let t0 = std::time::Instant::now();
        tracing::info!(
            model = %self.model,
            aspect_ratio = %request.aspect_ratio,
            resolution = %request.resolution,
            "gemini: requesting image"
        );

        let body = GenerateContentBody::for_request(&request);
        let response = self.call_api(&body).await?;

        let data = response
            .first_inline_data()
            .ok_or(GenerationError::EmptyResponse)?;
        let bytes = BASE64
            .decode(data)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        // Probe dimensions before touching the filesystem; a malformed
        // payload should fail as a decode error, not a half-written file.
        let probe = image::load_from_memory(&bytes)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        let (width, height) = (probe.width(), probe.height());

        tokio::fs::create_dir_all(&request.output_dir).await?;
        let filename = format!(
            "{}_{}.png",
            request.filename_prefix,
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = request.output_dir.join(filename);
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            width,
            height,
            path = %path.display(),
            "gemini: image written"
        );

        Ok(GeneratedImage { path, width, height })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map an HTTP failure from the API into the error taxonomy.
///
/// Status codes are checked first, then the body text, so quota errors
/// reported as 429 and as plain text both land in the same bucket.
fn classify_api_error(status: reqwest::StatusCode, body: String) -> GenerationError {
    let lowered = body.to_ascii_lowercase();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || lowered.contains("quota") {
        GenerationError::QuotaExceeded(body)
    } else if status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
        || lowered.contains("authentication")
        || lowered.contains("api key")
    {
        GenerationError::AuthFailed(body)
    } else if status == reqwest::StatusCode::NOT_FOUND || lowered.contains("not found") {
        GenerationError::ModelNotFound(body)
    } else if lowered.contains("billing") {
        GenerationError::BillingRequired(body)
    } else {
        GenerationError::Other(format!("{status}: {body}"))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    contents: Vec<Content>,
    generation_config: GenerationConfigBody,
    safety_settings: Vec<SafetySetting>,
}

impl GenerateContentBody {
    fn for_request(request: &GenerationRequest) -> Self {
        let safety_settings = [
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_HARASSMENT",
        ]
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: "OFF".to_string(),
        })
        .collect();

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfigBody {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_modalities: vec!["IMAGE".to_string()],
                image_config: ImageConfigBody {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                    image_size: request.resolution.as_str().to_string(),
                },
            },
            safety_settings,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    response_modalities: Vec<String>,
    image_config: ImageConfigBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfigBody {
    aspect_ratio: String,
    image_size: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First inline-data payload across the first candidate's parts.
    fn first_inline_data(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref().map(|d| d.data.as_str()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}
