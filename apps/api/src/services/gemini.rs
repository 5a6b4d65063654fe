use crate::{
    config::Config,
    error::{ApiError, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Single-shot text generation.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Generated reply for `prompt`, trimmed and guaranteed non-empty.
    async fn recommend(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
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
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn request_body(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Text of the first candidate; `None` when the reply holds no text at all.
fn extract_text(body: &str) -> std::result::Result<Option<String>, String> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| format!("Gemini 응답을 해석하지 못했습니다: {}", e))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InternalError(format!("HTTP 클라이언트를 만들지 못했습니다: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.clone(),
            api_key: config.genai_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Recommender for GeminiClient {
    async fn recommend(&self, prompt: &str) -> Result<String> {
        info!("Requesting recommendation from {}", self.model);

        let failed = |message: String| {
            error!("Gemini call failed: {}", message);
            ApiError::RecommendationFailed(message)
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| failed(format!("Gemini 서버와 통신 중 오류가 발생했습니다: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| failed(format!("Gemini 응답을 읽지 못했습니다: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(failed(format!(
                "Gemini 서버가 {} 상태로 응답했습니다: {}",
                status,
                error_message(&body)
            )));
        }

        let text = extract_text(&body)
            .map_err(&failed)?
            .ok_or_else(|| failed("Gemini가 빈 응답을 반환했습니다".to_string()))?;

        info!("Received recommendation ({} chars)", text.chars().count());
        Ok(text)
    }
}
