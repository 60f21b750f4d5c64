use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sokoni_core::config::BackendConfig;
use sokoni_core::GenerationError;

/// One generative-model endpoint. Implementations carry their own fixed
/// generation parameters; only the fallback executor may call this trait.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Stable identifier used in logs and exhaustion errors.
    fn id(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// REST client for a Google generative-language style endpoint
/// (`{base_url}/models/{model}:generateContent?key=...`).
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: SecretString,
    config: BackendConfig,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiBackend {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        config: BackendConfig,
        timeout_secs: u64,
    ) -> Result<Self, GenerationError> {
        let mut headers = header::HeaderMap::new();
        headers
            .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|error| {
                GenerationError::Transport(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.config.model)
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_provider_error(status, &body));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| GenerationError::Provider(format!("malformed response: {error}")))?;

        let text = payload
            .candidates
            .into_iter()
            .find_map(|candidate| candidate.content)
            .map(|content| {
                content.parts.into_iter().map(|part| part.text).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyCompletion);
        }

        Ok(text)
    }
}

/// Map a provider error body onto the failure taxonomy. Rate-limit signatures
/// (HTTP 429, RESOURCE_EXHAUSTED, quota wording) drive the executor's backoff.
fn classify_provider_error(status: StatusCode, body: &str) -> GenerationError {
    let detail = serde_json::from_str::<ProviderErrorResponse>(body)
        .ok()
        .and_then(|payload| payload.error)
        .map(|error| {
            if error.status.is_empty() {
                error.message
            } else {
                format!("{}: {}", error.status, error.message)
            }
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    if is_rate_limit_signature(status, body) {
        GenerationError::RateLimited(detail)
    } else {
        GenerationError::Provider(detail)
    }
}

fn is_rate_limit_signature(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    let lowered = body.to_ascii_lowercase();
    lowered.contains("resource_exhausted")
        || lowered.contains("quota")
        || lowered.contains("rate limit")
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{classify_provider_error, is_rate_limit_signature};
    use sokoni_core::GenerationError;

    #[test]
    fn http_429_is_a_rate_limit_signature() {
        assert!(is_rate_limit_signature(StatusCode::TOO_MANY_REQUESTS, ""));
    }

    #[test]
    fn resource_exhausted_body_is_a_rate_limit_signature() {
        let body = r#"{"error": {"status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded"}}"#;
        assert!(is_rate_limit_signature(StatusCode::FORBIDDEN, body));

        let error = classify_provider_error(StatusCode::FORBIDDEN, body);
        assert!(error.is_rate_limited());
        assert!(error.to_string().contains("RESOURCE_EXHAUSTED"));
    }

    #[test]
    fn server_errors_are_not_rate_limited() {
        let body = r#"{"error": {"status": "INTERNAL", "message": "model overloaded"}}"#;
        let error = classify_provider_error(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(matches!(error, GenerationError::Provider(_)));
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let error = classify_provider_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(error, GenerationError::Provider(ref detail) if detail.contains("502")));
    }
}
