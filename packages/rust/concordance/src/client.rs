//! HTTP client for the hosted text-generation endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use biblia_shared::{BibliaError, CrossReference, InferenceConfig, Result, VerseRef};

use crate::CrossReferenceSource;
use crate::prompt::{build_prompt, parse_related};

/// User-Agent string for inference requests.
const USER_AGENT: &str = concat!("biblia/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt kept in error messages.
const ERROR_BODY_EXCERPT: usize = 200;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Client for one inference endpoint, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    max_new_tokens: u32,
    temperature: f64,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BibliaError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url()?,
            api_key: api_key.into(),
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
        })
    }

    /// Send one generation request and return the trimmed generated text.
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header("x-wait-for-model", "true")
            .json(&request)
            .send()
            .await
            .map_err(|e| BibliaError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(BibliaError::Inference(format!("HTTP {status}: {excerpt}")));
        }

        let outputs: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| BibliaError::Inference(format!("unexpected response body: {e}")))?;

        let text = outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text.trim().to_string())
            .ok_or_else(|| BibliaError::Inference("response contained no generations".into()))?;

        debug!(chars = text.len(), "generation received");
        Ok(text)
    }
}

impl CrossReferenceSource for InferenceClient {
    async fn related(&self, reference: &VerseRef, verse_text: &str) -> Result<Vec<CrossReference>> {
        let prompt = build_prompt(reference, verse_text);
        let text = self.generate(&prompt).await?;
        parse_related(&text)
    }
}
