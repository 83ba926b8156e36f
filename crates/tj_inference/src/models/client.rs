use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tj_core::{
    Annotator, BiasResult, ContentItem, Error, RelatedItem, Result, SummaryResult, TrajectoryResult,
};
use tracing::debug;

use crate::codec::{self, ChatRequest, ResponseFormat};
use crate::{prompts, InferenceConfig};

/// HTTP client for the inference endpoint. One attempt per call, no retries.
pub struct AnnotationClient {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: f64,
}

impl fmt::Debug for AnnotationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AnnotationClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("Inference API key is required".to_string()))?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    async fn send(&self, prompt: String, format: ResponseFormat) -> Result<Vec<u8>> {
        let request = ChatRequest::new(prompt, format).with_temperature(self.temperature);
        debug!("POST {}/chat/completions ({:?})", self.base_url, format);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ServerError(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Annotator for AnnotationClient {
    fn name(&self) -> &str {
        "Grok"
    }

    async fn analyze_bias(&self, item: &ContentItem) -> Result<BiasResult> {
        let body = self.send(prompts::bias_prompt(item), ResponseFormat::Json).await?;
        codec::decode_bias(&body)
    }

    async fn generate_summary(&self, item: &ContentItem) -> Result<SummaryResult> {
        let body = self.send(prompts::summary_prompt(item), ResponseFormat::Text).await?;
        codec::decode_summary(&body)
    }

    async fn analyze_trajectory(&self, items: &[ContentItem]) -> Result<TrajectoryResult> {
        let body = self.send(prompts::trajectory_prompt(items), ResponseFormat::Json).await?;
        codec::decode_trajectory(&body)
    }

    async fn find_related(&self, item: &ContentItem, candidates: &[ContentItem]) -> Result<Vec<RelatedItem>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let body = self
            .send(prompts::related_prompt(item, candidates), ResponseFormat::Json)
            .await?;
        let scores = codec::decode_relatedness(&body, candidates.len())?;
        Ok(candidates
            .iter()
            .cloned()
            .zip(scores)
            .map(|(item, score)| RelatedItem { item, score })
            .collect())
    }
}
