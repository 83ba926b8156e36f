use std::fmt;
use std::time::Duration;

pub mod codec;
pub mod models;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
mod test_utils;

pub const DEFAULT_BASE_URL: &str = "https://api.grok.ai/v1";

#[derive(Clone)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: "grok".to_string(),
            temperature: codec::DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(30),
        }
    }
}

pub mod prelude {
    pub use super::models::create_annotator;
    pub use super::orchestrator::{AnalysisOrchestrator, AnalysisSnapshot, AnalysisState};
    pub use super::InferenceConfig;
    pub use tj_core::{Annotator, ContentItem, Error, Result};
}

pub use models::create_annotator;
pub use orchestrator::{AnalysisOrchestrator, AnalysisResults, AnalysisSnapshot, AnalysisState};
