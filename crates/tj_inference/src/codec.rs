//! Wire format of the inference endpoint.
//!
//! Field names are fixed by the endpoint (`response_format`, `bias_level`,
//! `perspective_shifts`). Unknown response fields are ignored; missing or
//! out-of-range ones make the whole response invalid.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tj_core::{BiasResult, Error, Result, SummaryResult, TrajectoryResult};

pub const DEFAULT_TEMPERATURE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub response_format: ResponseFormat,
    pub temperature: f64,
}

impl ChatRequest {
    pub fn new(prompt: String, response_format: ResponseFormat) -> Self {
        Self {
            prompt,
            response_format,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BiasResponse {
    bias_level: f64,
    confidence: f64,
    reasoning: String,
}

#[derive(Debug, Deserialize)]
struct TrajectoryResponse {
    evolution: Vec<String>,
    perspective_shifts: Vec<String>,
    confidence: f64,
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Undecodable inference response: {}", e);
        Error::InvalidResponse
    })
}

fn bounded(value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidResponse)
    }
}

pub fn decode_summary(body: &[u8]) -> Result<SummaryResult> {
    let response: TextResponse = decode(body)?;
    Ok(SummaryResult { text: response.text })
}

pub fn decode_bias(body: &[u8]) -> Result<BiasResult> {
    let response: BiasResponse = decode(body)?;
    Ok(BiasResult {
        level: bounded(response.bias_level, -1.0, 1.0)?,
        confidence: bounded(response.confidence, 0.0, 1.0)?,
        reasoning: response.reasoning,
    })
}

pub fn decode_trajectory(body: &[u8]) -> Result<TrajectoryResult> {
    let response: TrajectoryResponse = decode(body)?;
    Ok(TrajectoryResult {
        evolution: response.evolution,
        perspective_shifts: response.perspective_shifts,
        confidence: bounded(response.confidence, 0.0, 1.0)?,
    })
}

/// One score per candidate; a count mismatch means the answer cannot be
/// matched back to the candidates.
pub fn decode_relatedness(body: &[u8], candidates: usize) -> Result<Vec<f64>> {
    let scores: Vec<f64> = decode(body)?;
    if scores.len() != candidates {
        return Err(Error::InvalidResponse);
    }
    scores.into_iter().map(|s| bounded(s, 0.0, 1.0)).collect()
}
