use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ContentItem;
use crate::Result;

/// Political leaning of a piece, on a scale from -1 (left) to 1 (right).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub level: f64,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaning {
    StronglyLeft,
    Left,
    Neutral,
    Right,
    StronglyRight,
}

impl BiasResult {
    pub fn leaning(&self) -> Leaning {
        match self.level {
            l if l.abs() < 0.1 => Leaning::Neutral,
            l if l <= -0.5 => Leaning::StronglyLeft,
            l if l < 0.0 => Leaning::Left,
            l if l >= 0.5 => Leaning::StronglyRight,
            _ => Leaning::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub text: String,
}

/// How a story developed across several items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub evolution: Vec<String>,
    pub perspective_shifts: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelatedItem {
    pub item: ContentItem,
    pub score: f64,
}

/// Source of AI-derived annotations. Each call is a single attempt.
#[async_trait]
pub trait Annotator: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze_bias(&self, item: &ContentItem) -> Result<BiasResult>;

    async fn generate_summary(&self, item: &ContentItem) -> Result<SummaryResult>;

    /// `items` must be in chronological order.
    async fn analyze_trajectory(&self, items: &[ContentItem]) -> Result<TrajectoryResult>;

    /// Scores each candidate's relatedness to `item`, in candidate order.
    async fn find_related(&self, item: &ContentItem, candidates: &[ContentItem]) -> Result<Vec<RelatedItem>>;
}
