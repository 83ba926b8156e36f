use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use tj_core::{
    Annotator, BiasResult, ContentItem, RelatedItem, Result, SummaryResult, TrajectoryResult,
};

/// Offline annotator: deterministic text heuristics, no network.
pub struct DummyAnnotator;

impl fmt::Debug for DummyAnnotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyAnnotator").finish()
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl Annotator for DummyAnnotator {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn analyze_bias(&self, item: &ContentItem) -> Result<BiasResult> {
        Ok(BiasResult {
            level: 0.0,
            confidence: 0.1,
            reasoning: format!("No model available; \"{}\" was not analysed.", item.title),
        })
    }

    async fn generate_summary(&self, item: &ContentItem) -> Result<SummaryResult> {
        let text = sentences(&item.summary).take(2).collect::<Vec<_>>().join(". ");
        Ok(SummaryResult {
            text: if text.is_empty() { item.title.clone() } else { text + "." },
        })
    }

    async fn analyze_trajectory(&self, items: &[ContentItem]) -> Result<TrajectoryResult> {
        let evolution = items.iter().map(|item| item.title.clone()).collect();
        let perspective_shifts = items
            .windows(2)
            .filter(|pair| pair[0].source_name != pair[1].source_name || pair[0].author != pair[1].author)
            .map(|pair| format!("{} ({}) follows {} ({})", pair[1].author, pair[1].source_name, pair[0].author, pair[0].source_name))
            .collect();
        Ok(TrajectoryResult {
            evolution,
            perspective_shifts,
            confidence: 0.1,
        })
    }

    async fn find_related(&self, item: &ContentItem, candidates: &[ContentItem]) -> Result<Vec<RelatedItem>> {
        let base = words(&item.title);
        Ok(candidates
            .iter()
            .map(|candidate| {
                let other = words(&candidate.title);
                let union = base.union(&other).count();
                let score = if union == 0 {
                    0.0
                } else {
                    base.intersection(&other).count() as f64 / union as f64
                };
                RelatedItem {
                    item: candidate.clone(),
                    score,
                }
            })
            .collect())
    }
}
