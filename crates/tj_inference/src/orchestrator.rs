//! Concurrent bias / summary / trajectory analysis for one selected item.
//!
//! Each call to [`AnalysisOrchestrator::analyze`] opens a new session with a
//! higher sequence number. The three annotation requests run concurrently and
//! are joined all-or-nothing: one failure fails the session and no partial
//! result is exposed. Opening a new session cancels the previous one, and a
//! result whose session is no longer the latest is never written.

use std::sync::{Arc, PoisonError, RwLock};

use tj_core::{
    Annotator, BiasResult, ContentItem, Error, ItemId, SummaryResult, TrajectoryResult,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    pub bias: BiasResult,
    pub summary: SummaryResult,
    pub trajectory: TrajectoryResult,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Complete(AnalysisResults),
    Failed(Error),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSnapshot {
    pub session: u64,
    pub item_id: Option<ItemId>,
    pub state: AnalysisState,
}

impl AnalysisSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, AnalysisState::Loading)
    }

    pub fn results(&self) -> Option<&AnalysisResults> {
        match &self.state {
            AnalysisState::Complete(results) => Some(results),
            _ => None,
        }
    }

    pub fn bias(&self) -> Option<&BiasResult> {
        self.results().map(|r| &r.bias)
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        self.results().map(|r| &r.summary)
    }

    pub fn trajectory(&self) -> Option<&TrajectoryResult> {
        self.results().map(|r| &r.trajectory)
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            AnalysisState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

pub struct AnalysisOrchestrator {
    annotator: Arc<dyn Annotator>,
    snapshot: RwLock<AnalysisSnapshot>,
    latest_session: watch::Sender<u64>,
}

impl AnalysisOrchestrator {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        let (latest_session, _) = watch::channel(0);
        Self {
            annotator,
            snapshot: RwLock::new(AnalysisSnapshot::default()),
            latest_session,
        }
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Analyse `item`, using it alone as the story for the trajectory.
    ///
    /// Returns the finished snapshot, or `None` if a newer session replaced
    /// this one before it finished.
    pub async fn analyze(&self, item: &ContentItem) -> Option<AnalysisSnapshot> {
        self.run(item, std::slice::from_ref(item)).await
    }

    /// Analyse the newest of `items`, with all of them (oldest first) as the
    /// story for the trajectory. Returns `None` for an empty story.
    pub async fn analyze_story(&self, items: &[ContentItem]) -> Option<AnalysisSnapshot> {
        let latest = items.iter().max_by_key(|item| item.published_at)?;
        self.run(latest, items).await
    }

    /// Cancel any in-flight session and go back to idle.
    pub fn reset(&self) {
        self.begin(None, AnalysisState::Idle);
    }

    async fn run(&self, item: &ContentItem, story: &[ContentItem]) -> Option<AnalysisSnapshot> {
        let session = self.begin(Some(item.id()), AnalysisState::Loading);
        let mut sessions = self.latest_session.subscribe();
        info!("🧠 Analysis session {} started for {}", session, item.id());

        let annotator = &self.annotator;
        let joined = async {
            tokio::join!(
                annotator.analyze_bias(item),
                annotator.generate_summary(item),
                annotator.analyze_trajectory(story),
            )
        };

        let superseded = async {
            let _ = sessions.wait_for(|latest| *latest != session).await;
        };

        let (bias, summary, trajectory) = tokio::select! {
            results = joined => results,
            _ = superseded => {
                debug!("Analysis session {} superseded, dropping in-flight requests", session);
                return None;
            }
        };

        let state = match (bias, summary, trajectory) {
            (Ok(bias), Ok(summary), Ok(trajectory)) => AnalysisState::Complete(AnalysisResults {
                bias,
                summary,
                trajectory,
            }),
            (bias, summary, trajectory) => {
                let error = bias
                    .err()
                    .or(summary.err())
                    .or(trajectory.err())
                    .unwrap_or(Error::InvalidResponse);
                warn!("Analysis session {} failed: {}", session, error);
                AnalysisState::Failed(error)
            }
        };
        self.commit(session, state)
    }

    fn begin(&self, item_id: Option<ItemId>, state: AnalysisState) -> u64 {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let mut session = 0;
        self.latest_session.send_modify(|latest| {
            *latest += 1;
            session = *latest;
        });
        *snapshot = AnalysisSnapshot {
            session,
            item_id,
            state,
        };
        session
    }

    fn commit(&self, session: u64, state: AnalysisState) -> Option<AnalysisSnapshot> {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if snapshot.session != session {
            debug!("Discarding stale result of analysis session {}", session);
            return None;
        }
        snapshot.state = state;
        Some(snapshot.clone())
    }
}
