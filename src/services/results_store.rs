// src/services/results_store.rs
// DOCUMENTATION: Current search results shared by the map and the list
// PURPOSE: Hold one immutable snapshot at a time and notify observers on swap

use std::sync::Arc;
use tokio::sync::watch;

use crate::models::PlaceResult;

/// Immutable view of the results at one point in time
/// DOCUMENTATION: Map annotations and list rows are always rendered from the
/// same snapshot, so they never show a mix of two searches
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsSnapshot {
    /// Bumped on every replace
    pub revision: u64,
    pub results: Arc<[PlaceResult]>,
}

impl ResultsSnapshot {
    fn empty() -> Self {
        Self {
            revision: 0,
            results: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Row labels, in result order
    pub fn names(&self) -> Vec<String> {
        self.results.iter().map(|r| r.name.clone()).collect()
    }
}

/// Results store
/// DOCUMENTATION: Replaced wholesale on every search; no incremental merge
pub struct ResultsStore {
    sender: watch::Sender<ResultsSnapshot>,
}

impl ResultsStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ResultsSnapshot::empty());
        Self { sender }
    }

    /// Swap the stored list and notify subscribers
    pub fn replace(&self, results: Vec<PlaceResult>) -> ResultsSnapshot {
        let snapshot = ResultsSnapshot {
            revision: self.sender.borrow().revision + 1,
            results: Arc::from(results),
        };

        log::debug!(
            "Results store revision {} ({} results)",
            snapshot.revision,
            snapshot.len()
        );

        self.sender.send_replace(snapshot.clone());
        snapshot
    }

    /// Read-only snapshot of the current results
    pub fn current(&self) -> ResultsSnapshot {
        self.sender.borrow().clone()
    }

    /// Observe future replacements
    pub fn subscribe(&self) -> watch::Receiver<ResultsSnapshot> {
        self.sender.subscribe()
    }
}

impl Default for ResultsStore {
    fn default() -> Self {
        Self::new()
    }
}
