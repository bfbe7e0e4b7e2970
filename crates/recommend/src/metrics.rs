// Metrics hooks for the recommender.
//
// Install a global `RecommendMetrics` implementation via
// [`set_recommend_metrics`]; every successful call to
// [`Recommender::recommend`](crate::Recommender::recommend) then reports its
// latency and result sizes. No metrics backend is linked here.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Observer for recommendation calls.
pub trait RecommendMetrics: Send + Sync {
    /// Record one completed recommendation.
    ///
    /// `candidates` is the number of documents left after history exclusion,
    /// `returned` the number handed back to the caller.
    fn record_recommendation(&self, candidates: usize, returned: usize, latency: Duration);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn RecommendMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn RecommendMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn RecommendMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global recorder.
pub fn set_recommend_metrics(recorder: Option<Arc<dyn RecommendMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
