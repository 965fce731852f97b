use std::sync::Arc;

use crate::config::Config;
use crate::ranking::similarity::RelevanceScorer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; no applicant data lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable relevance backend. Default: TfIdfScorer.
    pub relevance: Arc<dyn RelevanceScorer>,
}
