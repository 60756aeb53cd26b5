use std::sync::Arc;

use crate::config::Config;
use crate::income::comparator::IncomeComparator;
use crate::jobs::matcher::IntelligentJobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub income_comparator: Arc<IncomeComparator>,
    /// Owns the job search provider and resume parser seams.
    pub job_matcher: Arc<IntelligentJobMatcher>,
}
