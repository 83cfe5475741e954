use std::sync::Arc;

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::parsing::service::ParserService;
use crate::skills::SkillsCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Alias catalog shared by the canonicalizer and the skills endpoints.
    pub skills: Arc<SkillsCatalog>,
    pub metrics: Arc<MetricsCollector>,
    pub parser: Arc<ParserService>,
}
