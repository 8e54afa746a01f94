use crate::config::Config;
use crate::layout::PageGeometry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Default page geometry. Requests may override the margin.
    pub page: PageGeometry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            page: config.page,
            config,
        }
    }
}
