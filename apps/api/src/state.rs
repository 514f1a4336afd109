use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The extraction pipeline is stateless — no parsed-document or font cache
/// outlives a single request — so the state carries configuration only.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
