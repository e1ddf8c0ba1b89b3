pub mod cors;
pub mod handlers;
pub mod relay_request;
pub(crate) mod request_logging;
pub mod upstream;
pub(crate) mod util;

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, middleware};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::providers::OpenAIProvider;
use crate::server::cors::{CorsPolicy, cors_middleware};
use crate::server::upstream::ChatUpstream;

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayConfig,
    pub upstream: Arc<dyn ChatUpstream + Send + Sync>,
}

pub fn create_app(config: RelayConfig) -> Router {
    let upstream = Arc::new(OpenAIProvider::new(&config.openai_base_url));
    tracing::info!("Relaying chat completions to {}", upstream.url());
    create_app_with_upstream(config, upstream)
}

pub fn create_app_with_upstream(
    config: RelayConfig,
    upstream: Arc<dyn ChatUpstream + Send + Sync>,
) -> Router {
    let cors = Arc::new(CorsPolicy::from_config(&config.allowed_origins));
    let app_state = AppState {
        relay: config,
        upstream,
    };

    handlers::routes().with_state(Arc::new(app_state)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %req.method(),
                    path = %req.uri().path()
                )
            }))
            .layer(middleware::from_fn_with_state(cors, cors_middleware)),
    )
}
