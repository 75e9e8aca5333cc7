pub mod api_routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::service::relay_service::RelayService;
use crate::upstream::UpstreamClient;

/// Assembles the full application: API routes, the optional static frontend
/// and the HTTP middleware stack.
pub fn build_app(config: Arc<AppConfig>) -> Router {
    let static_dir = config.static_dir.clone();
    let service = RelayService::new(UpstreamClient::new(config));

    let mut app = api_routes::api_router(service);

    if let Some(dir) = static_dir {
        info!(dir = %dir.display(), "Serving frontend from static directory");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
