use std::path::Path;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::index::RosterStore;
use crate::server::api;

/// JSON API under `/api`, plus the built frontend (if `static_dir` exists)
/// for every other GET. Unknown frontend paths get `index.html`.
pub fn router(store: Arc<RosterStore>, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health))
        .route("/players/search", get(api::search_players))
        .route("/players/top", get(api::top_players))
        .route("/players/:id", get(api::get_player))
        .route("/reload", post(api::reload))
        .fallback(api::route_not_found)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let app = Router::new().nest("/api", api_routes);
    let app = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => app.fallback(api::route_not_found),
    };
    app.with_state(store)
}
