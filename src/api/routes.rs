use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Movies
        .route("/movies/now-playing", get(handlers::now_playing))
        .route("/movies/:id", get(handlers::movie_detail))
        .route("/movies/:id/wishlist", post(handlers::toggle_wishlist))
        .route("/search", get(handlers::search))
        // Wishlist
        .route(
            "/wishlist",
            get(handlers::get_wishlist).post(handlers::add_to_wishlist),
        )
        .route(
            "/wishlist/:id",
            get(handlers::wishlist_contains).delete(handlers::remove_from_wishlist),
        )
        // Language
        .route(
            "/language",
            get(handlers::get_language).put(handlers::set_language),
        )
        .route("/languages", get(handlers::list_languages))
}
