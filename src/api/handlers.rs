use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{
        language,
        view::{
            HomePage, LanguageView, MovieDetailPage, NotFoundPage, SearchPage, WishlistPage,
            WishlistStatus,
        },
        Language, Movie, SUPPORTED_LANGUAGES,
    },
    services::pages,
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetLanguageRequest {
    pub code: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Now-playing movies
pub async fn now_playing(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<HomePage>> {
    Ok(Json(pages::home(state.pages(), params.page).await?))
}

/// Movie search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchPage>> {
    Ok(Json(pages::search(state.pages(), &params.q, params.page).await?))
}

/// Movie details with recommendations
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetailPage>> {
    Ok(Json(pages::movie_detail(state.pages(), &id).await?))
}

/// Adds or removes a movie from its detail page
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<WishlistStatus>> {
    let status = pages::toggle_wishlist(state.pages(), &id).await?;

    tracing::info!(
        request_id = %request_id,
        movie_id = status.movie_id,
        in_wishlist = status.in_wishlist,
        "Wishlist toggled"
    );

    Ok(Json(status))
}

/// Current wishlist
pub async fn get_wishlist(State(state): State<AppState>) -> Json<WishlistPage> {
    Json(pages::wishlist(state.pages()))
}

/// Adds a movie the client already has; repeated adds are no-ops
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(movie): Json<Movie>,
) -> (StatusCode, Json<WishlistStatus>) {
    let id = movie.id;
    let inserted = state.wishlist.add(movie);

    tracing::info!(
        request_id = %request_id,
        movie_id = id,
        inserted = inserted,
        "Wishlist add"
    );

    let status = if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(pages::wishlist_status(&state.wishlist, id)))
}

/// Whether a movie is in the wishlist
pub async fn wishlist_contains(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WishlistStatus>> {
    let id = pages::parse_movie_id(&id)?;
    Ok(Json(pages::wishlist_status(&state.wishlist, id)))
}

/// Removes a movie; removing an absent movie succeeds
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<WishlistStatus>> {
    let id = pages::parse_movie_id(&id)?;
    let removed = state.wishlist.remove(id);

    tracing::info!(
        request_id = %request_id,
        movie_id = id,
        removed = removed,
        "Wishlist remove"
    );

    Ok(Json(pages::wishlist_status(&state.wishlist, id)))
}

/// Current content language
pub async fn get_language(State(state): State<AppState>) -> Json<LanguageView> {
    Json(language_view(state.language.current()))
}

pub async fn set_language(
    State(state): State<AppState>,
    Json(request): Json<SetLanguageRequest>,
) -> AppResult<Json<LanguageView>> {
    let code = state.language.set(&request.code)?;
    Ok(Json(language_view(code)))
}

/// Languages offered by the selector
pub async fn list_languages() -> Json<&'static [Language]> {
    Json(SUPPORTED_LANGUAGES)
}

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Json<NotFoundPage>) {
    (StatusCode::NOT_FOUND, Json(NotFoundPage::default()))
}

fn language_view(code: String) -> LanguageView {
    let name = language::find(&code).map(|l| l.name);
    LanguageView { code, name }
}
