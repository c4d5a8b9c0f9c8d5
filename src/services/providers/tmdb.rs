//! TMDb (The Movie Database) v3 provider
//!
//! Endpoints used:
//! 1. `/movie/now_playing` for the home page
//! 2. `/search/movie` for search
//! 3. `/movie/{id}` and `/movie/{id}/recommendations` for detail pages
//!
//! Authenticates with the v3 `api_key` query parameter. No retries: a failed
//! call is reported to the page, which offers the user a retry.

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, MovieId, MoviesResponse},
    services::providers::MovieProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issues a GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = self.endpoint(path);

        tracing::debug!(path = %path, "Fetching from TMDb");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDb resource {}", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDb request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn now_playing(&self, page: u32, language: &str) -> AppResult<MoviesResponse> {
        let response: MoviesResponse = self
            .get_json(
                "/movie/now_playing",
                &[("language", language.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            page = page,
            language = %language,
            results = response.results.len(),
            provider = self.name(),
            "Now playing fetched"
        );

        Ok(response)
    }

    async fn search(&self, query: &str, page: u32, language: &str) -> AppResult<MoviesResponse> {
        let response: MoviesResponse = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("language", language.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        tracing::info!(
            query = %query,
            page = page,
            results = response.results.len(),
            total_results = response.total_results,
            provider = self.name(),
            "Movie search completed"
        );

        Ok(response)
    }

    async fn details(&self, id: MovieId, language: &str) -> AppResult<MovieDetails> {
        let details: MovieDetails = self
            .get_json(
                &format!("/movie/{}", id),
                &[("language", language.to_string())],
            )
            .await?;

        tracing::info!(movie_id = id, title = %details.title, "Movie details fetched");

        Ok(details)
    }

    async fn recommendations(&self, id: MovieId, language: &str) -> AppResult<MoviesResponse> {
        self.get_json(
            &format!("/movie/{}/recommendations", id),
            &[("language", language.to_string()), ("page", "1".to_string())],
        )
        .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode as AxumStatus,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serves a tiny fake of the TMDb API on an ephemeral port
    async fn spawn_fake_tmdb() -> String {
        async fn now_playing(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            Json(json!({
                "page": params.get("page").and_then(|p| p.parse::<u32>().ok()).unwrap_or(1),
                "results": [{"id": 1, "title": format!("lang={}", params["language"])}],
                "total_pages": 10000,
                "total_results": 200000
            }))
        }

        async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
            assert_eq!(params.get("api_key").map(String::as_str), Some("test-key"));
            assert_eq!(params.get("include_adult").map(String::as_str), Some("false"));
            Json(json!({
                "page": 1,
                "results": [{"id": 603, "title": params["query"]}],
                "total_pages": 1,
                "total_results": 1
            }))
        }

        async fn details(Path(id): Path<u64>) -> Result<Json<Value>, AxumStatus> {
            if id == 550 {
                Ok(Json(json!({"id": 550, "title": "Fight Club", "runtime": 139})))
            } else if id == 500 {
                Err(AxumStatus::INTERNAL_SERVER_ERROR)
            } else {
                Err(AxumStatus::NOT_FOUND)
            }
        }

        let app = Router::new()
            .route("/movie/now_playing", get(now_playing))
            .route("/search/movie", get(search))
            .route("/movie/:id", get(details));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = TmdbProvider::new("k".into(), "https://api.themoviedb.org/3/".into());
        assert_eq!(
            provider.endpoint("/movie/550"),
            "https://api.themoviedb.org/3/movie/550"
        );
    }

    #[tokio::test]
    async fn test_now_playing_passes_language_and_page() {
        let base = spawn_fake_tmdb().await;
        let provider = TmdbProvider::new("test-key".into(), base);

        let response = provider.now_playing(3, "fr-FR").await.unwrap();
        assert_eq!(response.page, 3);
        assert_eq!(response.total_pages, 10000);
        assert_eq!(response.results[0].title, "lang=fr-FR");
    }

    #[tokio::test]
    async fn test_search_sends_query() {
        let base = spawn_fake_tmdb().await;
        let provider = TmdbProvider::new("test-key".into(), base);

        let response = provider.search("The Matrix", 1, "en-US").await.unwrap();
        assert_eq!(response.results[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_details_maps_status_codes() {
        let base = spawn_fake_tmdb().await;
        let provider = TmdbProvider::new("test-key".into(), base);

        let details = provider.details(550, "en-US").await.unwrap();
        assert_eq!(details.runtime, Some(139));

        assert!(matches!(
            provider.details(1, "en-US").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            provider.details(500, "en-US").await,
            Err(AppError::ExternalApi(_))
        ));
    }
}
