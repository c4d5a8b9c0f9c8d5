//! Movie metadata provider abstraction
//!
//! Every page reads catalog data through this trait, which keeps HTTP
//! handlers and page builders independent of the concrete service and lets
//! tests substitute a mock.

use crate::{
    error::AppResult,
    models::{MovieDetails, MovieId, MoviesResponse},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
///
/// All list operations are paginated the way the upstream catalog paginates;
/// `language` is passed through unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Movies currently in theaters
    async fn now_playing(&self, page: u32, language: &str) -> AppResult<MoviesResponse>;

    /// Free-text title search
    async fn search(&self, query: &str, page: u32, language: &str) -> AppResult<MoviesResponse>;

    /// Full record for one movie
    async fn details(&self, id: MovieId, language: &str) -> AppResult<MovieDetails>;

    /// Movies recommended for viewers of `id` (first page only)
    async fn recommendations(&self, id: MovieId, language: &str) -> AppResult<MoviesResponse>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
