//! JSON view models: everything a page needs to render, already formatted.

use serde::Serialize;

use crate::models::MovieId;
use crate::services::pagination::Pagination;

/// One tile in a movie grid
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    /// Only set on grids that show overviews (search, wishlist)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub poster_url: String,
    pub release_year: Option<i32>,
    /// Absent for unrated movies
    pub rating: Option<String>,
    pub in_wishlist: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HomePage {
    pub heading: &'static str,
    pub tagline: &'static str,
    pub language: String,
    pub movies: Vec<MovieCard>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchPage {
    pub query: String,
    pub language: String,
    /// "Found 1,234 results for ..."; absent when there is no query
    pub summary: Option<String>,
    pub total_results: u64,
    pub movies: Vec<MovieCard>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetailView {
    pub id: MovieId,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub poster_url: String,
    pub backdrop_url: Option<String>,
    pub release_year: Option<i32>,
    pub runtime: Option<String>,
    /// "8.4 (26,280 votes)"
    pub rating: Option<String>,
    pub genres: Vec<String>,
    pub budget: Option<String>,
    pub revenue: Option<String>,
    pub status: String,
    pub original_language: String,
    pub production_companies: Vec<String>,
    pub homepage: Option<String>,
    pub in_wishlist: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetailPage {
    pub movie: MovieDetailView,
    pub recommendations: Vec<MovieCard>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WishlistPage {
    pub count: usize,
    pub summary: String,
    pub movies: Vec<MovieCard>,
}

/// Result of a wishlist mutation or membership query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WishlistStatus {
    pub movie_id: MovieId,
    pub in_wishlist: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LanguageView {
    pub code: String,
    /// Display name when the code is one of the selectable languages
    pub name: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotFoundPage {
    pub status: u16,
    pub heading: &'static str,
    pub message: &'static str,
    pub home: &'static str,
}

impl Default for NotFoundPage {
    fn default() -> Self {
        Self {
            status: 404,
            heading: "Page Not Found",
            message: "The page you're looking for doesn't exist. It might have been moved, deleted, or you entered the wrong URL.",
            home: "/api/v1/movies/now-playing",
        }
    }
}
