use serde::{Deserialize, Serialize};

pub mod language;
pub mod view;

pub use language::{Language, SUPPORTED_LANGUAGES};

/// Catalog identifier of a movie
pub type MovieId = u64;

/// A movie as it appears in list endpoints (now playing, search, recommendations)
///
/// Fields the catalog omits fall back to their defaults, so partial records
/// (e.g. a wishlist written by an older build) still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: String,
}

/// Full record returned by `GET /movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

impl From<&MovieDetails> for Movie {
    fn from(details: &MovieDetails) -> Self {
        Movie {
            id: details.id,
            title: details.title.clone(),
            original_title: details.original_title.clone(),
            overview: details.overview.clone(),
            poster_path: details.poster_path.clone(),
            backdrop_path: details.backdrop_path.clone(),
            release_date: details.release_date.clone(),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            genre_ids: details.genres.iter().map(|g| g.id).collect(),
            original_language: details.original_language.clone(),
            adult: details.adult,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub minimum: String,
    pub maximum: String,
}

/// Paginated list response shared by now-playing, search and recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviesResponse {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
    #[serde(default)]
    pub dates: Option<DateRange>,
}

impl MoviesResponse {
    /// An empty first page, used when no request is made at all
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            total_results: 0,
            dates: None,
        }
    }
}
