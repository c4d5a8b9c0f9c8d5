use crate::{
    error::{AppError, AppResult},
    models::{
        view::{
            HomePage, MovieCard, MovieDetailPage, MovieDetailView, SearchPage, WishlistPage,
            WishlistStatus,
        },
        Movie, MovieDetails, MovieId, MoviesResponse,
    },
    services::{
        format::{
            count_label, format_count, format_currency, format_rating, format_runtime,
            release_year,
        },
        images::ImageUrls,
        pagination::{requested_page, Pagination},
        providers::MovieProvider,
    },
    store::{LanguagePreference, WishlistStore},
};

pub const FETCH_MOVIES_FAILED: &str = "Failed to fetch movies. Please try again later.";
pub const SEARCH_FAILED: &str = "Failed to search movies. Please try again later.";

/// Recommendations shown under a movie's details
const MAX_RECOMMENDATIONS: usize = 12;
const MAX_PRODUCTION_COMPANIES: usize = 5;

/// Collaborators a page needs to build its view model
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub provider: &'a dyn MovieProvider,
    pub wishlist: &'a WishlistStore,
    pub language: &'a LanguagePreference,
    pub images: &'a ImageUrls,
}

impl<'a> PageContext<'a> {
    fn card(&self, movie: &Movie, show_overview: bool) -> MovieCard {
        MovieCard {
            id: movie.id,
            title: movie.title.clone(),
            overview: (show_overview && !movie.overview.is_empty())
                .then(|| movie.overview.clone()),
            poster_url: self.images.poster(movie.poster_path.as_deref()),
            release_year: release_year(&movie.release_date),
            rating: (movie.vote_average > 0.0).then(|| format_rating(movie.vote_average)),
            in_wishlist: self.wishlist.contains(movie.id),
        }
    }

    fn cards(&self, movies: &[Movie], show_overview: bool) -> Vec<MovieCard> {
        movies.iter().map(|m| self.card(m, show_overview)).collect()
    }
}

/// Now-playing grid for the current language
pub async fn home(ctx: PageContext<'_>, page: Option<u32>) -> AppResult<HomePage> {
    let page = requested_page(page)?;
    let language = ctx.language.current();

    let response = ctx
        .provider
        .now_playing(page, &language)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, page = page, "Error fetching movies");
            AppError::fetch_failed(
                FETCH_MOVIES_FAILED,
                format!("/api/v1/movies/now-playing?page={}", page),
            )
        })?;

    Ok(HomePage {
        heading: "Now Playing Movies",
        tagline: "Discover the latest movies currently playing in theaters around the world",
        language,
        movies: ctx.cards(&response.results, false),
        pagination: Pagination::new(page, response.total_pages),
    })
}

/// Search results. A blank query returns an empty page without calling the
/// provider.
pub async fn search(ctx: PageContext<'_>, query: &str, page: Option<u32>) -> AppResult<SearchPage> {
    let page = requested_page(page)?;
    let language = ctx.language.current();
    let query = query.trim();

    if query.is_empty() {
        return Ok(build_search_page(&ctx, query, page, language, MoviesResponse::empty(), None));
    }

    let response = ctx
        .provider
        .search(query, page, &language)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, query = %query, page = page, "Error searching movies");
            AppError::fetch_failed(SEARCH_FAILED, search_uri(query, page))
        })?;

    let summary = if response.total_results == 0 {
        format!("No results found for \"{}\"", query)
    } else {
        format!(
            "Found {} for \"{}\"",
            count_label(response.total_results, "result", "results"),
            query
        )
    };

    Ok(build_search_page(&ctx, query, page, language, response, Some(summary)))
}

fn build_search_page(
    ctx: &PageContext<'_>,
    query: &str,
    page: u32,
    language: String,
    response: MoviesResponse,
    summary: Option<String>,
) -> SearchPage {
    SearchPage {
        query: query.to_string(),
        language,
        summary,
        total_results: response.total_results,
        movies: ctx.cards(&response.results, true),
        pagination: Pagination::new(page, response.total_pages),
    }
}

fn search_uri(query: &str, page: u32) -> String {
    format!(
        "/api/v1/search?q={}&page={}",
        urlencoding::encode(query),
        page
    )
}

/// Parses a path segment as a movie id; anything else is a missing page
pub fn parse_movie_id(raw: &str) -> AppResult<MovieId> {
    raw.trim()
        .parse::<MovieId>()
        .map_err(|_| AppError::NotFound(format!("movie {}", raw)))
}

/// Details plus recommendations. Unknown or unreachable movies are reported
/// as not found; a failed recommendations call just leaves the list empty.
pub async fn movie_detail(ctx: PageContext<'_>, raw_id: &str) -> AppResult<MovieDetailPage> {
    let id = parse_movie_id(raw_id)?;
    let language = ctx.language.current();

    let details = ctx.provider.details(id, &language).await.map_err(|e| {
        tracing::warn!(error = %e, movie_id = id, "Movie details unavailable");
        AppError::NotFound(format!("movie {}", id))
    })?;

    let recommendations = match ctx.provider.recommendations(id, &language).await {
        Ok(response) => {
            let top: Vec<Movie> = response
                .results
                .into_iter()
                .take(MAX_RECOMMENDATIONS)
                .collect();
            ctx.cards(&top, false)
        }
        Err(e) => {
            tracing::error!(error = %e, movie_id = id, "Error fetching recommendations");
            Vec::new()
        }
    };

    Ok(MovieDetailPage {
        movie: detail_view(&ctx, &details),
        recommendations,
    })
}

fn detail_view(ctx: &PageContext<'_>, details: &MovieDetails) -> MovieDetailView {
    MovieDetailView {
        id: details.id,
        title: details.title.clone(),
        tagline: details.tagline.clone().filter(|t| !t.is_empty()),
        overview: Some(details.overview.clone()).filter(|o| !o.is_empty()),
        poster_url: ctx.images.poster(details.poster_path.as_deref()),
        backdrop_url: ctx.images.backdrop(details.backdrop_path.as_deref()),
        release_year: release_year(&details.release_date),
        runtime: details
            .runtime
            .filter(|r| *r > 0)
            .map(format_runtime),
        rating: (details.vote_average > 0.0).then(|| {
            format!(
                "{} ({} votes)",
                format_rating(details.vote_average),
                format_count(details.vote_count)
            )
        }),
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        budget: (details.budget > 0).then(|| format_currency(details.budget)),
        revenue: (details.revenue > 0).then(|| format_currency(details.revenue)),
        status: details.status.clone(),
        original_language: details.original_language.to_uppercase(),
        production_companies: details
            .production_companies
            .iter()
            .take(MAX_PRODUCTION_COMPANIES)
            .map(|c| c.name.clone())
            .collect(),
        homepage: details.homepage.clone().filter(|h| !h.is_empty()),
        in_wishlist: ctx.wishlist.contains(details.id),
    }
}

/// Flips a movie's wishlist membership from its detail page
pub async fn toggle_wishlist(ctx: PageContext<'_>, raw_id: &str) -> AppResult<WishlistStatus> {
    let id = parse_movie_id(raw_id)?;

    if !ctx.wishlist.remove(id) {
        let details = ctx.provider.details(id, &ctx.language.current()).await?;
        ctx.wishlist.add(Movie::from(&details));
    }

    Ok(wishlist_status(ctx.wishlist, id))
}

pub fn wishlist_status(wishlist: &WishlistStore, id: MovieId) -> WishlistStatus {
    WishlistStatus {
        movie_id: id,
        in_wishlist: wishlist.contains(id),
        count: wishlist.count(),
    }
}

pub fn wishlist(ctx: PageContext<'_>) -> WishlistPage {
    let movies = ctx.wishlist.list();
    let count = movies.len();
    let summary = if count == 0 {
        "Your wishlist is empty".to_string()
    } else {
        format!(
            "{} in your wishlist",
            count_label(count as u64, "movie", "movies")
        )
    };

    WishlistPage {
        count,
        summary,
        movies: ctx.cards(&movies, true),
    }
}
