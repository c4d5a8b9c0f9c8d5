/// Shown when a movie has no poster
pub const PLACEHOLDER_POSTER: &str = "/placeholder-movie.jpg";

/// Builds image URLs from the catalog's relative file paths
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        match path {
            Some(p) if !p.is_empty() => format!("{}/w500{}", self.base_url, p),
            _ => PLACEHOLDER_POSTER.to_string(),
        }
    }

    pub fn backdrop(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/original{}", self.base_url, p))
    }
}
