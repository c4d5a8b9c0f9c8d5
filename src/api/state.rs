use std::sync::Arc;

use crate::{
    config::Config,
    services::{images::ImageUrls, pages::PageContext, providers::MovieProvider, TmdbProvider},
    store::{FileStorage, LanguagePreference, WishlistStore},
};

/// Shared application state
///
/// The wishlist and language stores live here for the whole process; handlers
/// receive them through axum's `State` rather than through globals.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MovieProvider>,
    pub wishlist: Arc<WishlistStore>,
    pub language: Arc<LanguagePreference>,
    pub images: ImageUrls,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        wishlist: Arc<WishlistStore>,
        language: Arc<LanguagePreference>,
        images: ImageUrls,
    ) -> Self {
        Self {
            provider,
            wishlist,
            language,
            images,
        }
    }

    /// Wires the TMDb provider and file-backed wishlist described by `config`
    pub fn from_config(config: &Config) -> Self {
        let provider = TmdbProvider::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone());
        let storage = FileStorage::new(config.data_dir.clone());

        tracing::info!(
            provider = provider.name(),
            data_dir = %storage.dir().display(),
            language = %config.default_language,
            "Initializing application state"
        );

        Self::new(
            Arc::new(provider),
            Arc::new(WishlistStore::load(Arc::new(storage))),
            Arc::new(LanguagePreference::new(config.default_language.clone())),
            ImageUrls::new(config.tmdb_image_url.clone()),
        )
    }

    pub fn pages(&self) -> PageContext<'_> {
        PageContext {
            provider: self.provider.as_ref(),
            wishlist: &self.wishlist,
            language: &self.language,
            images: &self.images,
        }
    }
}
