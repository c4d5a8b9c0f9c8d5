pub mod format;
pub mod images;
pub mod pages;
pub mod pagination;
pub mod providers;

pub use providers::{MovieProvider, TmdbProvider};
