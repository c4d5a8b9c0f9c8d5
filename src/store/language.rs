use parking_lot::RwLock;

use crate::error::{AppError, AppResult};

/// The content language used to parameterize catalog requests.
///
/// Held in memory for the lifetime of the process. Codes are not checked
/// against any list; the catalog decides what an unknown code means.
#[derive(Debug)]
pub struct LanguagePreference {
    code: RwLock<String>,
}

impl LanguagePreference {
    pub fn new(default_code: impl Into<String>) -> Self {
        Self {
            code: RwLock::new(default_code.into()),
        }
    }

    pub fn current(&self) -> String {
        self.code.read().clone()
    }

    /// Replaces the current code. Surrounding whitespace is dropped; an empty
    /// code is rejected.
    pub fn set(&self, code: &str) -> AppResult<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidInput(
                "Language code cannot be empty".to_string(),
            ));
        }

        let mut current = self.code.write();
        if *current != code {
            tracing::info!(from = %current.as_str(), to = %code, "Content language changed");
            *current = code.to_string();
        }
        Ok(current.clone())
    }
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::new(crate::config::default_language())
    }
}
