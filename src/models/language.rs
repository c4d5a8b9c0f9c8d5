use serde::Serialize;

/// A content language offered by the language selector
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en-US", name: "English" },
    Language { code: "es-ES", name: "Español" },
    Language { code: "fr-FR", name: "Français" },
    Language { code: "de-DE", name: "Deutsch" },
    Language { code: "it-IT", name: "Italiano" },
    Language { code: "pt-BR", name: "Português" },
    Language { code: "ja-JP", name: "日本語" },
    Language { code: "ko-KR", name: "한국어" },
    Language { code: "zh-CN", name: "中文" },
    Language { code: "hi-IN", name: "हिन्दी" },
];

/// Looks up a selector entry by code. Unknown codes are still accepted by the
/// language store; they just have no display name.
pub fn find(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}
