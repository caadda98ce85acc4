//! Language support for prompt templates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a prompt variant can be written in
///
/// # Examples
///
/// ```
/// use analyzer_prompt::Language;
///
/// assert_eq!(Language::Indonesian.code(), "id");
/// assert_eq!(Language::from_code("bahasa"), Language::Indonesian);
/// assert_eq!(Language::from_code("ja"), Language::Other("ja".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// English
    #[default]
    English,
    /// Bahasa Indonesia
    Indonesian,
    /// Other languages (ISO 639-1 code)
    Other(String),
}

impl Language {
    /// Get ISO 639-1 language code
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
            Language::Other(code) => code,
        }
    }

    /// Get language name for display
    pub fn name(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Indonesian => "Indonesian",
            Language::Other(code) => code,
        }
    }

    /// Parse from ISO 639-1 code or common name
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Language::English,
            "id" | "in" | "indonesian" | "bahasa" | "bahasa indonesia" => Language::Indonesian,
            other => Language::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Indonesian.code(), "id");
        assert_eq!(Language::Other("ja".to_string()).code(), "ja");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("EN"), Language::English);
        assert_eq!(Language::from_code(" id "), Language::Indonesian);
        assert_eq!(Language::from_code("Bahasa Indonesia"), Language::Indonesian);
        assert_eq!(Language::from_code("ms"), Language::Other("ms".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::Indonesian.to_string(), "Indonesian");
    }

    #[test]
    fn test_default() {
        assert_eq!(Language::default(), Language::English);
    }
}
