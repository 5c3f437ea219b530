//! Localized UI strings.
//!
//! The English table ships inside the binary. A user table named by
//! `ui.language_file` is layered on top; keys it does not define fall back
//! to English, and keys nobody defines render as themselves.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

const EN: &str = include_str!("en.toml");

#[derive(Debug, Clone)]
pub struct Language {
    strings: HashMap<String, String>,
}

impl Language {
    pub fn english() -> Self {
        // The embedded table is checked by test_embedded_table_parses.
        let strings = toml::from_str(EN).unwrap_or_default();
        Self { strings }
    }

    /// English plus overrides from `path`.
    pub fn with_overrides(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read language file {}", path.display()))?;
        let overrides: HashMap<String, String> = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse language file {}", path.display()))?;
        let mut lang = Self::english();
        lang.strings.extend(overrides);
        Ok(lang)
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_parses() {
        let parsed: Result<HashMap<String, String>, _> = toml::from_str(EN);
        assert!(parsed.is_ok());
        assert!(Language::english().contains("app.name"));
    }

    #[test]
    fn test_missing_key_renders_as_itself() {
        let lang = Language::english();
        assert_eq!(lang.get("module.sales"), "Sales");
        assert_eq!(lang.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_overrides_layer_on_english() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.toml");
        std::fs::write(&path, "\"module.sales\" = \"Penjualan\"\n").unwrap();

        let lang = Language::with_overrides(&path).unwrap();
        assert_eq!(lang.get("module.sales"), "Penjualan");
        assert_eq!(lang.get("module.home"), "Home");
    }
}
