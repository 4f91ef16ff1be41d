// src/presets.rs
//! Saved searches kept in a TOML file, one table per preset:
//!
//! ```toml
//! [presets.quick-indeed]
//! keyword = "software engineer"
//! sites = ["indeed"]
//! results_wanted = 5
//! ```
//!
//! Fields left out fall back to the default form.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::collector::SearchForm;

#[derive(Debug, Default, Deserialize)]
pub struct PresetBook {
    #[serde(default)]
    presets: BTreeMap<String, SearchForm>,
}

impl PresetBook {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No presets file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read presets file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse presets file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SearchForm)> {
        self.presets.iter().map(|(name, form)| (name.as_str(), form))
    }

    pub fn get(&self, name: &str) -> Result<&SearchForm> {
        self.presets.get(name).ok_or_else(|| {
            let available = self.names().collect::<Vec<_>>().join(", ");
            anyhow::anyhow!("Unknown preset '{}'. Available: {}", name, available)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESETS: &str = r#"
[presets.quick-indeed]
keyword = "software engineer"
sites = ["indeed"]
results_wanted = 5
verbosity = 2

[presets.multi-board]
keyword = "data engineer"
location = "New York, NY"
sites = ["indeed", "linkedin"]
results_wanted = 5
"#;

    #[test]
    fn test_presets_overlay_defaults() {
        let book = PresetBook::from_toml(PRESETS).unwrap();
        assert_eq!(book.names().collect::<Vec<_>>(), vec!["multi-board", "quick-indeed"]);

        let quick = book.get("quick-indeed").unwrap();
        assert_eq!(quick.results_wanted, 5);
        assert_eq!(quick.location, "San Francisco, CA");
        assert_eq!(quick.hours_old, 72);
        assert_eq!(quick.country, "USA");

        let multi = book.get("multi-board").unwrap();
        assert_eq!(multi.sites, vec!["indeed", "linkedin"]);
        assert_eq!(multi.verbosity, 1);
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let book = PresetBook::from_toml(PRESETS).unwrap();
        let err = book.get("nope").unwrap_err().to_string();
        assert!(err.contains("multi-board, quick-indeed"));
    }

    #[test]
    fn test_shipped_presets_fit_slider_ranges() {
        let book = PresetBook::from_toml(include_str!("../searches.toml")).unwrap();
        for (name, form) in book.iter() {
            assert_eq!(form.check_ranges(), Ok(()), "preset {}", name);
            assert!(form.collect().is_ok(), "preset {}", name);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let book = PresetBook::load(Path::new("/nonexistent/searches.toml")).unwrap();
        assert_eq!(book.names().count(), 0);
    }
}
