use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestConfig,

    #[serde(default)]
    pub browse: BrowseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_max_book_candidates")]
    pub max_book_candidates: usize,
    #[serde(default = "default_max_author_candidates")]
    pub max_author_candidates: usize,
    #[serde(default = "default_subtitle_chars")]
    pub subtitle_chars: usize,
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_min_query_chars() -> usize {
    2
}
fn default_max_book_candidates() -> usize {
    7
}
fn default_max_author_candidates() -> usize {
    3
}
fn default_subtitle_chars() -> usize {
    60
}

impl SuggestConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_book_candidates: default_max_book_candidates(),
            max_author_candidates: default_max_author_candidates(),
            subtitle_chars: default_subtitle_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: usize,
    #[serde(default = "default_types")]
    pub default_types: Vec<String>,
    #[serde(default = "default_max_price")]
    pub max_price: f64,
}

fn default_page_size() -> usize {
    20
}
fn default_max_visible_pages() -> usize {
    5
}
fn default_types() -> Vec<String> {
    vec!["book".to_string()]
}
fn default_max_price() -> f64 {
    99.99
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_visible_pages: default_max_visible_pages(),
            default_types: default_types(),
            max_price: default_max_price(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from the first config file found, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("catalog-query/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".catalog-query.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".catalog-query.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    pub fn validate(&self) -> Result<()> {
        if self.browse.page_size == 0 {
            return Err(QueryError::Config("browse.page_size must be at least 1".into()));
        }
        if self.suggest.min_query_chars == 0 {
            return Err(QueryError::Config(
                "suggest.min_query_chars must be at least 1".into(),
            ));
        }
        if self.browse.max_price.is_nan() || self.browse.max_price <= 0.0 {
            return Err(QueryError::Config("browse.max_price must be positive".into()));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.suggest.debounce(), Duration::from_millis(300));
        assert_eq!(config.suggest.min_query_chars, 2);
        assert_eq!(config.suggest.max_book_candidates, 7);
        assert_eq!(config.suggest.max_author_candidates, 3);
        assert_eq!(config.browse.page_size, 20);
        assert_eq!(config.browse.default_types, vec!["book".to_string()]);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[suggest]\ndebounce_ms = 150\n\n[browse]\npage_size = 12\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.suggest.debounce_ms, 150);
        assert_eq!(config.suggest.subtitle_chars, 60);
        assert_eq!(config.browse.page_size, 12);
        assert_eq!(config.browse.max_visible_pages, 5);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/tmp/catalog.json"));
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.catalog.path, config.catalog.path);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[browse]\npage_size = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(QueryError::Config(_))));
    }
}
