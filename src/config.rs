use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";
pub const DEFAULT_QUERY: &str = "redux";
pub const DEFAULT_HITS_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub default_query: String,
    pub hits_per_page: u32,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_query: DEFAULT_QUERY.to_string(),
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/hn_search/config.toml`, e.g. `~/.config/hn_search/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("hn_search").join("config.toml"))
    }

    /// Reads the config file (if any) and then applies `HN_SEARCH_*` environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("HN_SEARCH_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(query) = lookup("HN_SEARCH_DEFAULT_QUERY") {
            self.default_query = query;
        }
        if let Some(hpp) = lookup("HN_SEARCH_HITS_PER_PAGE") {
            self.hits_per_page = hpp
                .trim()
                .parse()
                .with_context(|| format!("HN_SEARCH_HITS_PER_PAGE is not a number: {}", hpp))?;
        }
        Ok(())
    }
}
