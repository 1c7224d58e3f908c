//! Configuration parsing and management.

use crate::theme::{Color, ThemeColors, ThemeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid colors.main: {0}")]
    InvalidColor(#[from] ThemeError),
}

/// Main configuration struct matching the lectern.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub title: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub colors: ColorsConfig,

    #[serde(default)]
    pub logo: Option<PathBuf>,

    /// Navigation belongs to the site generator; kept as-is so configs shared
    /// with it still parse.
    #[serde(default)]
    pub navigation: Option<serde_yaml::Value>,

    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub search: SearchConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_port() -> u16 {
    4001
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_base_url() -> String {
    String::from("/")
}

fn default_main_color() -> String {
    String::from("#445282")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorsConfig {
    #[serde(default = "default_main_color")]
    pub main: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            main: default_main_color(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Site-relative HTML files that never enter the index
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text; relative paths resolve against the
    /// working directory.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.colors.main.parse::<Color>()?;
        Ok(config)
    }

    /// Get the generated site directory, resolved relative to config file
    pub fn site_dir(&self) -> PathBuf {
        self.resolve_path(&self.site_dir)
    }

    /// Get the logo file, resolved relative to config file
    pub fn logo_path(&self) -> Option<PathBuf> {
        self.logo.as_ref().map(|p| self.resolve_path(p))
    }

    /// Theme colors derived from `colors.main`
    pub fn theme_colors(&self) -> Result<ThemeColors, ConfigError> {
        let main: Color = self.colors.main.parse()?;
        Ok(ThemeColors::from_main(main))
    }

    /// Normalized base URL with leading and trailing slash ("/foo/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut s = trimmed.to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    while s.contains("//") {
        s = s.replace("//", "/");
    }

    s
}
