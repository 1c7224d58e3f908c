//! # lectern-core
//!
//! Core library for lectern, the search and theme layer of a generated
//! documentation site.
//!
//! This crate loads site configuration, derives theme colors, extracts pages
//! from generated HTML and builds and queries the full-text search index.

pub mod config;
pub mod page;
pub mod search;
pub mod theme;

pub use config::{Config, ConfigError};
pub use page::{collect_pages, extract_page, Page};
pub use search::{
    QueryConfig, SearchError, SearchHit, SearchIndex, BODY_FIELD, INDEX_FILE_NAME, TITLE_FIELD,
};
pub use theme::{Color, ThemeColors, ThemeError};
