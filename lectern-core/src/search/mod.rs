//! Full-text search over generated pages.
//!
//! The index is built at site-build time, written to `search_index.json` and
//! queried either in the browser or by the preview server and CLI. Two fields
//! are indexed, `title` and `body`; documents are referenced by their `uri`.

mod index;
mod query;
mod tokenize;

pub use index::{DocumentRef, FieldIndex, SearchIndex, INDEX_VERSION};
pub use query::{BoolMode, FieldBoost, QueryConfig, SearchHit};
pub use tokenize::{is_stop_word, tokenize};

use std::path::PathBuf;
use thiserror::Error;

/// Name of the index file at the site root
pub const INDEX_FILE_NAME: &str = "search_index.json";

pub const TITLE_FIELD: &str = "title";
pub const BODY_FIELD: &str = "body";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to read search index {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write search index {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse search index: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported search index version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Corrupt search index: {0}")]
    Corrupt(String),
}
