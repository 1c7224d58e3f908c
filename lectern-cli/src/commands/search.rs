//! Search command implementation

use anyhow::{bail, Context, Result};
use lectern_core::{Config, QueryConfig, SearchHit, SearchIndex, INDEX_FILE_NAME};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: usize,
    pub json: bool,
}

/// Search results as returned by `--json` and `/api/search`
#[derive(Debug, Serialize)]
pub struct SearchPayload {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

/// Search the built site index
pub fn search_site(config_path: &Path, query: &str, opts: SearchOptions) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let index_path = config.site_dir().join(INDEX_FILE_NAME);

    if !index_path.exists() {
        bail!(
            "Search index not found at {:?}. Run `lectern build` first.",
            index_path
        );
    }

    let index = SearchIndex::load(&index_path).context("Failed to load search index")?;
    let payload = run_query(&index, query, opts.limit);

    if opts.json {
        let json = serde_json::to_string_pretty(&payload)?;
        println!("{json}");
        return Ok(());
    }

    if payload.results.is_empty() {
        println!("No results found for '{}'", query);
        return Ok(());
    }

    println!("\nFound {} results for '{}':\n", payload.total, query);
    for hit in &payload.results {
        println!("{}", console::style(&hit.title).bold());
        println!("  {}", hit.uri);
        println!();
    }

    if payload.total > payload.results.len() {
        println!("  ... and {} more results", payload.total - payload.results.len());
    }

    Ok(())
}

/// Run a query with the fixed site weighting, keeping at most `limit` hits
pub fn run_query(index: &SearchIndex, query: &str, limit: usize) -> SearchPayload {
    let mut results = index.query(query, &QueryConfig::default());
    let total = results.len();
    results.truncate(limit);

    SearchPayload {
        query: query.to_string(),
        total,
        results,
    }
}
