//! Preview server: serves the generated site, answers search queries and
//! re-indexes when pages change.

use super::build::{build_index, build_site_with_config, BuildOptions};
use super::search::run_query;
use anyhow::{Context, Result};
use askama::Template;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use lectern_core::{page::is_html, Config, SearchIndex};
use lectern_render::ResultList;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::{mpsc, RwLock};
use tower_http::trace::TraceLayer;

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Overrides `port` from the config file
    pub port: Option<u16>,
    pub watch: bool,
}

#[derive(Clone)]
pub(crate) struct AppState {
    site_dir: PathBuf,
    /// Normalized base URL the site is mounted under
    base_url: String,
    index: Arc<RwLock<SearchIndex>>,
}

/// Build the site, then serve it with search APIs and live re-indexing
pub async fn serve_site(config_path: &Path, opts: ServeOptions) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let port = opts.port.unwrap_or(config.port);

    let report = build_site_with_config(&config, &BuildOptions::default())
        .context("Failed to build site")?;
    let site_dir = config.site_dir();
    let base_url = config.normalized_base_url();

    let state = AppState {
        site_dir: site_dir.clone(),
        base_url: base_url.clone(),
        index: Arc::new(RwLock::new(report.index)),
    };

    // Keep the watcher alive for as long as the server runs
    let _watcher = if opts.watch {
        Some(watch_site(config, state.index.clone())?)
    } else {
        None
    };

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving {:?} on http://{}{}", site_dir, addr, base_url);
    println!(
        "\nServer running on {}",
        console::style(format!("http://{}{}", addr, base_url)).bold()
    );
    println!("   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(api_search))
        .route("/api/search/fragment", get(api_search_fragment))
        .fallback(serve_site_file)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Watch the site directory and re-index when HTML pages change
fn watch_site(config: Config, index: Arc<RwLock<SearchIndex>>) -> Result<RecommendedWatcher> {
    let site_dir = config.site_dir();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("Failed to initialize file watcher")?;

    watcher
        .watch(&site_dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {:?}", site_dir))?;

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Ok(ev) if touches_pages(&ev) => {
                    // Debounce: let a burst of writes settle, then drain it
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    while rx.try_recv().is_ok() {}

                    tracing::info!("Page change detected, re-indexing...");
                    let res = tokio::task::spawn_blocking({
                        let config = config.clone();
                        move || build_index(&config, true)
                    })
                    .await;

                    match res {
                        Ok(Ok(new_index)) => {
                            let count = new_index.len();
                            *index.write().await = new_index;
                            tracing::info!("Re-index complete ({} pages)", count);
                        }
                        Ok(Err(e)) => tracing::error!("Re-index failed, keeping previous index: {:?}", e),
                        Err(e) => tracing::error!("Re-index task panicked: {}", e),
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("Watcher error: {}", err),
            }
        }
    });

    Ok(watcher)
}

fn touches_pages(event: &notify::Event) -> bool {
    !event.kind.is_access() && event.paths.iter().any(|p| is_html(p))
}

// ---- static files ----

async fn serve_site_file(State(state): State<AppState>, uri: Uri) -> Response {
    let request_path = uri.path();
    let mount = state.base_url.trim_end_matches('/');

    // `/docs` for a site under `/docs/`
    if request_path == mount {
        return Redirect::permanent(&state.base_url).into_response();
    }

    let Some(path) = strip_base_url(request_path, &state.base_url)
        .and_then(|rel| resolve_file(rel, &state.site_dir))
    else {
        return not_found(&state).await;
    };

    match fs::read(&path).await {
        Ok(content) => {
            let mut response = Body::from(content).into_response();
            if let Some(content_type) = content_type_for(&path) {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
            response
        }
        Err(err) => {
            tracing::warn!("Failed to read {:?}: {}", path, err);
            not_found(&state).await
        }
    }
}

/// Serve the site's 404 page, or an empty 404 if it has none
async fn not_found(state: &AppState) -> Response {
    match fs::read_to_string(state.site_dir.join("404.html")).await {
        Ok(content) => (StatusCode::NOT_FOUND, Html(content)).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// The request path relative to the site root, or `None` outside the base URL
fn strip_base_url<'a>(request_path: &'a str, base_url: &str) -> Option<&'a str> {
    request_path
        .strip_prefix(base_url.trim_end_matches('/'))
        .filter(|rest| rest.starts_with('/'))
}

/// Map a request path onto a file in the site directory.
///
/// Directories resolve to their `index.html`; paths without a matching file
/// fall back to the same path with `.html` appended.
fn resolve_file(request_path: &str, site_dir: &Path) -> Option<PathBuf> {
    if request_path.contains("..") {
        return None;
    }

    let rel = request_path.trim_start_matches('/');
    let path = site_dir.join(rel);

    if path.is_file() {
        return Some(path);
    }

    if path.is_dir() {
        let index = path.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    let rel = rel.trim_end_matches('/');
    if rel.is_empty() {
        return None;
    }

    // Try with a .html extension
    let mut with_ext = OsString::from(site_dir.join(rel));
    with_ext.push(".html");
    let with_ext = PathBuf::from(with_ext);
    with_ext.is_file().then_some(with_ext)
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "txt" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => return None,
    };
    Some(content_type)
}

// ---- API handlers ----

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

async fn api_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    let index = state.index.read().await;
    let payload = run_query(&index, &query, params.limit.unwrap_or(DEFAULT_LIMIT));
    Json(payload).into_response()
}

async fn api_search_fragment(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    let hits = {
        let index = state.index.read().await;
        run_query(&index, &query, params.limit.unwrap_or(DEFAULT_LIMIT)).results
    };

    match (ResultList { hits }).render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!("Failed to render search results: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
