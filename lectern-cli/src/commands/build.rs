//! Build command implementation.

use anyhow::{Context, Result};
use askama::Template;
use include_dir::{include_dir, Dir};
use lectern_core::{collect_pages, Config, SearchIndex, INDEX_FILE_NAME};
use lectern_render::{render_stylesheet, SiteShell};
use std::fs;
use std::path::{Path, PathBuf};

// Embed the client assets at compile time so they're available after cargo install
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static");

const STYLESHEET_PATH: &str = "assets/lectern.css";
const SEARCH_PAGE: &str = "search.html";
const NOT_FOUND_PAGE: &str = "404.html";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Compact JSON output for publishing
    pub release: bool,
}

/// Outcome of a build
#[derive(Debug)]
pub struct BuildReport {
    pub index: SearchIndex,
    /// Files written, relative to the site directory
    pub written: Vec<PathBuf>,
}

/// Build the search index, theme and client assets into the configured site
pub fn build_site(config_path: &Path, opts: &BuildOptions) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(&config, opts).map(|_| ())
}

/// Build from an already loaded config, returning the index alongside the written files
pub fn build_site_with_config(config: &Config, opts: &BuildOptions) -> Result<BuildReport> {
    let site_dir = config.site_dir();
    let base_url = config.normalized_base_url();

    tracing::info!("Building search and theme for: {}", config.title);

    fs::create_dir_all(&site_dir)
        .with_context(|| format!("Failed to create site directory {:?}", site_dir))?;

    let mut written = Vec::new();

    write_stylesheet(config, &site_dir, &mut written)?;
    extract_embedded_static(&site_dir, &mut written)?;
    let logo_url = copy_logo(config, &site_dir, &base_url, &mut written)?;

    // Shell pages are noindex, so writing them before indexing keeps them out
    render_shell_pages(config, &site_dir, &base_url, logo_url, &mut written)?;

    let index = build_index(config, !opts.release)?;
    written.push(PathBuf::from(INDEX_FILE_NAME));

    tracing::info!("✓ Indexed {} pages", index.len());
    tracing::info!("✓ Wrote {} files to {:?}", written.len(), site_dir);

    Ok(BuildReport { index, written })
}

/// Collect pages from the site directory and write `search_index.json`
pub fn build_index(config: &Config, pretty: bool) -> Result<SearchIndex> {
    let site_dir = config.site_dir();
    let pages = collect_pages(&site_dir, &config.normalized_base_url(), &config.search.exclude)
        .with_context(|| format!("Failed to read pages from {:?}", site_dir))?;

    let index = SearchIndex::build(&pages);
    index
        .write(&site_dir.join(INDEX_FILE_NAME), pretty)
        .context("Failed to write search index")?;

    tracing::debug!("Wrote {} ({} documents)", INDEX_FILE_NAME, index.len());
    Ok(index)
}

fn write_stylesheet(config: &Config, site_dir: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    let colors = config.theme_colors().context("Invalid theme colors")?;
    let css = render_stylesheet(&colors).context("Failed to render theme stylesheet")?;

    write_file(site_dir, Path::new(STYLESHEET_PATH), css.as_bytes(), written)?;
    tracing::debug!("Rendered theme with main color {}", colors.main);
    Ok(())
}

fn extract_embedded_static(dest: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    // The include_dir crate stores full paths relative to the embedded root
    for entry in STATIC_ASSETS.entries() {
        extract_entry(entry, dest, written)?;
    }
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest, written)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            write_file(dest, file.path(), file.contents(), written)?;
        }
    }
    Ok(())
}

/// Copy the configured logo to `assets/logo.<ext>` and return its URL
fn copy_logo(
    config: &Config,
    site_dir: &Path,
    base_url: &str,
    written: &mut Vec<PathBuf>,
) -> Result<Option<String>> {
    let Some(logo) = config.logo_path() else {
        return Ok(None);
    };

    if !logo.is_file() {
        tracing::warn!("Configured logo {:?} does not exist", logo);
        return Ok(None);
    }

    let file_name = match logo.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("logo.{}", ext.to_lowercase()),
        None => "logo".to_string(),
    };
    let rel = Path::new("assets").join(&file_name);
    let contents = fs::read(&logo).with_context(|| format!("Failed to read logo {:?}", logo))?;
    write_file(site_dir, &rel, &contents, written)?;

    Ok(Some(format!("{}assets/{}", base_url, file_name)))
}

fn render_shell_pages(
    config: &Config,
    site_dir: &Path,
    base_url: &str,
    logo_url: Option<String>,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let search = SiteShell::search_page(&config.title, base_url)
        .with_logo(logo_url.clone())
        .render()
        .context("Failed to render search page")?;
    write_file(site_dir, Path::new(SEARCH_PAGE), search.as_bytes(), written)?;

    // The site generator may ship its own 404 page
    if site_dir.join(NOT_FOUND_PAGE).exists() {
        tracing::debug!("Keeping existing {}", NOT_FOUND_PAGE);
    } else {
        let not_found = SiteShell::not_found_page(&config.title, base_url)
            .with_logo(logo_url)
            .render()
            .context("Failed to render 404 page")?;
        write_file(site_dir, Path::new(NOT_FOUND_PAGE), not_found.as_bytes(), written)?;
    }

    Ok(())
}

fn write_file(site_dir: &Path, rel: &Path, contents: &[u8], written: &mut Vec<PathBuf>) -> Result<()> {
    let target = site_dir.join(rel);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    fs::write(&target, contents).with_context(|| format!("Failed to write {:?}", target))?;
    written.push(rel.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup(config_yaml: &str) -> (tempfile::TempDir, Config) {
        let dir = tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(site.join("guide")).unwrap();
        fs::write(
            site.join("index.html"),
            "<html><head><title>Welcome</title></head><body><main>Start here</main></body></html>",
        )
        .unwrap();
        fs::write(
            site.join("guide/setup.html"),
            "<html><head><title>Setup</title></head><body><main>Install the tool</main></body></html>",
        )
        .unwrap();

        let config_path = dir.path().join("lectern.yml");
        fs::write(&config_path, config_yaml).unwrap();
        let config = Config::from_file(&config_path).unwrap();
        (dir, config)
    }

    #[test]
    fn build_writes_assets_and_index() {
        let (dir, config) = setup("title: Docs\n");
        let report = build_site_with_config(&config, &BuildOptions::default()).unwrap();
        let site = dir.path().join("site");

        assert_eq!(report.index.len(), 2);
        for rel in ["assets/lectern.css", "assets/lectern.js", "search.html", "404.html", INDEX_FILE_NAME] {
            assert!(site.join(rel).is_file(), "missing {rel}");
            assert!(report.written.contains(&PathBuf::from(rel)), "unreported {rel}");
        }

        let css = fs::read_to_string(site.join("assets/lectern.css")).unwrap();
        assert!(css.contains("#445282"));
    }

    #[test]
    fn shell_pages_stay_out_of_the_index() {
        let (_dir, config) = setup("title: Docs\n");
        let report = build_site_with_config(&config, &BuildOptions::default()).unwrap();
        let uris: Vec<_> = report.index.documents.iter().map(|d| d.uri.as_str()).collect();
        assert_eq!(uris, vec!["/guide/setup", "/"]);
    }

    #[test]
    fn existing_404_page_is_kept() {
        let (dir, config) = setup("title: Docs\n");
        let custom = dir.path().join("site/404.html");
        fs::write(&custom, "custom").unwrap();

        let report = build_site_with_config(&config, &BuildOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&custom).unwrap(), "custom");
        assert!(!report.written.contains(&PathBuf::from("404.html")));
    }

    #[test]
    fn release_build_writes_compact_index() {
        let (dir, config) = setup("title: Docs\n");
        build_site_with_config(&config, &BuildOptions { release: true }).unwrap();
        let json = fs::read_to_string(dir.path().join("site").join(INDEX_FILE_NAME)).unwrap();
        assert!(!json.contains('\n'));

        build_site_with_config(&config, &BuildOptions { release: false }).unwrap();
        let json = fs::read_to_string(dir.path().join("site").join(INDEX_FILE_NAME)).unwrap();
        assert!(json.contains("\n  \"version\": 1"));
    }

    #[test]
    fn logo_is_copied_and_linked() {
        let (dir, config) = setup("title: Docs\nlogo: brand/Logo.PNG\nbase_url: /docs\n");
        fs::create_dir_all(dir.path().join("brand")).unwrap();
        fs::write(dir.path().join("brand/Logo.PNG"), b"png").unwrap();

        build_site_with_config(&config, &BuildOptions::default()).unwrap();
        let site = dir.path().join("site");
        assert_eq!(fs::read(site.join("assets/logo.png")).unwrap(), b"png");
        let search = fs::read_to_string(site.join("search.html")).unwrap();
        assert!(search.contains("src=\"/docs/assets/logo.png\""));
    }

    #[test]
    fn missing_logo_is_skipped() {
        let (dir, config) = setup("title: Docs\nlogo: nowhere.svg\n");
        build_site_with_config(&config, &BuildOptions::default()).unwrap();
        assert!(!dir.path().join("site/assets/logo.svg").exists());
    }
}
