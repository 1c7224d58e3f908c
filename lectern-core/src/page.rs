//! Extraction of indexable pages from a generated HTML site.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Blocks whose text never belongs in the index, removed in this order
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "nav"];

static HIDDEN_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    HIDDEN_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b.*?</{tag}\s*>")).unwrap())
        .collect()
});
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static FIRST_H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").unwrap());
static MAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<main\b[^>]*>(.*)</main\s*>").unwrap());
static BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").unwrap());
static NOINDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta\s+name\s*=\s*["']robots["']\s+content\s*=\s*["'][^"']*noindex"#).unwrap()
});

/// A generated page as seen by the search index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub uri: String,
    pub title: String,
    pub body: String,
}

/// Site URI for an HTML file relative to the site root.
///
/// `index.html` maps to its directory (`guide/index.html` -> `/guide/`), other
/// pages drop the extension (`guide/setup.html` -> `/guide/setup`).
pub fn uri_for(rel_path: &Path, base_url: &str) -> String {
    let mut parts: Vec<String> = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    let last = parts.pop().unwrap_or_default();
    let stem = last
        .strip_suffix(".html")
        .or_else(|| last.strip_suffix(".htm"))
        .unwrap_or(&last);

    let mut uri = base_url.to_string();
    if !uri.ends_with('/') {
        uri.push('/');
    }
    for dir in &parts {
        uri.push_str(dir);
        uri.push('/');
    }
    if stem != "index" {
        uri.push_str(stem);
    }
    uri
}

/// Extract the title and plain-text body of an HTML document.
///
/// Returns `None` for pages that opt out with a robots `noindex` meta tag.
pub fn extract_page(html: &str, uri: &str, fallback_title: &str) -> Option<Page> {
    if NOINDEX.is_match(html) {
        return None;
    }

    let title = TITLE
        .captures(html)
        .or_else(|| FIRST_H1.captures(html))
        .map(|c| html_to_text(&c[1]))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    let content = MAIN
        .captures(html)
        .or_else(|| BODY.captures(html))
        .map(|c| c.get(1).map_or("", |m| m.as_str()).to_string())
        .unwrap_or_else(|| html.to_string());

    let content = HIDDEN_BLOCKS
        .iter()
        .fold(content, |html, re| re.replace_all(&html, " ").into_owned());

    Some(Page {
        uri: uri.to_string(),
        title,
        body: html_to_text(&content),
    })
}

/// Walk the site directory and extract every indexable page, ordered by path.
pub fn collect_pages(site_dir: &Path, base_url: &str, exclude: &[PathBuf]) -> std::io::Result<Vec<Page>> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(site_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_html(path) {
            continue;
        }

        let rel = path.strip_prefix(site_dir).unwrap_or(path);
        if exclude.iter().any(|ex| ex == rel) {
            tracing::debug!("Excluded from index: {:?}", rel);
            continue;
        }

        let html = fs::read_to_string(path)?;
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match extract_page(&html, &uri_for(rel, base_url), &fallback) {
            Some(page) => pages.push(page),
            None => tracing::debug!("Skipping noindex page: {:?}", rel),
        }
    }

    Ok(pages)
}

pub fn is_html(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    )
}

fn html_to_text(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' if in_tag => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_uri_for() {
        assert_eq!(uri_for(Path::new("index.html"), "/"), "/");
        assert_eq!(uri_for(Path::new("guide/index.html"), "/"), "/guide/");
        assert_eq!(uri_for(Path::new("guide/setup.html"), "/"), "/guide/setup");
        assert_eq!(uri_for(Path::new("faq.htm"), "/docs/"), "/docs/faq");
    }

    #[test]
    fn test_extract_title_and_main_body() {
        let html = r#"<html><head><title>Install &amp; Setup</title>
<style>body { color: red; }</style></head>
<body><nav><a href="/">Home</a></nav>
<main><h1>Install</h1><p>Run the <code>setup</code> script.</p>
<script>console.log("hidden")</script></main></body></html>"#;

        let page = extract_page(html, "/install", "install").unwrap();
        assert_eq!(page.title, "Install & Setup");
        assert_eq!(page.body, "Install Run the setup script.");
    }

    #[test]
    fn test_title_falls_back_to_h1_then_file_stem() {
        let page = extract_page("<body><h1>Getting <em>Started</em></h1></body>", "/a", "a").unwrap();
        assert_eq!(page.title, "Getting Started");

        let page = extract_page("<body><p>Text</p></body>", "/b", "b").unwrap();
        assert_eq!(page.title, "b");
    }

    #[test]
    fn test_body_without_main_strips_nav() {
        let html = "<body><nav>Menu Links</nav><p>Only this</p></body>";
        let page = extract_page(html, "/", "index").unwrap();
        assert_eq!(page.body, "Only this");
    }

    #[test]
    fn test_nested_hidden_blocks_are_removed_whole() {
        let html = "<body><nav><style>a { color: red }</style>Menu links</nav><p>Kept</p>\
<script>var s = '</style>';</script><p>Also kept</p></body>";
        let page = extract_page(html, "/", "index").unwrap();
        assert_eq!(page.body, "Kept Also kept");
    }

    #[test]
    fn test_noindex_pages_are_skipped() {
        let html = r#"<head><meta name="robots" content="noindex, nofollow"></head><body>x</body>"#;
        assert!(extract_page(html, "/search", "search").is_none());
    }

    #[test]
    fn test_collect_pages_walks_sorted_and_excludes() {
        let dir = tempdir().unwrap();
        let site = dir.path();
        fs::create_dir_all(site.join("guide")).unwrap();
        fs::write(site.join("index.html"), "<title>Home</title><main>Welcome</main>").unwrap();
        fs::write(site.join("guide/setup.html"), "<title>Setup</title><main>Steps</main>").unwrap();
        fs::write(site.join("draft.html"), "<title>Draft</title>").unwrap();
        fs::write(site.join("style.css"), "main { }").unwrap();

        let pages = collect_pages(site, "/", &[PathBuf::from("draft.html")]).unwrap();
        let uris: Vec<_> = pages.iter().map(|p| p.uri.as_str()).collect();
        assert_eq!(uris, vec!["/guide/setup", "/"]);
    }
}
