//! Askama template definitions.

use askama::Template;
use lectern_core::{SearchHit, ThemeColors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

/// The theme stylesheet with its color placeholders filled in
#[derive(Template)]
#[template(path = "theme.css", escape = "none")]
pub struct ThemeStylesheet {
    pub theme_main: String,
    pub theme_main_dark: String,
}

impl From<&ThemeColors> for ThemeStylesheet {
    fn from(colors: &ThemeColors) -> Self {
        Self {
            theme_main: colors.main.clone(),
            theme_main_dark: colors.main_dark.clone(),
        }
    }
}

/// Render `theme.css` for the given colors
pub fn render_stylesheet(colors: &ThemeColors) -> Result<String, RenderError> {
    Ok(ThemeStylesheet::from(colors).render()?)
}

/// Page shell: header with search box, navigation sidebar, content pane and
/// outline sidebar.
#[derive(Template)]
#[template(path = "shell.html")]
pub struct SiteShell {
    pub site_title: String,
    pub page_title: String,

    /// Normalized base URL, used to prefix asset and index links
    pub base_url: String,
    pub logo_url: Option<String>,

    // Pre-rendered HTML fragments
    pub content: String,
    pub sidebar: String,
    pub outline: String,

    /// Adds a robots noindex meta so the page stays out of the search index
    pub noindex: bool,
}

impl SiteShell {
    pub fn new(site_title: &str, page_title: &str, base_url: &str) -> Self {
        Self {
            site_title: site_title.to_string(),
            page_title: page_title.to_string(),
            base_url: base_url.to_string(),
            logo_url: None,
            content: String::new(),
            sidebar: String::new(),
            outline: String::new(),
            noindex: false,
        }
    }

    pub fn with_logo(mut self, logo_url: Option<String>) -> Self {
        self.logo_url = logo_url;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Navigation HTML for the left sidebar
    pub fn with_sidebar(mut self, sidebar: impl Into<String>) -> Self {
        self.sidebar = sidebar.into();
        self
    }

    /// Page outline HTML for the right sidebar
    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = outline.into();
        self
    }

    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    /// Standalone search page; results are filled in by the client script
    pub fn search_page(site_title: &str, base_url: &str) -> Self {
        Self::new(site_title, "Search", base_url)
            .with_content(
                "<h1>Search</h1>\n<p class=\"lectern-search-hint\">Start typing in the search box to find pages.</p>",
            )
            .noindex()
    }

    pub fn not_found_page(site_title: &str, base_url: &str) -> Self {
        Self::new(site_title, "Page not found", base_url)
            .with_content(format!(
                "<h1>Page not found</h1>\n<p>The page you requested does not exist. <a href=\"{}\">Back to the start</a>.</p>",
                base_url
            ))
            .noindex()
    }
}

/// Search results as list items, the same markup the client script renders
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultList {
    pub hits: Vec<SearchHit>,
}
