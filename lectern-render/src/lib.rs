//! # lectern-render
//!
//! Template rendering library for lectern.
//!
//! This crate renders the theme stylesheet, the site shell and search result
//! lists using Askama.

pub mod templates;

pub use templates::{render_stylesheet, RenderError, ResultList, SiteShell, ThemeStylesheet};
