//! CLI command implementations.

pub mod build;
pub mod init;
pub mod search;
pub mod serve;

pub use build::{build_site, BuildOptions};
pub use init::init_project;
pub use search::{search_site, SearchOptions};
pub use serve::{serve_site, ServeOptions};
