//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r##"# lectern configuration
title: "My Documentation"

# Preview server port (`lectern serve --port` overrides it)
port: 4001

colors:
  main: "#445282"

# Optional logo, copied to assets/ on build
# logo: "_include/logo.png"

# Directory holding the generated HTML site
site_dir: "site"

# URL prefix when the site is not published at the domain root
base_url: "/"

search:
  # Site-relative pages that never enter the search index
  exclude: []
"##;

/// Write a starter lectern.yml and create the site directory
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;

    let site_dir = root.join("site");
    fs::create_dir_all(&site_dir).with_context(|| format!("Failed to create {:?}", site_dir))?;

    println!("✓ lectern initialized in {:?}", root);
    println!("  - Edit lectern.yml to set the title and theme color");
    println!("  - Generate your site into site/, then run `lectern build`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("lectern.yml");
    if config_path.exists() {
        println!("lectern.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}
