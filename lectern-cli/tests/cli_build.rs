use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[test]
fn build_writes_theme_script_and_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let site = dir.path().join("public");
    fs::create_dir_all(&site)?;
    fs::write(
        dir.path().join("docs.yml"),
        "title: Handbook\nsite_dir: public\ncolors:\n  main: \"#0a7f3f\"\n",
    )?;
    fs::write(
        site.join("index.html"),
        "<html><head><title>Handbook</title></head><body><main>Hello</main></body></html>",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("lectern")?
        .current_dir(dir.path())
        .args(["--config", "docs.yml", "build"])
        .assert()
        .success();

    let css = fs::read_to_string(site.join("assets/lectern.css"))?;
    assert!(css.contains("#0a7f3f"));
    assert!(!css.contains("theme_main"));

    let js = fs::read_to_string(site.join("assets/lectern.js"))?;
    assert!(js.contains("scrollPosition"));
    assert!(js.contains("search_index.json"));

    let index: Value = serde_json::from_str(&fs::read_to_string(site.join("search_index.json"))?)?;
    assert_eq!(index["version"], 1);
    assert_eq!(index["documents"], serde_json::json!([{"uri": "/", "title": "Handbook"}]));

    assert!(site.join("search.html").is_file());
    assert!(site.join("404.html").is_file());

    Ok(())
}

#[test]
fn release_build_is_compact() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("site"))?;
    fs::write(dir.path().join("lectern.yml"), "title: Docs\n")?;
    fs::write(dir.path().join("site/index.html"), "<title>Docs</title><main>Body</main>")?;

    #[allow(deprecated)]
    Command::cargo_bin("lectern")?
        .current_dir(dir.path())
        .args(["build", "--release"])
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("site/search_index.json"))?;
    assert!(!json.contains('\n'));

    Ok(())
}

#[test]
fn build_rejects_invalid_color() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("lectern.yml"),
        "title: Docs\ncolors:\n  main: not-a-color\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("lectern")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-color"));

    Ok(())
}

#[test]
fn init_writes_a_buildable_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("lectern")?
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("lectern initialized"));

    assert!(dir.path().join("lectern.yml").is_file());

    #[allow(deprecated)]
    Command::cargo_bin("lectern")?
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success();

    assert!(dir.path().join("site/search_index.json").is_file());

    Ok(())
}
