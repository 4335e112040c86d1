use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &str) -> std::io::Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, content)
}

fn build_site(root: &Path) -> std::io::Result<()> {
    write(&root.join("mdexport.yml"), "site_dir: .\n")?;
    write(&root.join("versions.json"), r#"["v2.0.x", "v1.0.x"]"#)?;
    write(
        &root.join("docs/_constants.mdx"),
        "export const versions = { githubRef: 'main' };\n",
    )?;
    write(&root.join("docs/intro.md"), "# Intro\n\nWelcome.\n")?;
    write(
        &root.join("versioned_docs/version-v2.0.x/intro.mdx"),
        "import Tabs from '@theme/Tabs';\n\nRef {versions.githubRef}.\n",
    )?;
    Ok(())
}

#[test]
fn publish_writes_build_tree() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    build_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("mdexport")?
        .arg("--config")
        .arg(dir.path().join("mdexport.yml"))
        .arg("publish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 of 2 markdown files"));

    let out = dir.path().join("build/md/docs");
    assert_eq!(
        fs::read_to_string(out.join("next/intro.md"))?,
        "# Intro\n\nWelcome.\n"
    );
    // No constants file for v2.0.x, so the default ref applies
    assert_eq!(fs::read_to_string(out.join("intro.md"))?, "Ref main.\n");
    assert!(!out.join("v1.0.x").exists());

    Ok(())
}

#[test]
fn versions_json_lists_resolved_versions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    build_site(dir.path())?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("mdexport")?
        .current_dir(dir.path())
        .args(["versions", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let arr = value.as_array().expect("json array");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["name"], "current");
    assert_eq!(arr[0]["url_prefix"], "next/");
    assert_eq!(arr[1]["kind"], "latest");
    assert_eq!(arr[1]["url_prefix"], "");
    assert_eq!(arr[2]["url_prefix"], "v1.0.x/");
    assert_eq!(arr[2]["exists"], false);

    Ok(())
}

#[test]
fn render_prints_document() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    build_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("mdexport")?
        .current_dir(dir.path())
        .args(["render", "versioned_docs/version-v2.0.x/intro.mdx"])
        .assert()
        .success()
        .stdout("Ref main.\n");

    Ok(())
}

#[test]
fn render_rejects_reserved_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    build_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("mdexport")?
        .current_dir(dir.path())
        .args(["render", "docs/_constants.mdx"])
        .assert()
        .failure();

    Ok(())
}
