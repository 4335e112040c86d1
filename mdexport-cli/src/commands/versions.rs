//! Print the resolved version table.

use super::load_config;
use anyhow::Result;
use mdexport_core::VersionSet;
use serde_json::json;
use std::path::Path;

pub fn list_versions(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let versions = VersionSet::resolve(&config);

    if json {
        let payload: Vec<_> = versions
            .iter()
            .map(|v| {
                json!({
                    "name": v.name,
                    "kind": v.kind.as_str(),
                    "source_dir": v.source_dir.display().to_string(),
                    "url_prefix": v.url_prefix,
                    "exists": v.source_dir.is_dir(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for v in versions.iter() {
        let missing = if v.source_dir.is_dir() { "" } else { " (missing)" };
        println!(
            "{:<12} {:<9} docs/{:<12} {}{}",
            v.name,
            v.kind.as_str(),
            v.url_prefix,
            v.source_dir.display(),
            missing
        );
    }

    Ok(())
}
