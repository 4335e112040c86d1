//! CLI command implementations.

pub mod export;
pub mod render;
pub mod versions;
pub mod watch;

pub use export::{export_static, publish};
pub use render::render_document;
pub use versions::list_versions;

use anyhow::{Context, Result};
use mdexport_core::{Config, MarkdownExporter};
use std::path::Path;

/// Load the config and pin the site directory to an absolute path.
///
/// Watcher events carry absolute paths, so version lookup needs the
/// version source directories in the same form.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let mut config =
        Config::load_or_default(config_path).context("Failed to load configuration")?;
    let site_dir = config.site_dir();
    config.site_dir = std::fs::canonicalize(&site_dir)
        .with_context(|| format!("Site directory not found: {:?}", site_dir))?;
    Ok(config)
}

pub fn build_exporter(config: &Config) -> Result<MarkdownExporter> {
    MarkdownExporter::from_config(config).context("Failed to prepare export")
}
