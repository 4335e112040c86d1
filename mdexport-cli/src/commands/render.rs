//! Print a single exported document to stdout.

use super::{build_exporter, load_config};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn render_document(config_path: &Path, file: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let exporter = build_exporter(&config)?;

    let file = std::fs::canonicalize(file).with_context(|| format!("File not found: {:?}", file))?;
    match exporter.render_file(&file)? {
        Some(markdown) => {
            print!("{}", markdown);
            Ok(())
        }
        None => bail!(
            "{:?} is not an exportable document of any known version",
            file
        ),
    }
}
