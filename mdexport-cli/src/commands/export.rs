//! Full export commands.

use super::{build_exporter, load_config, watch::watch_and_export};
use anyhow::{bail, Result};
use mdexport_core::{ExportReport, WatcherRegistry};
use std::path::Path;
use std::sync::Arc;

static WATCHERS: WatcherRegistry = WatcherRegistry::new();

/// Export into the static asset directory, optionally watching for changes
pub async fn export_static(config_path: &Path, watch: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let exporter = build_exporter(&config)?;
    let out_root = config.static_output_dir();

    tracing::info!("Generating markdown files...");
    let report = exporter.export_all(&out_root);
    check_report(&report)?;
    println!(
        "✓ Generated {} of {} markdown files to {}",
        report.exported,
        report.discovered,
        out_root.display()
    );

    if watch {
        let Some(_guard) = WATCHERS.try_acquire() else {
            tracing::warn!("A file watcher is already running");
            return Ok(());
        };
        watch_and_export(Arc::new(exporter), out_root, config.watch).await?;
    }

    Ok(())
}

/// Export into the build output directory
pub fn publish(config_path: &Path, out_dir: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let exporter = build_exporter(&config)?;
    let out_root = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.build_output_dir());

    tracing::info!("Generating markdown files for build...");
    let report = exporter.export_all(&out_root);
    check_report(&report)?;
    println!(
        "✓ Exported {} of {} markdown files to {}",
        report.exported,
        report.discovered,
        out_root.display()
    );
    Ok(())
}

/// Only a run where nothing could be written fails the build
fn check_report(report: &ExportReport) -> Result<()> {
    if report.is_total_failure() {
        bail!(
            "None of the {} discovered documents could be exported",
            report.discovered
        );
    }
    if report.failed > 0 {
        tracing::warn!("{} document(s) failed to export", report.failed);
    }
    Ok(())
}
