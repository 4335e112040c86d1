//! Export orchestration - resolves versions, walks trees, transforms and writes.

use crate::{
    config::Config,
    constants::{Constants, ConstantsCache},
    transform::{transform_document, TransformContext},
    versions::{VersionDescriptor, VersionSet},
    walker::{find_documents, is_eligible, slug_for},
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Site directory not found: {0:?}")]
    SiteDirMissing(PathBuf),
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Counts from a full export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Eligible documents found across all versions
    pub discovered: usize,
    pub exported: usize,
    pub failed: usize,
    /// Versions whose source directory does not exist
    pub skipped_versions: Vec<String>,
}

impl ExportReport {
    /// True when documents were found but none could be written
    pub fn is_total_failure(&self) -> bool {
        self.discovered > 0 && self.exported == 0
    }
}

/// Output file for `slug` in a version published under `url_prefix`.
///
/// Lays the file out as `{out_root}/docs/{url_prefix}{slug}.md`.
///
/// # Example
///
/// ```
/// use mdexport_core::export::output_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     output_path(Path::new("/out"), "v1.2.x/", "guide/setup"),
///     PathBuf::from("/out/docs/v1.2.x/guide/setup.md")
/// );
/// assert_eq!(
///     output_path(Path::new("/out"), "", "guide/setup"),
///     PathBuf::from("/out/docs/guide/setup.md")
/// );
/// ```
pub fn output_path(out_root: &Path, url_prefix: &str, slug: &str) -> PathBuf {
    let rel = format!("{}{}.md", url_prefix, slug);
    let mut path = out_root.join("docs");
    for part in rel.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Exports every version of a documentation site as plain Markdown
#[derive(Debug)]
pub struct MarkdownExporter {
    site_dir: PathBuf,
    versions: VersionSet,
    constants_file: String,
    cache: ConstantsCache,
}

impl MarkdownExporter {
    pub fn new(site_dir: PathBuf, versions: VersionSet, constants_file: impl Into<String>) -> Self {
        Self {
            site_dir,
            versions,
            constants_file: constants_file.into(),
            cache: ConstantsCache::new(),
        }
    }

    /// Resolve versions from the site manifest and build an exporter.
    ///
    /// Fails only when the site directory itself is missing.
    pub fn from_config(config: &Config) -> Result<Self, ExportError> {
        let site_dir = config.site_dir();
        if !site_dir.is_dir() {
            return Err(ExportError::SiteDirMissing(site_dir));
        }
        let versions = VersionSet::resolve(config);
        Ok(Self::new(site_dir, versions, config.constants_file.clone()))
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    pub fn cache(&self) -> &ConstantsCache {
        &self.cache
    }

    fn constants_path(&self, version: &VersionDescriptor) -> PathBuf {
        version.source_dir.join(&self.constants_file)
    }

    /// Export every document of every version under `out_root`.
    ///
    /// Versions and documents are processed sequentially in traversal order.
    /// A failing document is logged and counted; it never stops the run.
    pub fn export_all(&self, out_root: &Path) -> ExportReport {
        let mut report = ExportReport::default();

        for version in self.versions.iter() {
            if !version.source_dir.is_dir() {
                tracing::info!(
                    "Skipping {}: {:?} not found",
                    version.name,
                    version.source_dir
                );
                report.skipped_versions.push(version.name.clone());
                continue;
            }

            // Fresh run: always reload so edits since the last run are seen
            let constants = self.cache.reload(&version.name, &self.constants_path(version));

            let documents = find_documents(&version.source_dir);
            tracing::info!("Processing {}: {} docs", version.name, documents.len());
            report.discovered += documents.len();

            for doc in &documents {
                let target = output_path(out_root, &version.url_prefix, &doc.slug);
                match export_document(&doc.path, &target, &constants) {
                    Ok(()) => report.exported += 1,
                    Err(e) => {
                        tracing::error!("Error processing {:?}: {}", doc.path, e);
                        report.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            "Generated {} of {} markdown files to {:?}",
            report.exported,
            report.discovered,
            out_root
        );
        report
    }

    /// Export a single changed document.
    ///
    /// Returns `Ok(false)` when the path is not an eligible document of any
    /// known version. Constants are taken from the cache, loading them on
    /// first use for the version.
    pub fn export_file(&self, path: &Path, out_root: &Path) -> Result<bool, ExportError> {
        let Some((version, slug)) = self.locate(path) else {
            return Ok(false);
        };

        let constants = self
            .cache
            .get_or_load(&version.name, &self.constants_path(version));
        let target = output_path(out_root, &version.url_prefix, &slug);
        export_document(path, &target, &constants)?;
        tracing::debug!("Exported {:?} -> {:?}", path, target);
        Ok(true)
    }

    /// Transform a single document without writing it.
    ///
    /// Returns `Ok(None)` for paths outside every version.
    pub fn render_file(&self, path: &Path) -> Result<Option<String>, ExportError> {
        let Some((version, _slug)) = self.locate(path) else {
            return Ok(None);
        };
        let constants = self
            .cache
            .get_or_load(&version.name, &self.constants_path(version));
        render_document(path, &constants).map(Some)
    }

    /// Output file a source path maps to, if it is an eligible document
    pub fn output_path_for(&self, path: &Path, out_root: &Path) -> Option<PathBuf> {
        self.locate(path)
            .map(|(version, slug)| output_path(out_root, &version.url_prefix, &slug))
    }

    fn locate(&self, path: &Path) -> Option<(&VersionDescriptor, String)> {
        if !is_eligible(path) {
            return None;
        }
        let version = self.versions.version_for_path(path)?;
        let slug = slug_for(&version.source_dir, path)?;
        Some((version, slug))
    }
}

fn render_document(source: &Path, constants: &Constants) -> Result<String, ExportError> {
    let raw = fs::read_to_string(source).map_err(|e| ExportError::io(source, e))?;
    let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
    Ok(transform_document(
        &raw,
        &TransformContext::new(constants, source_dir),
    ))
}

/// Transform `source` and write the result to `target`
fn export_document(source: &Path, target: &Path, constants: &Constants) -> Result<(), ExportError> {
    let markdown = render_document(source, constants)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::write(target, markdown).map_err(|e| ExportError::io(target, e))?;
    Ok(())
}
