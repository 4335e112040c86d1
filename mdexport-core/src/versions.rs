//! Documentation version discovery.
//!
//! Versions come from a JSON manifest listing released versions, most recent
//! first. The unreleased docs are always present as [`CURRENT_VERSION`] and
//! are published under `next/`; the first manifest entry is the latest
//! release and owns the unprefixed URL space.

use crate::config::Config;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the unreleased, actively edited version
pub const CURRENT_VERSION: &str = "current";

/// URL prefix of the unreleased version
pub const NEXT_PREFIX: &str = "next/";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Current,
    Latest,
    Archived,
}

impl VersionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionKind::Current => "current",
            VersionKind::Latest => "latest",
            VersionKind::Archived => "archived",
        }
    }
}

/// One documentation version and where it lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub name: String,
    pub source_dir: PathBuf,
    pub url_prefix: String,
    pub kind: VersionKind,
}

/// Ordered set of versions with pairwise distinct names and prefixes
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    versions: Vec<VersionDescriptor>,
}

/// Read the version manifest.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_manifest(path: &Path) -> Result<Option<Vec<String>>, ManifestError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let names: Vec<String> = serde_json::from_str(&contents)?;
    Ok(Some(names))
}

impl VersionSet {
    /// Resolve the versions described by the manifest named in `config`.
    ///
    /// A missing manifest falls back to `config.fallback_versions`; a
    /// malformed one is reported and treated as empty.
    pub fn resolve(config: &Config) -> Self {
        let manifest_path = config.manifest_path();
        let names = match read_manifest(&manifest_path) {
            Ok(Some(names)) => names,
            Ok(None) => {
                tracing::debug!(
                    "No manifest at {:?}, using {} fallback version(s)",
                    manifest_path,
                    config.fallback_versions.len()
                );
                config.fallback_versions.clone()
            }
            Err(e) => {
                tracing::warn!("Could not parse {:?}: {}", manifest_path, e);
                Vec::new()
            }
        };

        Self::from_names(&names, config)
    }

    /// Build the set from released version names, most recent first
    pub fn from_names(names: &[String], config: &Config) -> Self {
        let mut versions = vec![VersionDescriptor {
            name: CURRENT_VERSION.to_string(),
            source_dir: config.current_docs_dir(),
            url_prefix: NEXT_PREFIX.to_string(),
            kind: VersionKind::Current,
        }];

        let mut seen_names: HashSet<String> = HashSet::from([CURRENT_VERSION.to_string()]);
        let mut seen_prefixes: HashSet<String> = HashSet::from([NEXT_PREFIX.to_string()]);
        let mut latest_assigned = false;

        for raw in names {
            let name = raw.trim();
            if name.is_empty() {
                tracing::warn!("Ignoring empty version name in manifest");
                continue;
            }

            let (url_prefix, kind) = if latest_assigned {
                (format!("{}/", name), VersionKind::Archived)
            } else {
                (String::new(), VersionKind::Latest)
            };

            if seen_names.contains(name) || seen_prefixes.contains(&url_prefix) {
                tracing::warn!(
                    "Ignoring version '{}': name or URL prefix already in use",
                    name
                );
                continue;
            }

            seen_names.insert(name.to_string());
            seen_prefixes.insert(url_prefix.clone());
            latest_assigned = true;

            versions.push(VersionDescriptor {
                name: name.to_string(),
                source_dir: config.version_docs_dir(name),
                url_prefix,
                kind,
            });
        }

        Self { versions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionDescriptor> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&VersionDescriptor> {
        self.versions.iter().find(|v| v.name == name)
    }

    /// The released version served without a prefix, if any
    pub fn latest(&self) -> Option<&VersionDescriptor> {
        self.versions.iter().find(|v| v.kind == VersionKind::Latest)
    }

    /// Find the version whose source directory contains `path`
    pub fn version_for_path(&self, path: &Path) -> Option<&VersionDescriptor> {
        self.versions
            .iter()
            .filter(|v| path.starts_with(&v.source_dir))
            // Nested layouts: the deepest source dir wins
            .max_by_key(|v| v.source_dir.components().count())
    }
}
