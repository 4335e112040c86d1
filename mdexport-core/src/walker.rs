//! Discovery of exportable documents under a version root.

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as documentation pages
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Leading character of shared partials and other non-page files
pub const RESERVED_PREFIX: char = '_';

/// Category metadata file name
pub const CATEGORY_FILE: &str = "category.json";

/// A source document and its slug within the version root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub path: PathBuf,
    pub slug: String,
}

/// Whether a file should be exported, judged by its name alone
pub fn is_eligible(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with(RESERVED_PREFIX) || name == CATEGORY_FILE {
        return false;
    }
    has_document_extension(path)
}

pub fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Compute the slug of `path` relative to `root`.
///
/// The extension is dropped and components are joined with `/`, whatever the
/// platform separator. Returns `None` when `path` is not under `root`.
pub fn slug_for(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Recursively collect every eligible document under `root`.
///
/// A missing root yields an empty list: a version directory may not exist
/// before its first release cut.
pub fn find_documents(root: &Path) -> Vec<DocumentRecord> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_eligible(entry.path()) {
            continue;
        }
        if let Some(slug) = slug_for(root, entry.path()) {
            documents.push(DocumentRecord {
                path: entry.path().to_path_buf(),
                slug,
            });
        }
    }

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_eligibility() {
        assert!(is_eligible(Path::new("docs/intro.md")));
        assert!(is_eligible(Path::new("docs/guide/setup.mdx")));
        assert!(!is_eligible(Path::new("docs/_constants.mdx")));
        assert!(!is_eligible(Path::new("docs/_partial.md")));
        assert!(!is_eligible(Path::new("docs/category.json")));
        assert!(!is_eligible(Path::new("docs/diagram.png")));
        assert!(!is_eligible(Path::new("docs/README")));
    }

    #[test]
    fn test_slug_for() {
        let root = Path::new("/site/docs");
        assert_eq!(
            slug_for(root, Path::new("/site/docs/guide/setup.mdx")),
            Some("guide/setup".to_string())
        );
        assert_eq!(
            slug_for(root, Path::new("/site/docs/intro.md")),
            Some("intro".to_string())
        );
        assert_eq!(slug_for(root, Path::new("/other/intro.md")), None);
    }

    #[test]
    fn test_find_documents() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/advanced")).unwrap();
        fs::write(root.join("intro.md"), "# Intro").unwrap();
        fs::write(root.join("_constants.mdx"), "export const versions = {}").unwrap();
        fs::write(root.join("guide/setup.mdx"), "# Setup").unwrap();
        fs::write(root.join("guide/_category_.json"), "{}").unwrap();
        fs::write(root.join("guide/category.json"), "{}").unwrap();
        fs::write(root.join("guide/advanced/tuning.md"), "# Tuning").unwrap();
        fs::write(root.join("guide/logo.svg"), "<svg/>").unwrap();

        let mut slugs: Vec<_> = find_documents(root).into_iter().map(|d| d.slug).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["guide/advanced/tuning", "guide/setup", "intro"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        assert!(find_documents(&dir.path().join("versioned_docs/version-v9")).is_empty());
    }
}
