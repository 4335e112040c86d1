//! Per-version placeholder constants.
//!
//! Each version root may carry a `_constants.mdx` partial exporting a
//! `versions` object literal. Only four string fields are ever needed, so the
//! file is scanned with targeted patterns instead of being evaluated.

use parking_lot::Mutex;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// The fixed set of placeholder keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstantKey {
    ImageTag,
    SourceRef,
    PackageChart,
    PackageSource,
}

impl ConstantKey {
    pub const ALL: [ConstantKey; 4] = [
        ConstantKey::ImageTag,
        ConstantKey::SourceRef,
        ConstantKey::PackageChart,
        ConstantKey::PackageSource,
    ];

    /// Field name used in the constants file and in `{versions.<field>}`
    pub fn field(&self) -> &'static str {
        match self {
            ConstantKey::ImageTag => "dockerTag",
            ConstantKey::SourceRef => "githubRef",
            ConstantKey::PackageChart => "helmChart",
            ConstantKey::PackageSource => "helmSource",
        }
    }

    /// Kebab-case alias accepted in placeholders
    pub fn alias(&self) -> &'static str {
        match self {
            ConstantKey::ImageTag => "image-tag",
            ConstantKey::SourceRef => "source-ref",
            ConstantKey::PackageChart => "package-chart",
            ConstantKey::PackageSource => "package-source",
        }
    }

    /// Value substituted when the constants file does not define the key
    pub fn default_value(&self) -> &'static str {
        match self {
            ConstantKey::ImageTag => "latest",
            ConstantKey::SourceRef => "main",
            ConstantKey::PackageChart | ConstantKey::PackageSource => "",
        }
    }

    /// Look up a key by field name or alias
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.field() == token || key.alias() == token)
    }
}

/// Placeholder values for one version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constants {
    values: BTreeMap<ConstantKey, String>,
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ConstantKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: ConstantKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: ConstantKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// The value for `key`, or its default. Empty values count as unset.
    pub fn resolve(&self, key: ConstantKey) -> &str {
        match self.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => key.default_value(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

static VERSIONS_BLOCK: OnceLock<Regex> = OnceLock::new();
static FIELD_PATTERNS: OnceLock<Vec<(ConstantKey, Regex)>> = OnceLock::new();

fn versions_block_regex() -> &'static Regex {
    VERSIONS_BLOCK
        .get_or_init(|| Regex::new(r"export\s+const\s+versions\s*=\s*\{([^}]+)\}").unwrap())
}

fn field_patterns() -> &'static [(ConstantKey, Regex)] {
    FIELD_PATTERNS.get_or_init(|| {
        ConstantKey::ALL
            .into_iter()
            .map(|key| {
                let pattern = format!(r#"\b{}\s*:\s*['"]([^'"]+)['"]"#, regex::escape(key.field()));
                (key, Regex::new(&pattern).unwrap())
            })
            .collect()
    })
}

/// Extract the constants from the text of a constants file.
///
/// Fields that are missing from the `versions` literal are omitted.
pub fn parse_constants(content: &str) -> Constants {
    let mut constants = Constants::new();
    let Some(block) = versions_block_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
    else {
        return constants;
    };

    for (key, re) in field_patterns() {
        if let Some(value) = re.captures(block.as_str()).and_then(|caps| caps.get(1)) {
            constants.insert(*key, value.as_str());
        }
    }

    constants
}

/// Load the constants file for a version.
///
/// A missing or unreadable file yields empty constants, so every placeholder
/// falls back to its default.
pub fn load_constants(path: &Path) -> Constants {
    if !path.exists() {
        return Constants::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => parse_constants(&content),
        Err(e) => {
            tracing::warn!("Failed to read constants {:?}: {}", path, e);
            Constants::new()
        }
    }
}

/// Process-wide cache of constants keyed by version name
#[derive(Debug, Default)]
pub struct ConstantsCache {
    entries: Mutex<HashMap<String, Arc<Constants>>>,
}

impl ConstantsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, version: &str) -> Option<Arc<Constants>> {
        self.entries.lock().get(version).cloned()
    }

    /// Return the cached constants for `version`, loading them on first use.
    ///
    /// The lock is held across the load so concurrent callers for the same
    /// version never read the file twice.
    pub fn get_or_load(&self, version: &str, path: &Path) -> Arc<Constants> {
        let mut entries = self.entries.lock();
        if let Some(constants) = entries.get(version) {
            return Arc::clone(constants);
        }
        let constants = Arc::new(load_constants(path));
        entries.insert(version.to_string(), Arc::clone(&constants));
        constants
    }

    /// Replace the entry for `version` with freshly loaded constants
    pub fn reload(&self, version: &str, path: &Path) -> Arc<Constants> {
        let constants = Arc::new(load_constants(path));
        self.entries
            .lock()
            .insert(version.to_string(), Arc::clone(&constants));
        constants
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
