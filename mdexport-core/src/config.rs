//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the mdexport.yml schema.
///
/// Every field has a default, so an absent config file describes the usual
/// documentation-site layout rooted at the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    /// JSON array of released version names, most recent first
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Directory of the unreleased docs, relative to `site_dir`
    #[serde(default = "default_current_dir")]
    pub current_dir: PathBuf,

    /// Directory template for released versions; `{version}` is substituted
    #[serde(default = "default_versioned_dir")]
    pub versioned_dir: String,

    #[serde(default = "default_constants_file")]
    pub constants_file: String,

    #[serde(default = "default_static_output")]
    pub static_output: PathBuf,

    #[serde(default = "default_build_output")]
    pub build_output: PathBuf,

    /// Used when the manifest file does not exist
    #[serde(default)]
    pub fallback_versions: Vec<String>,

    #[serde(default)]
    pub watch: WatchConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_site_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("versions.json")
}

fn default_current_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_versioned_dir() -> String {
    String::from("versioned_docs/version-{version}")
}

fn default_constants_file() -> String {
    String::from("_constants.mdx")
}

fn default_static_output() -> PathBuf {
    PathBuf::from("static/md")
}

fn default_build_output() -> PathBuf {
    PathBuf::from("build/md")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_stability_ms")]
    pub stability_ms: u64,

    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_stability_ms() -> u64 {
    100
}

fn default_poll_ms() -> u64 {
    50
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn stability(&self) -> Duration {
        Duration::from_millis(self.stability_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            stability_ms: default_stability_ms(),
            poll_ms: default_poll_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            manifest: default_manifest(),
            current_dir: default_current_dir(),
            versioned_dir: default_versioned_dir(),
            constants_file: default_constants_file(),
            static_output: default_static_output(),
            build_output: default_build_output(),
            fallback_versions: Vec::new(),
            watch: WatchConfig::default(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Build a default config rooted at `site_dir`
    pub fn for_site<P: Into<PathBuf>>(site_dir: P) -> Self {
        Self {
            site_dir: site_dir.into(),
            ..Self::default()
        }
    }

    /// Get the site directory, resolved relative to config file
    pub fn site_dir(&self) -> PathBuf {
        self.resolve_path(&self.site_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.site_path(&self.manifest)
    }

    /// Source directory of the unreleased docs
    pub fn current_docs_dir(&self) -> PathBuf {
        self.site_path(&self.current_dir)
    }

    /// Source directory of a released version
    pub fn version_docs_dir(&self, version: &str) -> PathBuf {
        let rel = self.versioned_dir.replace("{version}", version);
        self.site_path(Path::new(&rel))
    }

    /// Output root served by the development server
    pub fn static_output_dir(&self) -> PathBuf {
        self.site_path(&self.static_output)
    }

    /// Output root of the production build
    pub fn build_output_dir(&self) -> PathBuf {
        self.site_path(&self.build_output)
    }

    /// Resolve a path relative to the site directory
    fn site_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.site_dir().join(path)
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
