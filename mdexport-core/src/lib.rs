//! # mdexport-core
//!
//! Core library for exporting versioned MDX documentation as plain Markdown.
//!
//! This crate resolves documentation versions, discovers source documents,
//! loads per-version placeholder constants, strips component markup from
//! each page and writes the result to a mirrored output tree.

pub mod config;
pub mod constants;
pub mod export;
pub mod transform;
pub mod versions;
pub mod walker;
pub mod watch;

pub use config::Config;
pub use constants::{ConstantKey, Constants, ConstantsCache};
pub use export::{output_path, ExportError, ExportReport, MarkdownExporter};
pub use transform::{transform_document, TransformContext};
pub use versions::{VersionDescriptor, VersionKind, VersionSet};
pub use walker::{find_documents, DocumentRecord};
pub use watch::{Debouncer, WatcherRegistry};
