//! MDX to plain Markdown transformation.
//!
//! A document goes through an ordered list of regex-driven passes. Later
//! passes assume the artifacts handled by earlier ones are already gone, so
//! the order in [`transform_document`] matters. Every pass is best-effort:
//! markup a pass cannot recognise is left for the residual cleanup, never
//! reported as an error.

pub mod blocks;
pub mod cards;
pub mod cleanup;
pub mod code_blocks;
pub mod frontmatter;
pub mod imports;
pub mod media;
pub mod placeholders;
pub mod sections;

use crate::constants::Constants;
use std::path::Path;

pub use frontmatter::{split_frontmatter, Frontmatter};
pub use placeholders::substitute_placeholders;

/// Upper bound on iterations of any fixed-point pass
pub const MAX_FIXED_POINT_PASSES: usize = 64;

/// Inputs shared by every pass of one document
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub constants: &'a Constants,
    /// Directory holding the source document
    pub source_dir: &'a Path,
}

impl<'a> TransformContext<'a> {
    pub fn new(constants: &'a Constants, source_dir: &'a Path) -> Self {
        Self {
            constants,
            source_dir,
        }
    }
}

/// Convert raw MDX into clean Markdown.
///
/// # Example
///
/// ```
/// use mdexport_core::constants::{ConstantKey, Constants};
/// use mdexport_core::transform::{transform_document, TransformContext};
/// use std::path::Path;
///
/// let constants = Constants::new().with(ConstantKey::ImageTag, "1.2.3");
/// let ctx = TransformContext::new(&constants, Path::new("docs"));
///
/// let out = transform_document("Pull tag {versions.dockerTag}.", &ctx);
/// assert_eq!(out, "Pull tag 1.2.3.\n");
/// ```
pub fn transform_document(raw: &str, ctx: &TransformContext<'_>) -> String {
    tracing::trace!(source_dir = ?ctx.source_dir, "transforming document");

    let content = raw.replace("\r\n", "\n");
    let content = imports::strip_imports(&content);

    let (frontmatter, body) = split_frontmatter(&content);

    let result = code_blocks::convert_code_blocks(body, ctx.constants);
    let result = cards::unwrap_step_cards(&result);
    let result = cards::unwrap_prerequisite_cards(&result);
    let result = sections::unwrap_highlight_sections(&result);
    let result = substitute_placeholders(&result, ctx.constants);
    let result = media::convert_images(&result);
    let result = media::convert_links(&result, ctx.constants);
    let result = cleanup::strip_residual_markup(&result);
    let result = cleanup::normalize_whitespace(&result);

    frontmatter.prepend_to(result)
}

/// Apply `pass` until its output stops changing.
///
/// Bounded by [`MAX_FIXED_POINT_PASSES`]; malformed input that keeps changing
/// returns whatever the last iteration produced.
pub fn fixed_point<F>(input: String, mut pass: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut current = input;
    for _ in 0..MAX_FIXED_POINT_PASSES {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    tracing::debug!(
        "Fixed point not reached after {} passes",
        MAX_FIXED_POINT_PASSES
    );
    current
}
