//! Highlighted content sections, replaced by their inner content.

use super::blocks::unwrap_containers;
use super::fixed_point;
use regex::Regex;
use std::sync::OnceLock;

static SECTION_REGEX: OnceLock<Regex> = OnceLock::new();
static SECTION_BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();

fn section_regex() -> &'static Regex {
    SECTION_REGEX
        .get_or_init(|| Regex::new(r#"<div\s+className="content-section-highlight">"#).unwrap())
}

fn section_boundary_regex() -> &'static Regex {
    SECTION_BOUNDARY_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"^\s*(?:<div\s+className="(?:step-card|content-section)""#,
            r#"|$|\n\n[^<]|You have now)"#,
        ))
        .unwrap()
    })
}

/// Unwrap `content-section-highlight` containers until none are left.
///
/// Sections nest, and a single scan only unwraps the outermost level, so the
/// scan repeats to a fixed point.
pub fn unwrap_highlight_sections(content: &str) -> String {
    fixed_point(content.to_string(), |current| {
        unwrap_containers(current, section_regex(), section_boundary_regex(), |_, body| {
            format!("{}\n\n", body.trim())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_section() {
        let content = "<div className=\"content-section-highlight\">\nImportant text.\n</div>\n\nNext paragraph.";
        assert_eq!(
            unwrap_highlight_sections(content),
            "Important text.\n\n\n\nNext paragraph."
        );
    }

    #[test]
    fn test_three_levels_collapse() {
        let content = r#"<div className="content-section-highlight">
<div className="content-section-highlight">
<div className="content-section-highlight">
Innermost text
</div>
</div>
</div>"#;
        let out = unwrap_highlight_sections(content);
        assert_eq!(out.trim(), "Innermost text");
        assert!(!out.contains("<div"));
        assert!(!out.contains("</div>"));
    }

    #[test]
    fn test_section_before_step_card() {
        let content = "<div className=\"content-section-highlight\">\nIntro\n</div>\n<div className=\"step-card\">";
        assert_eq!(
            unwrap_highlight_sections(content),
            "Intro\n\n\n<div className=\"step-card\">"
        );
    }

    #[test]
    fn test_section_before_closing_sentence() {
        let content = "<div className=\"content-section-highlight\">\nAll set.\n</div>\nYou have now deployed the app.";
        assert_eq!(
            unwrap_highlight_sections(content),
            "All set.\n\n\nYou have now deployed the app."
        );
    }
}
