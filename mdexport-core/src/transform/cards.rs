//! Step and prerequisite cards to Markdown headings.

use super::blocks::unwrap_containers;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static STEP_CARD_REGEX: OnceLock<Regex> = OnceLock::new();
static PREREQ_CARD_REGEX: OnceLock<Regex> = OnceLock::new();
static CARD_BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();

fn step_card_regex() -> &'static Regex {
    STEP_CARD_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"<div\s+className="step-card">\s*"#,
            r#"<div\s+className="step-header">\s*"#,
            r#"<div\s+className="step-header-icon">(\d+)</div>\s*"#,
            r#"<div\s+className="step-header-text">\s*([\s\S]*?)\s*</div>\s*"#,
            r#"</div>"#,
        ))
        .unwrap()
    })
}

fn prereq_card_regex() -> &'static Regex {
    PREREQ_CARD_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"<div\s+className="step-card">\s*"#,
            r#"<div\s+className="prereq-header-text">([^<]*)</div>"#,
        ))
        .unwrap()
    })
}

/// A card ends before another container, at end of input, or before a
/// paragraph of plain text.
fn card_boundary_regex() -> &'static Regex {
    CARD_BOUNDARY_REGEX
        .get_or_init(|| Regex::new(r#"^\s*(?:<div\s+className="|$|\n\n[^<])"#).unwrap())
}

/// Rewrite numbered step cards as `## N. Title` sections
pub fn unwrap_step_cards(content: &str) -> String {
    unwrap_containers(
        content,
        step_card_regex(),
        card_boundary_regex(),
        |caps: &Captures<'_>, body| {
            format!("## {}. {}\n\n{}\n\n", &caps[1], caps[2].trim(), body.trim())
        },
    )
}

/// Rewrite prerequisite cards as `## Header` sections
pub fn unwrap_prerequisite_cards(content: &str) -> String {
    unwrap_containers(
        content,
        prereq_card_regex(),
        card_boundary_regex(),
        |caps: &Captures<'_>, body| {
            format!("## {}\n\n{}\n\n", clean_header(&caps[1]), body.trim())
        },
    )
}

/// Keep only word characters and whitespace (drops emoji and punctuation)
fn clean_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_card() {
        let content = r#"<div className="step-card">
  <div className="step-header">
    <div className="step-header-icon">1</div>
    <div className="step-header-text">Install</div>
  </div>
  Run the installer.
</div>"#;
        assert_eq!(unwrap_step_cards(content), "## 1. Install\n\nRun the installer.\n\n");
    }

    #[test]
    fn test_consecutive_step_cards() {
        let content = r#"<div className="step-card">
<div className="step-header"><div className="step-header-icon">1</div><div className="step-header-text">First</div></div>
Do one.
</div>
<div className="step-card">
<div className="step-header"><div className="step-header-icon">2</div><div className="step-header-text">Second</div></div>
Do two.
</div>

Done."#;
        assert_eq!(
            unwrap_step_cards(content),
            "## 1. First\n\nDo one.\n\n\n## 2. Second\n\nDo two.\n\n\n\nDone."
        );
    }

    #[test]
    fn test_step_card_with_nested_container_in_body() {
        let content = r#"<div className="step-card">
<div className="step-header"><div className="step-header-icon">3</div><div className="step-header-text">Verify</div></div>
<div className="note">
Check the pods.
</div>
</div>
"#;
        assert_eq!(
            unwrap_step_cards(content),
            "## 3. Verify\n\n<div className=\"note\">\nCheck the pods.\n</div>\n\n\n"
        );
    }

    #[test]
    fn test_prerequisite_card() {
        let content = "<div className=\"step-card\">\n<div className=\"prereq-header-text\">📋 Prerequisites:</div>\n- A cluster\n- kubectl\n</div>";
        assert_eq!(
            unwrap_prerequisite_cards(content),
            "## Prerequisites\n\n- A cluster\n- kubectl\n\n"
        );
    }

    #[test]
    fn test_unterminated_card_is_left_alone() {
        let content = "<div className=\"step-card\">\n<div className=\"prereq-header-text\">Needs</div>\nno close tag";
        assert_eq!(unwrap_prerequisite_cards(content), content);
    }

    #[test]
    fn test_clean_header() {
        assert_eq!(clean_header(" ✅ Before you begin! "), "Before you begin");
        assert_eq!(clean_header("k8s_v1.30+"), "k8s_v130");
    }
}
