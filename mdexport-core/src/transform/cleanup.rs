//! Final cleanup: leftover JSX markup and whitespace.

use super::fixed_point;
use regex::Regex;
use std::sync::OnceLock;

static DIV_OPEN: OnceLock<Regex> = OnceLock::new();
static CLASS_ATTR: OnceLock<Regex> = OnceLock::new();
static WIDTH_ATTR: OnceLock<Regex> = OnceLock::new();
static STYLE_ATTR: OnceLock<Regex> = OnceLock::new();
static STRING_EXPR: OnceLock<Regex> = OnceLock::new();
static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
static TRAILING_WS: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

/// Remove container tags, styling attributes and string-only expressions
pub fn strip_residual_markup(content: &str) -> String {
    let result = fixed_point(content.to_string(), |current| {
        let without_open = cached(&DIV_OPEN, r#"<div\s+className="[^"]*">\s*"#).replace_all(current, "");
        without_open.replace("</div>", "")
    });

    let result = cached(&CLASS_ATTR, r#"\s+className="[^"]*""#).replace_all(&result, "");
    let result = cached(&WIDTH_ATTR, r#"\s+width="[^"]*""#).replace_all(&result, "");
    let result = cached(&STYLE_ATTR, r"\s+style=\{\{[^}]*\}\}").replace_all(&result, "");
    cached(&STRING_EXPR, r#"\{['"][^'"]*['"]\}"#)
        .replace_all(&result, "")
        .into_owned()
}

/// Collapse long blank runs, strip trailing whitespace, end with one newline.
///
/// Runs of four or more newlines become three, i.e. at most two blank lines
/// survive between blocks.
pub fn normalize_whitespace(content: &str) -> String {
    let result = cached(&BLANK_RUN, r"\n{4,}").replace_all(content, "\n\n\n");
    let result = cached(&TRAILING_WS, r"(?m)[ \t]+$").replace_all(&result, "");
    let mut result = result.trim().to_string();
    result.push('\n');
    result
}
