//! `<CodeBlock language="...">` components to fenced code blocks.

use super::placeholders::substitute_placeholders;
use crate::constants::Constants;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static CODE_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
static RAW_STRING_REGEX: OnceLock<Regex> = OnceLock::new();
static TEMPLATE_LITERAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_block_regex() -> &'static Regex {
    CODE_BLOCK_REGEX.get_or_init(|| {
        Regex::new(r#"<CodeBlock\s+language="([^"]+)">\s*([\s\S]*?)\s*</CodeBlock>"#).unwrap()
    })
}

fn raw_string_regex() -> &'static Regex {
    RAW_STRING_REGEX.get_or_init(|| Regex::new(r"\{String\.raw`([\s\S]*?)`\}").unwrap())
}

fn template_literal_regex() -> &'static Regex {
    TEMPLATE_LITERAL_REGEX.get_or_init(|| Regex::new(r"\{`([\s\S]*?)`\}").unwrap())
}

/// Rewrite every `CodeBlock` component as a fenced block with its language tag
pub fn convert_code_blocks(content: &str, constants: &Constants) -> String {
    code_block_regex()
        .replace_all(content, |caps: &Captures<'_>| {
            let language = &caps[1];
            let code = unwrap_literals(&caps[2]);
            let code = substitute_placeholders(&code, constants);
            format!("```{}\n{}\n```", language, code.trim())
        })
        .into_owned()
}

/// Strip `{String.raw`...`}` and `{`...`}` wrappers around code
fn unwrap_literals(code: &str) -> String {
    let code = raw_string_regex().replace_all(code, "$1");
    template_literal_regex().replace_all(&code, "$1").into_owned()
}
