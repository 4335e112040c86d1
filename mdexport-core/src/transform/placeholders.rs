//! Substitution of `{versions.<key>}` and `${versions.<key>}` placeholders.

use crate::constants::{ConstantKey, Constants};
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\$?\{versions\.([A-Za-z][A-Za-z0-9_-]*)\}").unwrap())
}

/// Replace every recognised placeholder with its constant or default.
///
/// Both the JSX form and the template-literal form are consumed whole, so
/// no stray `$` is left behind. Unknown keys are kept verbatim.
pub fn substitute_placeholders(content: &str, constants: &Constants) -> String {
    placeholder_regex()
        .replace_all(content, |caps: &Captures<'_>| {
            match ConstantKey::from_token(&caps[1]) {
                Some(key) => constants.resolve(key).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
