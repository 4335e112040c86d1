//! Removal of ES module import declarations.

use regex::Regex;
use std::sync::OnceLock;

static IMPORT_REGEX: OnceLock<Regex> = OnceLock::new();

fn import_regex() -> &'static Regex {
    IMPORT_REGEX.get_or_init(|| {
        Regex::new(r#"(?m)^import\s+[\s\S]*?from\s+['"][^'"]+['"];?\s*$"#).unwrap()
    })
}

/// Remove every `import ... from '...'` declaration, including multi-line ones
pub fn strip_imports(content: &str) -> String {
    import_regex().replace_all(content, "").into_owned()
}
