//! Frontmatter extraction and reattachment.
//!
//! Only the `title` key survives export; every other key is dropped.

use regex::Regex;
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();
static TITLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| Regex::new(r"^---\n([\s\S]*?)\n---\n").unwrap())
}

fn title_regex() -> &'static Regex {
    TITLE_REGEX.get_or_init(|| Regex::new(r"(?m)^title:[ \t]*(.+)$").unwrap())
}

/// The metadata kept from a document header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
}

impl Frontmatter {
    /// Prepend the minimal header to `body` when a title was captured
    pub fn prepend_to(&self, body: String) -> String {
        match &self.title {
            Some(title) => format!("---\ntitle: {}\n---\n\n{}", title, body),
            None => body,
        }
    }
}

/// Split a leading `---` block from the document.
///
/// Returns the captured frontmatter and the remaining body. Documents
/// without a header are returned whole with an empty [`Frontmatter`].
///
/// # Example
///
/// ```
/// use mdexport_core::transform::split_frontmatter;
///
/// let content = "---\ntitle: My Post\nsidebar_position: 3\n---\n# Hello World\n";
///
/// let (fm, body) = split_frontmatter(content);
/// assert_eq!(fm.title.as_deref(), Some("My Post"));
/// assert_eq!(body, "# Hello World\n");
/// ```
pub fn split_frontmatter(content: &str) -> (Frontmatter, &str) {
    let Some(block) = frontmatter_regex().captures(content) else {
        return (Frontmatter::default(), content);
    };
    let (Some(whole), Some(header)) = (block.get(0), block.get(1)) else {
        return (Frontmatter::default(), content);
    };

    let title = title_regex()
        .captures(header.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    (Frontmatter { title }, &content[whole.end()..])
}
