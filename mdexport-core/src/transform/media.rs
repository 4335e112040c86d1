//! Image and link components to Markdown syntax.

use super::placeholders::substitute_placeholders;
use crate::constants::Constants;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static IMG_SRC_ALT: OnceLock<Regex> = OnceLock::new();
static IMG_ALT_SRC: OnceLock<Regex> = OnceLock::new();
static IMG_SRC_ONLY: OnceLock<Regex> = OnceLock::new();
static LINK_TEMPLATE: OnceLock<Regex> = OnceLock::new();
static LINK_STATIC: OnceLock<Regex> = OnceLock::new();

const REQUIRE_SRC: &str = r#"src=\{require\(['"]([^'"]+)['"]\)\.default\}"#;

fn img_src_alt() -> &'static Regex {
    IMG_SRC_ALT.get_or_init(|| {
        Regex::new(&format!(r#"<img\s+[^>]*?{}[^>]*?\balt="([^"]*)"[^>]*>"#, REQUIRE_SRC)).unwrap()
    })
}

fn img_alt_src() -> &'static Regex {
    IMG_ALT_SRC.get_or_init(|| {
        Regex::new(&format!(r#"<img\s+[^>]*?\balt="([^"]*)"[^>]*?{}[^>]*>"#, REQUIRE_SRC)).unwrap()
    })
}

fn img_src_only() -> &'static Regex {
    IMG_SRC_ONLY
        .get_or_init(|| Regex::new(&format!(r#"<img\s+[^>]*?{}[^>]*>"#, REQUIRE_SRC)).unwrap())
}

fn link_template() -> &'static Regex {
    LINK_TEMPLATE
        .get_or_init(|| Regex::new(r"<Link\s+to=\{`([^`]+)`\}>([^<]+)</Link>").unwrap())
}

fn link_static() -> &'static Regex {
    LINK_STATIC.get_or_init(|| Regex::new(r#"<Link\s+to="([^"]+)">([^<]+)</Link>"#).unwrap())
}

/// Convert `<img src={require('...').default} .../>` into `![alt](path)`.
///
/// Attribute order does not matter and a missing `alt` yields `![](path)`.
pub fn convert_images(content: &str) -> String {
    let result = img_src_alt().replace_all(content, |caps: &Captures<'_>| {
        format!("![{}]({})", &caps[2], &caps[1])
    });
    let result = img_alt_src().replace_all(&result, |caps: &Captures<'_>| {
        format!("![{}]({})", &caps[1], &caps[2])
    });
    img_src_only()
        .replace_all(&result, |caps: &Captures<'_>| format!("![]({})", &caps[1]))
        .into_owned()
}

/// Convert `<Link to=...>` components into `[text](url)`.
///
/// Template-literal targets have their placeholders resolved first.
pub fn convert_links(content: &str, constants: &Constants) -> String {
    let result = link_template().replace_all(content, |caps: &Captures<'_>| {
        let url = substitute_placeholders(&caps[1], constants);
        format!("[{}]({})", &caps[2], url)
    });
    link_static()
        .replace_all(&result, |caps: &Captures<'_>| {
            format!("[{}]({})", &caps[2], &caps[1])
        })
        .into_owned()
}
