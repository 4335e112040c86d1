//! Scanner for `<div>` containers closed by a boundary heuristic.
//!
//! Layout containers in the source nest arbitrarily, so their end cannot be
//! found with a single regex and there is no tag balancing either. A
//! container body ends at the first `</div>` whose following text satisfies a
//! boundary pattern, e.g. "another container starts" or "end of input".

use regex::{Captures, Regex};

pub const CLOSE_TAG: &str = "</div>";

/// Replace every container opened by `opener` with `render(captures, body)`.
///
/// `boundary` is matched against the text right after each candidate
/// `</div>` and should be anchored with `^`. An opener with no acceptable
/// closing tag is left untouched and scanning resumes after its first byte.
pub fn unwrap_containers<F>(content: &str, opener: &Regex, boundary: &Regex, mut render: F) -> String
where
    F: FnMut(&Captures<'_>, &str) -> String,
{
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;
    let mut search_from = 0;

    while search_from <= content.len() {
        let Some(caps) = opener.captures_at(content, search_from) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let body_start = whole.end();

        match find_close(&content[body_start..], boundary) {
            Some(close) => {
                let body = &content[body_start..body_start + close];
                out.push_str(&content[copied..whole.start()]);
                out.push_str(&render(&caps, body));
                copied = body_start + close + CLOSE_TAG.len();
                search_from = copied;
            }
            None => search_from = next_char_boundary(content, whole.start()),
        }
    }

    out.push_str(&content[copied..]);
    out
}

/// Offset of the first `</div>` in `rest` followed by a boundary
fn find_close(rest: &str, boundary: &Regex) -> Option<usize> {
    rest.match_indices(CLOSE_TAG)
        .map(|(idx, _)| idx)
        .find(|&idx| boundary.is_match(&rest[idx + CLOSE_TAG.len()..]))
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    s[idx..]
        .chars()
        .next()
        .map(|c| idx + c.len_utf8())
        .unwrap_or(s.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opener() -> Regex {
        Regex::new(r#"<div className="box">"#).unwrap()
    }

    fn end_of_input() -> Regex {
        Regex::new(r"^\s*$").unwrap()
    }

    #[test]
    fn test_body_runs_to_accepted_close() {
        let content = "<div className=\"box\">a</div>b</div>\n";
        let out = unwrap_containers(content, &opener(), &end_of_input(), |_, body| {
            format!("[{}]", body)
        });
        assert_eq!(out, "[a</div>b]\n");
    }

    #[test]
    fn test_unclosed_opener_is_left_alone() {
        let content = "before <div className=\"box\">never closed</div> after";
        let out = unwrap_containers(content, &opener(), &end_of_input(), |_, body| {
            body.to_string()
        });
        assert_eq!(out, content);
    }

    #[test]
    fn test_multiple_containers() {
        let boundary = Regex::new(r#"^\s*(?:<div|$)"#).unwrap();
        let content = "<div className=\"box\">one</div>\n<div className=\"box\">two</div>";
        let out = unwrap_containers(content, &opener(), &boundary, |_, body| body.to_uppercase());
        assert_eq!(out, "ONE\nTWO");
    }

    #[test]
    fn test_non_ascii_before_failed_opener() {
        let content = "é<div className=\"box\">ü</div> trailing";
        let out = unwrap_containers(content, &opener(), &end_of_input(), |_, body| {
            body.to_string()
        });
        assert_eq!(out, content);
    }
}
