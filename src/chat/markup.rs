//! Message text to HTML: escaping plus the `[label](url)` link shorthand.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern compiles"));

const ALLOWED_SCHEMES: [&str; 5] = ["http://", "https://", "mailto:", "tel:", "/"];

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "&quot;")
}

fn is_allowed_target(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with('#') || ALLOWED_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Renders chat text as HTML. Escaping happens before link substitution, so
/// user-typed tags never survive; links to unknown schemes stay plain text.
pub fn render(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = RE_LINK.replace_all(&escaped, |caps: &Captures| {
        let label = escape_quotes(&caps[1]);
        let url = escape_quotes(&caps[2]);
        if !is_allowed_target(&url) {
            return caps[0].to_string();
        }
        if url.starts_with('#') {
            format!(r#"<a href="{url}" class="bb-link">{label}</a>"#)
        } else {
            format!(r#"<a href="{url}" target="_blank" rel="noopener noreferrer" class="bb-link">{label}</a>"#)
        }
    });
    linked.replace('\n', "<br/>")
}

/// Link labels in order of appearance; handy for asserting on replies.
pub fn link_labels(text: &str) -> Vec<&str> {
    RE_LINK
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}
