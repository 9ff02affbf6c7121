//! Body rendering
//!
//! The retrieval pipeline renders each item's body in the "full" view mode
//! through a [`Renderer`]. [`BodyRenderer`] is the built-in implementation:
//! restricted HTML is cleaned of executable markup, plain text is escaped and
//! split into paragraphs.

use ejemplo_core::{BodyFormat, ContentItem, RenderError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Renders the display body of a content item.
pub trait Renderer: Send + Sync {
    fn render(&self, item: &ContentItem) -> Result<String, RenderError>;
}

/// Script and style elements, removed together with their content.
static SCRIPT_ELEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Invalid script regex")
});
static STYLE_ELEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("Invalid style regex")
});

/// Leftover tags of elements that may embed or execute content.
static EMBED_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:iframe|object|embed|script|style)\b[^>]*>").expect("Invalid embed regex")
});

/// Start tags, the only place attributes are stripped from.
static START_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<[a-z][a-z0-9]*\b[^>]*>").expect("Invalid tag regex"));

/// Inline event handler attributes (`onclick=...`).
static EVENT_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("Invalid attribute regex")
});

/// `href`/`src` attributes pointing at a `javascript:` URL.
static JS_URL_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\s+(?:href|src)\s*=\s*(?:"\s*javascript\s*:[^"]*"|'\s*javascript\s*:[^']*'|javascript\s*:[^\s>]*)"#,
    )
    .expect("Invalid scheme regex")
});

/// Built-in body renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyRenderer;

impl BodyRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_html(&self, body: &str) -> String {
        let html = [&*SCRIPT_ELEMENTS, &*STYLE_ELEMENTS, &*EMBED_TAGS]
            .iter()
            .fold(body.to_string(), |html, re| re.replace_all(&html, "").into_owned());

        START_TAG
            .replace_all(&html, |caps: &Captures<'_>| {
                let tag = EVENT_ATTRS.replace_all(&caps[0], "");
                JS_URL_ATTRS.replace_all(&tag, "").into_owned()
            })
            .into_owned()
    }

    fn render_plain(&self, body: &str) -> String {
        let normalized = body.replace("\r\n", "\n");
        normalized
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| {
                let lines: Vec<String> = paragraph.lines().map(escape_html).collect();
                format!("<p>{}</p>", lines.join("<br>\n"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Renderer for BodyRenderer {
    fn render(&self, item: &ContentItem) -> Result<String, RenderError> {
        match item.body_format {
            BodyFormat::BasicHtml => Ok(self.render_html(&item.body)),
            BodyFormat::PlainText => Ok(self.render_plain(&item.body)),
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use ejemplo_core::NodeId;

    fn item(body: &str, format: BodyFormat) -> ContentItem {
        ContentItem::new(NodeId::new(1).expect("non-zero id"), "Title", body).with_format(format)
    }

    #[test]
    fn test_basic_html_passes_safe_markup() {
        let rendered = BodyRenderer
            .render(&item("<p>Hello <strong>world</strong></p>", BodyFormat::BasicHtml))
            .unwrap();
        assert_eq!(rendered, "<p>Hello <strong>world</strong></p>");
    }

    #[test]
    fn test_basic_html_removes_scripts_and_handlers() {
        let body = r#"<p onclick="steal()">Hi</p><script>alert(1)</script><a href="javascript:x()">l</a><iframe src="x"></iframe>"#;
        let rendered = BodyRenderer.render(&item(body, BodyFormat::BasicHtml)).unwrap();

        assert!(!rendered.contains("script"));
        assert!(!rendered.contains("onclick"));
        assert!(!rendered.contains("javascript"));
        assert!(!rendered.contains("iframe"));
        assert!(rendered.contains("<p>Hi</p>"));
    }

    #[test]
    fn test_basic_html_keeps_prose_that_looks_like_attributes() {
        let body = "<p>Cook onions = 3 cups. Learn javascript: the basics.</p>";
        let rendered = BodyRenderer.render(&item(body, BodyFormat::BasicHtml)).unwrap();
        assert_eq!(rendered, body);
    }

    #[test]
    fn test_basic_html_strips_only_unsafe_attributes() {
        let body = r#"<a href="https://example.com" onmouseover='x()'>ok</a> <img src=javascript:x() alt="i">"#;
        let rendered = BodyRenderer.render(&item(body, BodyFormat::BasicHtml)).unwrap();
        assert_eq!(rendered, r#"<a href="https://example.com">ok</a> <img alt="i">"#);
    }

    #[test]
    fn test_plain_text_is_escaped_into_paragraphs() {
        let rendered = BodyRenderer
            .render(&item("a < b\nline two\n\nsecond & last", BodyFormat::PlainText))
            .unwrap();
        assert_eq!(
            rendered,
            "<p>a &lt; b<br>\nline two</p>\n<p>second &amp; last</p>"
        );
    }

    #[test]
    fn test_plain_text_empty_body() {
        let rendered = BodyRenderer.render(&item("  \n\n ", BodyFormat::PlainText)).unwrap();
        assert_eq!(rendered, "");
    }
}
