use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use learn_core::model::Markup;
use learn_core::render::{RenderError, StyledText, TextRenderer};

//
// ─── MARKUP HELPERS ────────────────────────────────────────────────────────────
//

#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "u", "code", "pre", "blockquote",
        "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "table", "thead", "tbody", "tr", "th",
        "td", "img",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());
    attributes.insert("img", ["src", "alt"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[must_use]
pub fn looks_like_markdown(input: &str) -> bool {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.contains("```") || trimmed.contains("**") || trimmed.contains("__") {
        return true;
    }

    if trimmed.contains("](") {
        return true;
    }

    trimmed.lines().map(str::trim_start).any(|line| {
        line.starts_with("# ")
            || line.starts_with("## ")
            || line.starts_with("- ")
            || line.starts_with("* ")
            || line.starts_with("> ")
    })
}

/// Reduce HTML to readable text, keeping block boundaries as newlines.
#[must_use]
pub fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    let mut tag_buf = String::new();

    for ch in input.chars() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
                let tag = tag_buf.trim().trim_start_matches('/').to_ascii_lowercase();
                let name = tag.split_whitespace().next().unwrap_or_default();
                if matches!(
                    name,
                    "br" | "p" | "div" | "li" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4"
                        | "tr"
                ) {
                    out.push('\n');
                }
                tag_buf.clear();
            } else {
                tag_buf.push(ch);
            }
            continue;
        }

        if ch == '<' {
            in_tag = true;
            tag_buf.clear();
            continue;
        }

        out.push(ch);
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    collapse_blank_lines(&decoded)
}

fn collapse_blank_lines(input: &str) -> String {
    let mut lines = Vec::new();
    let mut blank_streak = 0usize;

    for line in input.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            blank_streak += 1;
            if blank_streak > 1 {
                continue;
            }
        } else {
            blank_streak = 0;
        }
        lines.push(trimmed);
    }

    lines.join("\n").trim().to_string()
}

//
// ─── RENDERER ──────────────────────────────────────────────────────────────────
//

/// Renders lesson and question markup as sanitized HTML behind a style header.
///
/// Markdown bodies are converted first, inline HTML included; plain HTML
/// bodies are sanitized as-is. The header is trusted bundle content and is
/// prepended verbatim unless it carries NUL bytes, in which case it is left
/// out.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl TextRenderer for HtmlRenderer {
    fn render(&self, header: Option<&str>, body: &str) -> Result<StyledText, RenderError> {
        if body.contains('\0') {
            return Err(RenderError::ControlCharacters);
        }
        // A corrupt header is dropped; the body still renders.
        let header = header.filter(|h| !h.contains('\0'));

        let body_html = if looks_like_markdown(body) {
            markdown_to_html(body)
        } else {
            sanitize_html(body)
        };
        let plain = strip_html_tags(&body_html);
        if plain.is_empty() && body_html.trim().is_empty() {
            return Err(RenderError::Empty);
        }

        let mut html = String::with_capacity(header.map_or(0, str::len) + body_html.len());
        if let Some(header) = header {
            html.push_str(header);
        }
        html.push_str(&body_html);
        Ok(StyledText::new(html, plain))
    }
}

//
// ─── STYLER ────────────────────────────────────────────────────────────────────
//

/// Applies the bundled style header to markup, never failing.
#[derive(Clone)]
pub struct Styler {
    header: Option<Arc<str>>,
    renderer: Arc<dyn TextRenderer>,
}

impl Styler {
    #[must_use]
    pub fn new(header: Option<String>) -> Self {
        Self::with_renderer(header, Arc::new(HtmlRenderer))
    }

    #[must_use]
    pub fn with_renderer(header: Option<String>, renderer: Arc<dyn TextRenderer>) -> Self {
        Self {
            header: header.map(Arc::from),
            renderer,
        }
    }

    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Render `body`; a render failure yields `StyledText::empty()`.
    #[must_use]
    pub fn style(&self, body: &Markup) -> StyledText {
        match self.renderer.render(self.header(), body.as_str()) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(error = %err, "falling back to empty styled text");
                StyledText::empty()
            }
        }
    }
}

impl Default for Styler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for Styler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Styler")
            .field("has_header", &self.header.is_some())
            .finish_non_exhaustive()
    }
}
