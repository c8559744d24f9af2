//! Rendering contract for marked-up lesson and question text.
//!
//! The navigation layer only needs `render(header, body)`; the concrete
//! renderer lives in the services crate.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RenderError {
    #[error("markup rendered to an empty document")]
    Empty,

    #[error("markup contains control characters")]
    ControlCharacters,
}

/// Marked-up text rendered into a displayable form.
///
/// `html` is the full document (style header followed by the rendered body);
/// `plain` is a text-only rendition for surfaces that cannot show HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    html: String,
    plain: String,
}

impl StyledText {
    pub fn new(html: impl Into<String>, plain: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            plain: plain.into(),
        }
    }

    /// The degraded result used when rendering fails.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn plain(&self) -> &str {
        &self.plain
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.plain.is_empty()
    }
}

/// Turns a style header plus a marked-up body into `StyledText`.
pub trait TextRenderer: Send + Sync {
    /// Render `body`, prefixed by `header` when one is available.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` when the markup cannot be turned into a document.
    fn render(&self, header: Option<&str>, body: &str) -> Result<StyledText, RenderError>;
}
