use serde::{Deserialize, Serialize};

/// Raw marked-up text (HTML or Markdown) exactly as it arrived in the feed.
///
/// Styling happens later through a `TextRenderer`; this type never rewrites
/// its contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Markup {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Markup {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
