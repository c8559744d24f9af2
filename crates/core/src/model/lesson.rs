use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;
use crate::model::markup::Markup;

/// A single explanatory content item within a module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub duration: String,
    pub explanation: Markup,
}

impl Lesson {
    pub fn new(id: LessonId, title: impl Into<String>, explanation: impl Into<Markup>) -> Self {
        Self {
            id,
            title: title.into(),
            video: String::new(),
            duration: String::new(),
            explanation: explanation.into(),
        }
    }
}
