use serde::{Deserialize, Serialize};

use crate::model::ids::ModuleId;
use crate::model::lesson::Lesson;
use crate::model::question::Question;

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Top-level content unit: an ordered list of lessons plus a test.
///
/// Modules are immutable once decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    #[serde(default)]
    pub category: String,
    pub content: ModuleContent,
    pub test: ModuleTest,
}

/// Lesson half of a module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleContent {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Test half of a module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleTest {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Module {
    pub fn new(
        id: ModuleId,
        category: impl Into<String>,
        lessons: Vec<Lesson>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            content: ModuleContent {
                lessons,
                ..ModuleContent::default()
            },
            test: ModuleTest {
                questions,
                ..ModuleTest::default()
            },
        }
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.content.lessons
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.test.questions
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.content.lessons.len()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.test.questions.len()
    }
}
