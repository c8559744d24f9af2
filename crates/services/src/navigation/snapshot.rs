use chrono::{DateTime, Utc};

/// Position of the lesson flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LessonState {
    #[default]
    NoLesson,
    InLesson { index: usize },
}

/// Position of the test flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestState {
    #[default]
    NoTest,
    InTest {
        module_index: usize,
        question_index: usize,
    },
}

/// Everything a view needs to redraw after a navigation change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub module_index: Option<usize>,
    pub lesson: LessonState,
    pub test: TestState,
    pub test_score: u32,
    pub has_styled_text: bool,
    pub lesson_link_selected: Option<usize>,
    pub test_link_selected: Option<usize>,
}

/// Score of the current module's test, useful for a results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub score: u32,
    pub total: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TestSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Score as a whole percentage of the question count.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        self.score.saturating_mul(100) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down_and_handles_empty_tests() {
        let summary = TestSummary {
            score: 2,
            total: 3,
            started_at: None,
            completed_at: None,
        };
        assert_eq!(summary.percent(), 66);
        assert!(!summary.is_complete());

        let empty = TestSummary { total: 0, ..summary };
        assert_eq!(empty.percent(), 0);
    }
}
