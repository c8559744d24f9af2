use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::markup::Markup;

/// One test item: a marked-up prompt, its answer choices and the index of the
/// correct choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub content: Markup,
    pub correct_index: usize,
    pub answers: Vec<String>,
}

impl Question {
    pub fn new(
        id: QuestionId,
        content: impl Into<Markup>,
        answers: Vec<String>,
        correct_index: usize,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            correct_index,
            answers,
        }
    }

    /// Returns true when `choice` is the correct answer.
    ///
    /// The feed does not guarantee `correct_index` is in range; an out-of-range
    /// index simply never matches a real choice.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_correct_index() {
        let json = r#"{"id":1,"content":"<p>2 + 2?</p>","correctIndex":2,"answers":["1","3","4"]}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.correct_index, 2);
        assert_eq!(question.answer_count(), 3);
        assert!(question.is_correct(2));
        assert!(!question.is_correct(0));
    }
}
