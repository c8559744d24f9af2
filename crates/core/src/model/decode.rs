use thiserror::Error;

use crate::model::module::Module;

#[derive(Debug, Error)]
#[error("failed to decode module feed: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decode a JSON array of modules.
///
/// Both the bundled and the remote feed go through this function, so they
/// must share one schema.
///
/// # Errors
///
/// Returns `DecodeError` when the bytes are not a JSON array of modules.
pub fn decode_modules(bytes: &[u8]) -> Result<Vec<Module>, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LessonId, ModuleId};

    const FEED: &str = r#"[
        {
            "id": 1,
            "category": "Rust",
            "content": {
                "id": 1,
                "image": "rust",
                "time": "2 Hours",
                "description": "Ownership from first principles.",
                "lessons": [
                    { "id": 0, "title": "Moves", "video": "", "duration": "10 min",
                      "explanation": "<p>Values have one owner.</p>" },
                    { "id": 1, "title": "Borrows", "video": "", "duration": "12 min",
                      "explanation": "**Shared** or *unique*." }
                ]
            },
            "test": {
                "id": 1,
                "image": "rust",
                "time": "5 min",
                "description": "Check yourself.",
                "questions": [
                    { "id": 0, "content": "<p>Who frees a Box?</p>",
                      "correctIndex": 1, "answers": ["GC", "Its owner"] }
                ]
            }
        }
    ]"#;

    #[test]
    fn decodes_full_feed() {
        let modules = decode_modules(FEED.as_bytes()).unwrap();
        assert_eq!(modules.len(), 1);
        let module = &modules[0];
        assert_eq!(module.id, ModuleId::new(1));
        assert_eq!(module.category, "Rust");
        assert_eq!(module.lesson_count(), 2);
        assert_eq!(module.lessons()[1].id, LessonId::new(1));
        assert_eq!(module.question_count(), 1);
        assert_eq!(module.questions()[0].correct_index, 1);
    }

    #[test]
    fn descriptive_fields_are_optional() {
        let json = r#"[{"id":9,"content":{"lessons":[{"id":0,"explanation":"x"}]},"test":{"questions":[]}}]"#;
        let modules = decode_modules(json.as_bytes()).unwrap();
        assert_eq!(modules[0].category, "");
        assert_eq!(modules[0].lessons()[0].title, "");
        assert_eq!(modules[0].question_count(), 0);
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = decode_modules(br#"{"id":1}"#).unwrap_err();
        assert!(err.to_string().starts_with("failed to decode module feed"));
    }

    #[test]
    fn rejects_missing_explanation() {
        let json = r#"[{"id":1,"content":{"lessons":[{"id":0}]},"test":{}}]"#;
        assert!(decode_modules(json.as_bytes()).is_err());
    }
}
