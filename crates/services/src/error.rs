//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::model::DecodeError;
use storage::SourceError;

/// Errors emitted by `RemoteContentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteContentError {
    #[error("remote content is not configured")]
    Disabled,
    #[error("remote content request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<RemoteContentError> for SourceError {
    fn from(err: RemoteContentError) -> Self {
        match err {
            RemoteContentError::Disabled => SourceError::Disabled,
            RemoteContentError::Decode(err) => SourceError::Decode(err),
            other => SourceError::Backend(Box::new(other)),
        }
    }
}

/// Errors emitted by `NavigationSession`.
///
/// Every variant is a caller contract violation. The session rejects the call
/// and leaves its cursors untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("module index {index} is out of bounds (store holds {len})")]
    ModuleOutOfBounds { index: usize, len: usize },
    #[error("no module selected")]
    NoModule,
    #[error("lesson index {index} is out of bounds (module has {len})")]
    LessonOutOfBounds { index: usize, len: usize },
    #[error("no active lesson")]
    NoActiveLesson,
    #[error("module has no test questions")]
    EmptyTest,
    #[error("no active question")]
    NoActiveQuestion,
}
