mod session;
mod snapshot;

// Public API of the navigation subsystem.
pub use crate::error::NavigationError;
pub use session::NavigationSession;
pub use snapshot::{LessonState, NavigationSnapshot, TestState, TestSummary};
