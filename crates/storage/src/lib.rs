#![forbid(unsafe_code)]

pub mod bundle;
pub mod source;
pub mod store;

pub use bundle::{Bundle, BundleError};
pub use source::{InMemorySource, ModuleSource, SourceError};
pub use store::{ContentStatus, ContentStore, SourceKind, SourceStatus};
