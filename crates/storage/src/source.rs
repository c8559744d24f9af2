use std::time::Duration;

use async_trait::async_trait;
use learn_core::model::{DecodeError, Module};
use thiserror::Error;

/// Errors surfaced by module sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("source is disabled")]
    Disabled,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Contract for an asynchronous producer of modules (e.g. a remote feed).
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Fetch one batch of modules.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the batch cannot be produced.
    async fn fetch_modules(&self) -> Result<Vec<Module>, SourceError>;
}

/// Simple in-memory source for testing and prototyping.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    name: String,
    modules: Vec<Module>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, modules: Vec<Module>) -> Self {
        Self {
            name: name.into(),
            modules,
            failure: None,
            delay: None,
        }
    }

    /// A source whose every fetch fails with `reason`.
    pub fn failing(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
            failure: Some(reason.into()),
            delay: None,
        }
    }

    /// Delay each fetch, to simulate network latency.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ModuleSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_modules(&self) -> Result<Vec<Module>, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(reason) => Err(SourceError::Unavailable(reason.clone())),
            None => Ok(self.modules.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::ModuleId;

    #[tokio::test]
    async fn in_memory_source_returns_its_modules() {
        let module = Module::new(ModuleId::new(1), "Rust", Vec::new(), Vec::new());
        let source = InMemorySource::new("memory", vec![module.clone()]);
        let fetched = source.fetch_modules().await.unwrap();
        assert_eq!(fetched, vec![module]);
        assert_eq!(source.name(), "memory");
    }

    #[tokio::test]
    async fn failing_source_reports_reason() {
        let source = InMemorySource::failing("memory", "offline");
        let err = source.fetch_modules().await.unwrap_err();
        assert_eq!(err.to_string(), "offline");
    }
}
