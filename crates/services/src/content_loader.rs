//! Best-effort population of the `ContentStore`.
//!
//! Every failure is logged and swallowed: the store simply ends up with fewer
//! modules, and the matching `SourceStatus` records what went wrong.

use std::sync::Arc;

use storage::{Bundle, ContentStore, ModuleSource, SourceError, SourceKind, SourceStatus};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Load the bundled feed synchronously and append it to `store`.
///
/// Returns the number of modules contributed (zero on failure).
pub fn load_local(bundle: &Bundle, store: &ContentStore) -> usize {
    match bundle.load_modules() {
        Ok(modules) => {
            let count = modules.len();
            let total = store.append(modules);
            store.mark_source(SourceKind::Local, SourceStatus::Loaded { modules: count });
            tracing::info!(count, total, path = %bundle.data_path().display(), "loaded bundled modules");
            count
        }
        Err(err) => {
            tracing::warn!(bundle = %bundle.root().display(), error = %err, "bundled modules unavailable");
            store.mark_source(
                SourceKind::Local,
                SourceStatus::Failed {
                    reason: err.to_string(),
                },
            );
            0
        }
    }
}

/// Fetch one batch from `source` and append it to `store` as a whole.
///
/// Returns the number of modules contributed (zero on failure).
pub async fn load_remote(source: &dyn ModuleSource, store: &ContentStore) -> usize {
    match source.fetch_modules().await {
        Ok(modules) => {
            let count = modules.len();
            let total = store.append(modules);
            store.mark_source(SourceKind::Remote, SourceStatus::Loaded { modules: count });
            tracing::info!(source = source.name(), count, total, "loaded remote modules");
            count
        }
        Err(SourceError::Disabled) => {
            tracing::debug!(source = source.name(), "remote modules disabled");
            store.mark_source(SourceKind::Remote, SourceStatus::Disabled);
            0
        }
        Err(err) => {
            tracing::warn!(source = source.name(), error = %err, "remote modules unavailable");
            store.mark_source(
                SourceKind::Remote,
                SourceStatus::Failed {
                    reason: err.to_string(),
                },
            );
            0
        }
    }
}

/// Run `load_remote` in the background on `handle`.
///
/// The task cannot be cancelled by the store; a result that arrives after
/// every reader is gone is still appended.
pub fn spawn_remote(
    handle: &Handle,
    source: Arc<dyn ModuleSource>,
    store: ContentStore,
) -> JoinHandle<usize> {
    handle.spawn(async move { load_remote(source.as_ref(), &store).await })
}

/// Read the bundled style header, or `None` if it is unavailable.
#[must_use]
pub fn load_style(bundle: &Bundle) -> Option<String> {
    match bundle.load_style() {
        Ok(style) => Some(style),
        Err(err) => {
            tracing::warn!(error = %err, "style header unavailable, rendering without it");
            None
        }
    }
}
