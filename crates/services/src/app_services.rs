use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use storage::{Bundle, ContentStore, ModuleSource, SourceKind, SourceStatus};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::Clock;
use crate::content_loader::{load_local, load_style, spawn_remote};
use crate::navigation::NavigationSession;
use crate::remote_content_service::{RemoteContentConfig, RemoteContentService};
use crate::styling::Styler;

/// Where content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentConfig {
    pub bundle_dir: PathBuf,
    pub remote: Option<RemoteContentConfig>,
}

impl ContentConfig {
    /// Read `LEARN_BUNDLE_DIR` (falling back to `default_bundle`) and the
    /// remote feed settings.
    #[must_use]
    pub fn from_env(default_bundle: impl Into<PathBuf>) -> Self {
        let bundle_dir = env::var_os("LEARN_BUNDLE_DIR")
            .map_or_else(|| default_bundle.into(), PathBuf::from);
        Self {
            bundle_dir,
            remote: RemoteContentConfig::from_env(),
        }
    }
}

/// Assembles the content store, its loaders and the styler.
pub struct AppServices {
    clock: Clock,
    store: ContentStore,
    styler: Styler,
    remote_task: Option<JoinHandle<usize>>,
}

impl AppServices {
    /// Load bundled content, then start the remote feed in the background.
    ///
    /// The local load blocks until done. The remote load needs a Tokio
    /// runtime; without one it is recorded as failed.
    #[must_use]
    pub fn bootstrap(config: &ContentConfig, clock: Clock) -> Self {
        let remote = config.remote.clone().map(|remote| {
            Arc::new(RemoteContentService::new(Some(remote))) as Arc<dyn ModuleSource>
        });
        Self::bootstrap_with_source(&Bundle::new(&config.bundle_dir), remote, clock)
    }

    /// Same as `bootstrap`, with an explicit remote source (or none).
    #[must_use]
    pub fn bootstrap_with_source(
        bundle: &Bundle,
        remote: Option<Arc<dyn ModuleSource>>,
        clock: Clock,
    ) -> Self {
        let store = ContentStore::new();
        load_local(bundle, &store);
        let styler = Styler::new(load_style(bundle));

        let remote_task = match remote {
            None => {
                store.mark_source(SourceKind::Remote, SourceStatus::Disabled);
                None
            }
            Some(source) => match Handle::try_current() {
                Ok(handle) => Some(spawn_remote(&handle, source, store.clone())),
                Err(err) => {
                    tracing::warn!(error = %err, "no async runtime, skipping remote modules");
                    store.mark_source(
                        SourceKind::Remote,
                        SourceStatus::Failed {
                            reason: err.to_string(),
                        },
                    );
                    None
                }
            },
        };

        Self {
            clock,
            store,
            styler,
            remote_task,
        }
    }

    #[must_use]
    pub fn store(&self) -> ContentStore {
        self.store.clone()
    }

    #[must_use]
    pub fn styler(&self) -> Styler {
        self.styler.clone()
    }

    /// A fresh navigation session over the shared store.
    #[must_use]
    pub fn new_session(&self) -> NavigationSession {
        NavigationSession::new(self.store.clone(), self.styler.clone(), self.clock)
    }

    /// Wait for the background remote load, if one is running.
    ///
    /// Returns the number of modules it contributed.
    pub async fn wait_for_remote(&mut self) -> usize {
        let Some(task) = self.remote_task.take() else {
            return 0;
        };
        match task.await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(error = %err, "remote module task ended abnormally");
                self.store.mark_source(
                    SourceKind::Remote,
                    SourceStatus::Failed {
                        reason: err.to_string(),
                    },
                );
                0
            }
        }
    }
}
