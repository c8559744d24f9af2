use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use learn_core::model::Module;
use tokio::sync::watch;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Which loader a batch of modules came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    Remote,
}

/// Progress of a single loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Pending,
    Loaded { modules: usize },
    Failed { reason: String },
    Disabled,
}

impl SourceStatus {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, SourceStatus::Pending)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceStatus::Failed { .. })
    }
}

/// Observable state of the store, published on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStatus {
    pub modules: usize,
    pub local: SourceStatus,
    pub remote: SourceStatus,
}

impl ContentStatus {
    fn initial() -> Self {
        Self {
            modules: 0,
            local: SourceStatus::Pending,
            remote: SourceStatus::Pending,
        }
    }

    /// True once no loader is still running.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.local.is_pending() && !self.remote.is_pending()
    }

    /// True when at least one loader failed and its content is missing.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.local.is_failed() || self.remote.is_failed()
    }

    fn source_mut(&mut self, kind: SourceKind) -> &mut SourceStatus {
        match kind {
            SourceKind::Local => &mut self.local,
            SourceKind::Remote => &mut self.remote,
        }
    }
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Append-only, arrival-ordered collection of modules shared by the loaders
/// and the navigation layer.
///
/// One mutex guards the whole sequence, so an append from the remote loader is
/// serialized with every reader. Modules are never sorted or de-duplicated.
#[derive(Clone)]
pub struct ContentStore {
    modules: Arc<Mutex<Vec<Arc<Module>>>>,
    status: Arc<watch::Sender<ContentStatus>>,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    #[must_use]
    pub fn new() -> Self {
        let (status, _) = watch::channel(ContentStatus::initial());
        Self {
            modules: Arc::new(Mutex::new(Vec::new())),
            status: Arc::new(status),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Arc<Module>>> {
        self.modules.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Concatenate `modules` after the existing ones and return the new length.
    pub fn append(&self, modules: Vec<Module>) -> usize {
        let mut guard = self.guard();
        guard.extend(modules.into_iter().map(Arc::new));
        let total = guard.len();
        self.status.send_modify(|status| status.modules = total);
        total
    }

    /// Record the outcome of a loader.
    pub fn mark_source(&self, kind: SourceKind, state: SourceStatus) {
        self.status
            .send_modify(|status| *status.source_mut(kind) = state);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// The module at `index`, if the store currently holds that many.
    #[must_use]
    pub fn module(&self, index: usize) -> Option<Arc<Module>> {
        self.guard().get(index).cloned()
    }

    /// Snapshot of the current sequence. Later appends are not reflected.
    #[must_use]
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.guard().clone()
    }

    #[must_use]
    pub fn status(&self) -> ContentStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to store changes (appends and loader status updates).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContentStatus> {
        self.status.subscribe()
    }

    /// The module at `index`, waiting while a loader is still pending.
    ///
    /// Resolves immediately when the module is already present. Returns `None`
    /// once every loader has settled without reaching `index`.
    pub async fn wait_for_module(&self, index: usize) -> Option<Arc<Module>> {
        let mut updates = self.subscribe();
        loop {
            let settled = updates.borrow_and_update().is_settled();
            if let Some(module) = self.module(index) {
                return Some(module);
            }
            if settled || updates.changed().await.is_err() {
                return self.module(index);
            }
        }
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("modules_len", &self.len())
            .field("status", &self.status())
            .finish()
    }
}
