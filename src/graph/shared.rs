// src/graph/shared.rs

//! Thread-safe handle around a [`DependencyGraph`].
//!
//! The graph itself is a plain single-owner structure. Engines that render
//! on several threads (or several tasks of a multi-threaded runtime) share
//! it through this handle so that each declaration, resolution and query
//! happens atomically.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::Result;
use crate::graph::dependency::{Declaration, DependencyId};
use crate::graph::registry::DependencyGraph;
use crate::types::RenderMode;

#[derive(Debug, Clone, Default)]
pub struct SharedDependencyGraph {
    inner: Arc<Mutex<DependencyGraph>>,
}

impl SharedDependencyGraph {
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            inner: Arc::new(Mutex::new(graph)),
        }
    }

    /// Lock the graph for a batch of reads or writes.
    ///
    /// A panic in another holder does not leave the graph half-written (every
    /// mutation is a single append or flag flip), so a poisoned lock is
    /// recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, DependencyGraph> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn declare_template(&self, name: &str, file: Option<&std::path::Path>) {
        self.lock().declare_template(name, file);
    }

    pub fn declare_dependency(&self, owner: &str, declaration: Declaration) -> Result<DependencyId> {
        self.lock().declare_dependency(owner, declaration)
    }

    /// Resolution entry point for renders of the given mode.
    ///
    /// Skips the call entirely when the graph does not track that mode.
    pub fn resolve_dependency(
        &self,
        mode: RenderMode,
        owner: &str,
        id: DependencyId,
        resolved: &str,
    ) -> Result<()> {
        let mut graph = self.lock();
        if !graph.tracks_renders(mode) {
            return Ok(());
        }
        graph.resolve_dependency(owner, id, resolved)
    }

    pub fn start_watch(&self) {
        self.lock().start_watch();
    }

    /// Names of the templates used in the current watch session.
    pub fn used_in_current_watch(&self) -> Vec<String> {
        self.lock()
            .templates_used_in_current_watch()
            .into_iter()
            .map(|t| t.name().to_string())
            .collect()
    }
}
