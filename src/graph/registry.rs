// src/graph/registry.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{Result, TplwatchError};
use crate::graph::dependency::{Declaration, DependencyId};
use crate::graph::template::{Template, TemplateRef};
use crate::types::RenderMode;

/// Every template an engine environment has compiled, and their edges.
///
/// Templates are stored in an arena in first-declaration order and indexed
/// by name. Nothing is ever removed: templates, edges and resolutions are
/// only appended, and recompiling a template re-declares into the existing
/// node.
///
/// The graph has no notion of which render a resolution came from. A watch
/// session ([`start_watch`](Self::start_watch)) is a global window: every
/// resolution recorded after it started counts as "current". When renders
/// interleave, their resolutions end up mixed in the same window, which is
/// why tracking for [`RenderMode::Concurrent`] is off unless explicitly
/// enabled.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
    watch_concurrent_renders: bool,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, or flag an already known one as reloaded.
    ///
    /// A reload keeps everything already known about the template.
    pub fn declare_template(&mut self, name: &str, file: Option<&Path>) {
        if let Some(&idx) = self.index.get(name) {
            debug!(template = %name, "template declared again; marking reloaded");
            self.templates[idx].mark_reloaded();
            return;
        }

        debug!(template = %name, file = ?file, "template declared");
        self.index.insert(name.to_string(), self.templates.len());
        self.templates
            .push(Template::new(name.to_string(), file.map(PathBuf::from)));
    }

    /// Declare an edge of `owner`, returning the id to pass to
    /// [`resolve_dependency`](Self::resolve_dependency) at render time.
    ///
    /// Declaring a structurally equal edge again returns the existing id.
    pub fn declare_dependency(
        &mut self,
        owner: &str,
        declaration: Declaration,
    ) -> Result<DependencyId> {
        let template = self
            .template_mut(owner)
            .ok_or_else(|| TplwatchError::UnknownTemplate(owner.to_string()))?;

        debug!(template = %owner, dependency = %declaration, "dependency declared");
        Ok(template.add_dependency(declaration))
    }

    /// Record that edge `id` of `owner` resolved to `resolved` during a render.
    ///
    /// Unknown owners are ignored: the engine may render templates compiled
    /// before the graph started tracking them. An unknown edge on a known
    /// owner is an error.
    pub fn resolve_dependency(
        &mut self,
        owner: &str,
        id: DependencyId,
        resolved: &str,
    ) -> Result<()> {
        match self.template_mut(owner) {
            Some(template) => template.resolve_dependency(id, resolved),
            None => {
                trace!(template = %owner, %id, "resolution for untracked template; ignoring");
                Ok(())
            }
        }
    }

    pub fn get_template(&self, name: &str) -> Option<TemplateRef<'_>> {
        self.index
            .get(name)
            .map(|&idx| TemplateRef::new(self, &self.templates[idx]))
    }

    /// All known templates, in first-declaration order.
    pub fn templates(&self) -> Vec<TemplateRef<'_>> {
        self.templates
            .iter()
            .map(|t| TemplateRef::new(self, t))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Start a new watch session.
    ///
    /// Resolutions recorded before this call stop being "current". Must not be
    /// called while a render is in progress.
    pub fn start_watch(&mut self) {
        for template in &mut self.templates {
            template.reset_watch();
        }
        debug!(templates = self.templates.len(), "watch session started");
    }

    /// Templates reached through a resolved edge since the last
    /// [`start_watch`](Self::start_watch).
    ///
    /// Only edge targets count: the template a render started from is not
    /// included unless something in the same session also reached it. The
    /// result is a set; it is returned in graph order.
    pub fn templates_used_in_current_watch(&self) -> Vec<TemplateRef<'_>> {
        let mut used: HashSet<&str> = HashSet::new();
        for template in &self.templates {
            for dependency in template.dependencies() {
                used.extend(dependency.resolved_names_in_current_watch());
            }
        }

        for name in used.iter().filter(|name| !self.index.contains_key(**name)) {
            debug!(resolved = %name, "resolved name is not a declared template; skipping");
        }

        self.templates
            .iter()
            .filter(|t| used.contains(t.name()))
            .map(|t| TemplateRef::new(self, t))
            .collect()
    }

    /// Source files of [`templates_used_in_current_watch`](Self::templates_used_in_current_watch).
    ///
    /// Templates that were not loaded from a file are left out.
    pub fn files_used_in_current_watch(&self) -> Vec<&Path> {
        self.templates_used_in_current_watch()
            .into_iter()
            .filter_map(|t| t.template().file())
            .collect()
    }

    /// Whether renders of the given mode should report resolutions.
    ///
    /// The graph cannot tell which context a resolution call comes from; the
    /// engine is expected to check this before emitting resolution calls.
    pub fn tracks_renders(&self, mode: RenderMode) -> bool {
        match mode {
            RenderMode::Sync => true,
            RenderMode::Concurrent => self.watch_concurrent_renders,
        }
    }

    pub fn watch_concurrent_renders(&self) -> bool {
        self.watch_concurrent_renders
    }

    /// Opt into tracking concurrent renders.
    ///
    /// Resolutions of overlapping renders are then interleaved in the same
    /// watch session. Do not call `start_watch` or
    /// `templates_used_in_current_watch` while a render is in progress.
    pub fn set_watch_concurrent_renders(&mut self, enabled: bool) {
        self.watch_concurrent_renders = enabled;
    }

    fn template_mut(&mut self, name: &str) -> Option<&mut Template> {
        let idx = *self.index.get(name)?;
        self.templates.get_mut(idx)
    }
}
