// src/graph/template.rs

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use crate::errors::{Result, TplwatchError};
use crate::graph::dependency::{Declaration, Dependency, DependencyId};
use crate::graph::registry::DependencyGraph;
use crate::types::DependencyKind;

/// A node of the dependency graph: one template known to the engine.
///
/// This is not a compiled template; it only records what the template
/// depends on and what those dependencies resolved to.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    file: Option<PathBuf>,
    dependencies: Vec<Dependency>,
    was_reloaded: bool,
}

impl Template {
    pub(crate) fn new(name: String, file: Option<PathBuf>) -> Self {
        Self {
            name,
            file,
            dependencies: Vec::new(),
            was_reloaded: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source file, or `None` for templates not loaded from a file.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Declared edges, in declaration order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn dependency(&self, id: DependencyId) -> Option<&Dependency> {
        self.dependencies.get(id.index())
    }

    /// True once the template has been declared (compiled) more than once.
    pub fn was_reloaded(&self) -> bool {
        self.was_reloaded
    }

    pub(crate) fn mark_reloaded(&mut self) {
        self.was_reloaded = true;
    }

    /// Insert an edge unless a structurally equal one is already present.
    ///
    /// Returns the id of the stored edge either way.
    pub(crate) fn add_dependency(&mut self, declaration: Declaration) -> DependencyId {
        if let Some(pos) = self.dependencies.iter().position(|d| *d == declaration) {
            trace!(template = %self.name, id = pos, "dependency already declared; reusing");
            return DependencyId(pos);
        }

        if declaration.kind() == DependencyKind::Extends && self.parent().is_some() {
            warn!(
                template = %self.name,
                "second extends dependency declared; parent() becomes ambiguous"
            );
        }

        self.dependencies.push(Dependency::new(declaration));
        DependencyId(self.dependencies.len() - 1)
    }

    pub(crate) fn resolve_dependency(&mut self, id: DependencyId, name: &str) -> Result<()> {
        let template = &self.name;
        let dependency = self.dependencies.get_mut(id.index()).ok_or_else(|| {
            TplwatchError::UnknownEdge {
                template: template.clone(),
                id,
            }
        })?;

        trace!(template = %template, %id, resolved = %name, "dependency resolved");
        dependency.resolve(name);
        Ok(())
    }

    pub(crate) fn reset_watch(&mut self) {
        for dependency in &mut self.dependencies {
            dependency.reset_watch();
        }
    }

    fn of_kind(&self, kind: DependencyKind) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(move |d| d.kind() == kind)
    }

    /// All `include` edges.
    pub fn includes(&self) -> Vec<&Dependency> {
        self.of_kind(DependencyKind::Include).collect()
    }

    /// All `import` edges.
    pub fn imports(&self) -> Vec<&Dependency> {
        self.of_kind(DependencyKind::Import).collect()
    }

    /// The `extends` edge, if the template declares exactly one.
    ///
    /// The engine rejects templates extending twice; should two edges still
    /// be stored, there is no well-defined parent and this returns `None`.
    pub fn parent(&self) -> Option<&Dependency> {
        let mut extends = self.of_kind(DependencyKind::Extends);
        match (extends.next(), extends.next()) {
            (Some(parent), None) => Some(parent),
            _ => None,
        }
    }
}

/// A [`Template`] borrowed together with the graph that owns it.
///
/// The reverse queries (who includes / imports / extends me) need to scan
/// sibling nodes, so they live here rather than on `Template`.
#[derive(Clone, Copy)]
pub struct TemplateRef<'g> {
    graph: &'g DependencyGraph,
    template: &'g Template,
}

impl<'g> TemplateRef<'g> {
    pub(crate) fn new(graph: &'g DependencyGraph, template: &'g Template) -> Self {
        Self { graph, template }
    }

    pub fn template(&self) -> &'g Template {
        self.template
    }

    /// Templates with an `include` edge listing this template as a static target.
    ///
    /// Dynamic targets carry no name, so templates that reach this one only
    /// through a dynamic include never show up here.
    pub fn templates_that_include_me(&self) -> Vec<TemplateRef<'g>> {
        let name = self.template.name();
        self.scan(|t| t.includes().iter().any(|d| d.declaration().targets_name(name)))
    }

    /// Templates with an `import` edge whose single target is this template.
    pub fn templates_that_import_me(&self) -> Vec<TemplateRef<'g>> {
        let name = self.template.name();
        self.scan(|t| {
            t.imports()
                .iter()
                .any(|d| d.target().is_some_and(|target| target.is_named(name)))
        })
    }

    /// Templates whose parent is this template.
    pub fn templates_extending_me(&self) -> Vec<TemplateRef<'g>> {
        let name = self.template.name();
        self.scan(|t| {
            t.parent()
                .and_then(|p| p.target())
                .is_some_and(|target| target.is_named(name))
        })
    }

    fn scan(&self, matches: impl Fn(&Template) -> bool) -> Vec<TemplateRef<'g>> {
        self.graph
            .templates()
            .into_iter()
            .filter(|candidate| matches(candidate.template))
            .collect()
    }
}

impl Deref for TemplateRef<'_> {
    type Target = Template;

    fn deref(&self) -> &Self::Target {
        self.template
    }
}

/// Names are unique within a graph.
impl PartialEq for TemplateRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.template.name() == other.template.name()
    }
}

impl Eq for TemplateRef<'_> {}

impl fmt::Debug for TemplateRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRef")
            .field("name", &self.template.name())
            .field("file", &self.template.file())
            .field("dependencies", &self.template.dependencies().len())
            .finish()
    }
}
