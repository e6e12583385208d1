// src/engine/render.rs

//! Render walk: evaluates edges and reports resolutions to the graph.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::model::{Manifest, TargetRef};
use crate::engine::compile::{compile_template, CompiledEdge, CompiledTemplate};
use crate::errors::{Result, TplwatchError};
use crate::graph::{DependencyGraph, DependencyId};
use crate::types::{DependencyKind, RenderMode};

/// Maximum nesting of extends / include / import during one render.
pub const MAX_RENDER_DEPTH: usize = 64;

/// Variables available to a render, used to evaluate dynamic targets.
pub type RenderVars = HashMap<String, String>;

/// A minimal template engine driving a [`DependencyGraph`].
///
/// It plays the part of the real engine: compiling a template declares it
/// and its edges, rendering walks the edges and reports what each one
/// resolved to. Nothing is actually rendered to text.
#[derive(Debug)]
pub struct Engine {
    manifest: Manifest,
    graph: DependencyGraph,
    mode: RenderMode,
    compiled: HashMap<String, CompiledTemplate>,
}

impl Engine {
    pub fn new(manifest: Manifest) -> Self {
        let mut graph = DependencyGraph::new();
        graph.set_watch_concurrent_renders(manifest.config.watch_concurrent_renders);
        let mode = manifest.config.render_mode;

        Self {
            manifest,
            graph,
            mode,
            compiled: HashMap::new(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Compile a template unless it is already in the cache.
    pub fn compile(&mut self, name: &str) -> Result<()> {
        if self.compiled.contains_key(name) {
            return Ok(());
        }
        self.reload(name)
    }

    /// Compile a template again, even if it is cached.
    pub fn reload(&mut self, name: &str) -> Result<()> {
        let tpl = self
            .manifest
            .get(name)
            .ok_or_else(|| TplwatchError::TemplateNotFound(name.to_string()))?;

        debug!(template = %name, "compiling template");
        let compiled = compile_template(&mut self.graph, name, tpl)?;
        self.compiled.insert(name.to_string(), compiled);
        Ok(())
    }

    /// Compile every template of the manifest.
    pub fn compile_all(&mut self) -> Result<()> {
        let names: Vec<String> = self.manifest.names().map(str::to_string).collect();
        for name in names {
            self.compile(&name)?;
        }
        Ok(())
    }

    /// Render `name`, compiling it and everything it reaches on the way.
    pub fn render(&mut self, name: &str, vars: &RenderVars) -> Result<()> {
        debug!(template = %name, mode = ?self.mode, "rendering template");
        self.render_at(name, vars, 0)
    }

    fn render_at(&mut self, name: &str, vars: &RenderVars, depth: usize) -> Result<()> {
        if depth >= MAX_RENDER_DEPTH {
            return Err(TplwatchError::RecursionLimit(name.to_string()));
        }

        self.compile(name)?;
        let edges = self
            .compiled
            .get(name)
            .map(|c| c.edges.clone())
            .unwrap_or_default();

        for edge in edges.iter() {
            let Some(target) = self.select_target(edge, vars)? else {
                trace!(template = %name, id = %edge.id, "optional include missing; skipped");
                continue;
            };

            self.compile(&target)?;
            self.record(name, edge.id, &target)?;
            self.render_at(&target, vars, depth + 1)?;
        }

        Ok(())
    }

    /// Pick the template an edge leads to in this render.
    ///
    /// Candidates are evaluated in order and the first one that exists wins;
    /// later candidates are never evaluated. An optional include with no
    /// existing candidate yields `None`.
    fn select_target(&self, edge: &CompiledEdge, vars: &RenderVars) -> Result<Option<String>> {
        let mut tried = Vec::with_capacity(edge.targets.len());
        for target in edge.targets.iter() {
            let candidate = evaluate(target, vars)?;
            if self.manifest.contains(&candidate) {
                return Ok(Some(candidate));
            }
            tried.push(candidate);
        }

        if edge.kind == DependencyKind::Include && edge.ignore_missing {
            Ok(None)
        } else {
            Err(TplwatchError::TemplateNotFound(tried.join(", ")))
        }
    }

    fn record(&mut self, owner: &str, id: DependencyId, resolved: &str) -> Result<()> {
        if !self.graph.tracks_renders(self.mode) {
            trace!(template = %owner, %id, "render mode not tracked; resolution dropped");
            return Ok(());
        }
        self.graph.resolve_dependency(owner, id, resolved)
    }
}

fn evaluate(target: &TargetRef, vars: &RenderVars) -> Result<String> {
    match target {
        TargetRef::Static(name) => Ok(name.clone()),
        TargetRef::Variable(var) => vars
            .get(var)
            .cloned()
            .ok_or_else(|| TplwatchError::UnboundVariable(var.clone())),
    }
}
