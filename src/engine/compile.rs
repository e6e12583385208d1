// src/engine/compile.rs

//! Turning manifest entries into graph declarations.

use crate::config::model::{TargetRef, TemplateConfig};
use crate::errors::{Result, TplwatchError};
use crate::graph::{Declaration, DependencyGraph, DependencyId, ImportBinding};
use crate::types::DependencyKind;

/// One edge of a compiled template, as the render walk needs it.
#[derive(Debug, Clone)]
pub struct CompiledEdge {
    pub id: DependencyId,
    pub kind: DependencyKind,
    /// Targets as written in the manifest, so variables can be evaluated.
    pub targets: Vec<TargetRef>,
    pub ignore_missing: bool,
}

/// The result of compiling one template: its edges, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CompiledTemplate {
    pub edges: Vec<CompiledEdge>,
}

/// Declare `name` and all of its edges on `graph`.
///
/// Recompiling declares everything again; the graph marks the template as
/// reloaded and hands back the ids of the edges it already had.
pub fn compile_template(
    graph: &mut DependencyGraph,
    name: &str,
    tpl: &TemplateConfig,
) -> Result<CompiledTemplate> {
    graph.declare_template(name, tpl.file.as_deref());

    let mut edges = Vec::new();

    if let Some(parent) = &tpl.extends {
        let target = parse_target(name, parent)?;
        let id = graph.declare_dependency(name, Declaration::extends(target.to_target()))?;
        edges.push(CompiledEdge {
            id,
            kind: DependencyKind::Extends,
            targets: vec![target],
            ignore_missing: false,
        });
    }

    for include in tpl.include.iter() {
        let targets = include
            .targets
            .iter()
            .map(|raw| parse_target(name, raw))
            .collect::<Result<Vec<_>>>()?;

        let declaration = Declaration::include(targets.iter().map(TargetRef::to_target))?
            .with_context(include.with_context)
            .ignore_missing(include.ignore_missing);
        let id = graph.declare_dependency(name, declaration)?;

        edges.push(CompiledEdge {
            id,
            kind: DependencyKind::Include,
            targets,
            ignore_missing: include.ignore_missing,
        });
    }

    for import in tpl.import.iter() {
        let target = parse_target(name, &import.target)?;
        let binding = match (&import.alias, &import.names) {
            (Some(alias), None) => ImportBinding::Module(alias.clone()),
            (None, Some(names)) => ImportBinding::Names(names.clone()),
            _ => {
                return Err(TplwatchError::ConfigError(format!(
                    "template '{name}' imports '{}' with an ambiguous binding",
                    import.target
                )));
            }
        };

        let declaration =
            Declaration::import(target.to_target(), binding).with_context(import.with_context);
        let id = graph.declare_dependency(name, declaration)?;

        edges.push(CompiledEdge {
            id,
            kind: DependencyKind::Import,
            targets: vec![target],
            ignore_missing: false,
        });
    }

    Ok(CompiledTemplate { edges })
}

fn parse_target(owner: &str, raw: &str) -> Result<TargetRef> {
    TargetRef::parse(raw).ok_or_else(|| {
        TplwatchError::ConfigError(format!("template '{owner}' has an empty target"))
    })
}
