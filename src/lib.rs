// src/lib.rs

//! Template dependency tracking.
//!
//! A [`DependencyGraph`] records, for templates compiled by a template
//! engine, which other templates each one extends, includes or imports,
//! and which templates those edges actually resolved to at render time.
//! Watch sessions isolate the resolutions of one render pass from the
//! history accumulated before it.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod types;

use tracing::{info, warn};

use crate::analysis::StaticView;
use crate::cli::{CliArgs, Command};
use crate::config::load_and_validate;
use crate::engine::{Engine, RenderVars};
use crate::errors::Result;

pub use crate::errors::TplwatchError;
pub use crate::graph::{
    Declaration, Dependency, DependencyGraph, DependencyId, ImportBinding, SharedDependencyGraph,
    Target, Template, TemplateRef,
};
pub use crate::types::{DependencyKind, RenderMode};

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    let manifest = load_and_validate(&args.config)?;
    let mut engine = Engine::new(manifest);

    match args.command {
        Command::List => {
            engine.compile_all()?;
            print!("{}", format_listing(engine.graph()));
        }
        Command::Affected { name } => {
            engine.compile_all()?;
            let view = StaticView::from_graph(engine.graph());
            let affected = view.affected_by(&name);
            info!(template = %name, count = affected.len(), "computed invalidation set");
            for tpl in affected {
                println!("{tpl}");
            }
        }
        Command::Render { name, vars, mode } => {
            if let Some(mode) = mode {
                engine.set_render_mode(mode);
            }
            if !engine.graph().tracks_renders(engine.render_mode()) {
                warn!(
                    "render_mode is \"concurrent\" and watch_concurrent_renders is off; \
                     no resolutions will be recorded"
                );
            }
            let vars: RenderVars = vars.into_iter().collect();
            engine.compile(&name)?;
            engine.graph_mut().start_watch();
            engine.render(&name, &vars)?;
            print!("{}", format_watch_report(engine.graph()));
        }
    }

    Ok(())
}

/// Templates and their declared edges, one block per template.
pub fn format_listing(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("templates ({}):\n", graph.len()));

    for tpl in graph.templates() {
        out.push_str(&format!("  - {}\n", tpl.name()));
        if let Some(file) = tpl.file() {
            out.push_str(&format!("      file: {}\n", file.display()));
        }
        for (id, dependency) in tpl.dependencies().iter().enumerate() {
            out.push_str(&format!("      #{id} {}\n", dependency.declaration()));
        }
    }

    out
}

/// Templates (and files) used since the last watch session started.
pub fn format_watch_report(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    let used = graph.templates_used_in_current_watch();
    out.push_str(&format!("used in current watch ({}):\n", used.len()));

    for tpl in used {
        let line = match tpl.file() {
            Some(file) => format!("  - {} ({})\n", tpl.name(), file.display()),
            None => format!("  - {}\n", tpl.name()),
        };
        out.push_str(&line);
    }

    out
}
