// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The three ways a template can depend on another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `{% extends parent %}`: at most one per template.
    Extends,
    /// `{% include fragment %}`, possibly with a fallback list.
    Include,
    /// `{% import module as m %}` / `{% from module import a, b %}`.
    Import,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Extends => "extends",
            DependencyKind::Include => "include",
            DependencyKind::Import => "import",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the embedding engine runs renders against a shared graph.
///
/// - `Sync`: one render at a time; watch sessions are always tracked.
/// - `Concurrent`: renders may interleave (e.g. async renders sharing one
///   environment). Their resolutions cannot be told apart inside a watch
///   session, so tracking is opt-in via
///   [`DependencyGraph::set_watch_concurrent_renders`](crate::graph::DependencyGraph::set_watch_concurrent_renders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Sync,
    Concurrent,
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Sync
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync" => Ok(RenderMode::Sync),
            "concurrent" | "async" => Ok(RenderMode::Concurrent),
            other => Err(format!(
                "invalid render_mode: {other} (expected \"sync\" or \"concurrent\")"
            )),
        }
    }
}
