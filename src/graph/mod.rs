// src/graph/mod.rs

//! Template dependency graph.
//!
//! - [`target`] holds the endpoint of an edge (static or dynamic).
//! - [`dependency`] holds edge declarations and their resolution history.
//! - [`template`] holds graph nodes and the reverse navigation queries.
//! - [`registry`] holds the graph itself and the watch-session controller.
//! - [`shared`] wraps the graph for multi-threaded engines.

pub mod dependency;
pub mod registry;
pub mod shared;
pub mod target;
pub mod template;

pub use dependency::{Declaration, Dependency, DependencyId, ImportBinding, Resolution};
pub use registry::DependencyGraph;
pub use shared::SharedDependencyGraph;
pub use target::Target;
pub use template::{Template, TemplateRef};
