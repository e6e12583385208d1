// src/engine/mod.rs

//! Reference engine for the graph protocol.
//!
//! The graph expects a template engine to call it at two points:
//! - while compiling a template: declare the template and each edge
//!   ([`compile`]).
//! - while rendering it: report which template each traversed edge
//!   resolved to ([`render`]).
//!
//! This module does both for templates described by a
//! [`Manifest`](crate::config::Manifest).

pub mod compile;
pub mod render;

pub use compile::{compile_template, CompiledEdge, CompiledTemplate};
pub use render::{Engine, RenderVars, MAX_RENDER_DEPTH};
