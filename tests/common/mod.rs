#![allow(dead_code)]

use tplwatch::{DependencyGraph, TemplateRef};

pub use tplwatch_test_utils::init_tracing;

/// Names of a list of template views, in the order given.
pub fn names<'g>(templates: &[TemplateRef<'g>]) -> Vec<&'g str> {
    templates.iter().map(|t| t.template().name()).collect()
}

/// Names used in the current watch session, sorted (the result is a set).
pub fn used_sorted(graph: &DependencyGraph) -> Vec<String> {
    let mut used: Vec<String> = graph
        .templates_used_in_current_watch()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    used.sort();
    used
}
