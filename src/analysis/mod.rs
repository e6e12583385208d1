// src/analysis/mod.rs

//! Static view of a dependency graph, for invalidation queries.
//!
//! Only static targets become edges here. A template reached through a
//! dynamic target is invisible, as it is to the reverse queries of
//! [`TemplateRef`](crate::graph::TemplateRef).

use std::collections::{BTreeSet, HashSet};

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

use crate::graph::DependencyGraph;
use crate::types::DependencyKind;

/// Directed graph of declared static edges.
///
/// Edge direction: owner -> target. For `page` extending `base`, there is
/// an edge `page -> base`. Edges of different kinds between the same pair
/// share one graph edge whose weight holds every kind.
#[derive(Debug, Clone)]
pub struct StaticView<'g> {
    graph: DiGraphMap<&'g str, BTreeSet<DependencyKind>>,
}

impl<'g> StaticView<'g> {
    pub fn from_graph(deps: &'g DependencyGraph) -> Self {
        let mut graph: DiGraphMap<&'g str, BTreeSet<DependencyKind>> = DiGraphMap::new();

        for tpl in deps.templates() {
            let owner = tpl.template();
            graph.add_node(owner.name());

            for dependency in owner.dependencies() {
                for target in dependency.targets() {
                    let Some(name) = target.name() else {
                        continue;
                    };
                    match graph.edge_weight_mut(owner.name(), name) {
                        Some(kinds) => {
                            kinds.insert(dependency.kind());
                        }
                        None => {
                            graph.add_edge(owner.name(), name, BTreeSet::from([dependency.kind()]));
                        }
                    }
                }
            }
        }

        Self { graph }
    }

    /// Templates with a static edge pointing at `name`, sorted.
    pub fn dependents_of(&self, name: &str) -> Vec<&'g str> {
        let Some(node) = self.node(name) else {
            return Vec::new();
        };
        let mut found: Vec<&'g str> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .collect();
        found.sort_unstable();
        found
    }

    /// Static targets of `name`, one entry per kind of edge leading to each,
    /// sorted.
    pub fn dependencies_of(&self, name: &str) -> Vec<(&'g str, DependencyKind)> {
        let Some(node) = self.node(name) else {
            return Vec::new();
        };
        let mut found: Vec<(&'g str, DependencyKind)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .flat_map(|(_, target, kinds)| kinds.iter().map(move |kind| (target, *kind)))
            .collect();
        found.sort_unstable();
        found
    }

    /// Every template that transitively extends, includes or imports `name`.
    ///
    /// This is the set of templates whose cached output goes stale when
    /// `name` changes. `name` itself is not part of the result, even when it
    /// sits on a cycle.
    pub fn affected_by(&self, name: &str) -> Vec<&'g str> {
        let mut stack: Vec<&'g str> = self.dependents_of(name);
        let mut visited: HashSet<&'g str> = HashSet::new();
        let mut affected: BTreeSet<&'g str> = BTreeSet::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if current != name {
                affected.insert(current);
            }
            stack.extend(self.graph.neighbors_directed(current, Direction::Incoming));
        }

        affected.into_iter().collect()
    }

    /// The graph's own key for `name`, if it is a node.
    fn node(&self, name: &str) -> Option<&'g str> {
        self.graph.nodes().find(|n| *n == name)
    }
}
