//! Shared BFS utilities over an adjacency view of the edge list.
//!
//! Built once per normalization pass or query; both the variable-visibility
//! query and the start-node edge-materialization policy run on it.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::graph::Edge;

/// Directed adjacency built from the current edges.
#[derive(Debug, Default)]
pub struct Adjacency {
    outgoing: AHashMap<String, Vec<String>>,
    incoming: AHashMap<String, Vec<String>>,
}

impl Adjacency {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut adjacency = Self::default();
        for edge in edges {
            adjacency
                .outgoing
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
            adjacency
                .incoming
                .entry(edge.target.clone())
                .or_default()
                .push(edge.source.clone());
        }
        adjacency
    }

    /// Every ancestor reachable by walking incoming edges from `node_id`,
    /// excluding the node itself.
    pub fn upstream_of(&self, node_id: &str) -> AHashSet<String> {
        let mut visited: AHashSet<String> = AHashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(node_id);

        while let Some(current) = queue.pop_front() {
            if let Some(sources) = self.incoming.get(current) {
                for source in sources {
                    if visited.insert(source.clone()) {
                        queue.push_back(source);
                    }
                }
            }
        }

        visited.remove(node_id);
        visited
    }

    /// Length of the shortest directed path `from -> to` in hops, `None`
    /// when unreachable. `Some(0)` when the endpoints coincide.
    pub fn shortest_path_len(&self, from: &str, to: &str) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        visited.insert(from);
        queue.push_back((from, 0));

        while let Some((current, distance)) = queue.pop_front() {
            if let Some(targets) = self.outgoing.get(current) {
                for target in targets {
                    if target == to {
                        return Some(distance + 1);
                    }
                    if visited.insert(target) {
                        queue.push_back((target, distance + 1));
                    }
                }
            }
        }

        None
    }
}
