//! Stateless graph analytics over a node/edge list.
//!
//! Every function here is pure: same input, same output, input order preserved
//! wherever ties occur. Malformed edges (an endpoint missing from the node list)
//! are ignored rather than reported.

use std::collections::HashMap;

use crate::model::{Edge, Node};

mod centrality;
mod conflicts;
mod filter;
mod paths;
mod risk;

pub use centrality::{degree_centrality, top_by_centrality};
pub use conflicts::{EntityInsight, conflicts_by_entity, enrich};
pub use filter::{Subgraph, filter_by_type, induced_subgraph, neighborhood, search};
pub use paths::{path_edges, shortest_path};
pub use risk::{risk_level, risk_score};

/// Undirected adjacency over node indices, neighbors in edge input order.
struct Adjacency<'a> {
    index_by_id: HashMap<&'a str, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl<'a> Adjacency<'a> {
    fn build(nodes: &'a [Node], edges: &[Edge]) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.as_str()).or_insert(index);
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        let mut dropped = 0usize;
        for edge in edges {
            let (Some(&from), Some(&to)) = (
                index_by_id.get(edge.from.as_str()),
                index_by_id.get(edge.to.as_str()),
            ) else {
                dropped += 1;
                continue;
            };

            neighbors[from].push(to);
            if from != to {
                neighbors[to].push(from);
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "ignoring malformed edges in adjacency");
        }

        Self {
            index_by_id,
            neighbors,
        }
    }

    fn index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }
}
