use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::{Edge, Node, retain_valid_edges};

/// Incident-edge count per node, keyed in node input order.
///
/// Isolated nodes are present with 0. Each valid edge adds one to both endpoints,
/// so a self-loop adds two to its node. The layout's `Simulation::degree`
/// counts springs instead and ignores self-loops.
pub fn degree_centrality(nodes: &[Node], edges: &[Edge]) -> IndexMap<String, usize> {
    let mut centrality = nodes
        .iter()
        .map(|node| (node.id.clone(), 0usize))
        .collect::<IndexMap<_, _>>();

    let ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    for edge in retain_valid_edges(edges, &ids) {
        if let Some(count) = centrality.get_mut(&edge.from) {
            *count += 1;
        }
        if let Some(count) = centrality.get_mut(&edge.to) {
            *count += 1;
        }
    }

    centrality
}

/// The `limit` most connected nodes, highest first, ties in input order.
pub fn top_by_centrality(nodes: &[Node], edges: &[Edge], limit: usize) -> Vec<(String, usize)> {
    let mut ranked = degree_centrality(nodes, edges)
        .into_iter()
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityType;

    fn fixture() -> (Vec<Node>, Vec<Edge>) {
        let nodes = ["hub", "a", "b", "lonely"]
            .into_iter()
            .map(|id| Node::new(id, id, EntityType::Organization))
            .collect();
        let edges = vec![
            Edge::new("hub", "a", "OWNS"),
            Edge::new("b", "hub", "OWNS"),
            Edge::new("a", "b", "PARTNERS_WITH"),
            Edge::new("hub", "nowhere", "OWNS"),
        ];
        (nodes, edges)
    }

    #[test]
    fn self_loop_counts_twice() {
        let (nodes, mut edges) = fixture();
        edges.push(Edge::new("lonely", "lonely", "AFFILIATED_WITH"));
        let centrality = degree_centrality(&nodes, &edges);

        assert_eq!(centrality["lonely"], 2);
    }

    #[test]
    fn counts_both_directions_and_keeps_isolated_nodes() {
        let (nodes, edges) = fixture();
        let centrality = degree_centrality(&nodes, &edges);

        assert_eq!(centrality.len(), 4);
        assert_eq!(centrality["hub"], 2);
        assert_eq!(centrality["a"], 2);
        assert_eq!(centrality["lonely"], 0);
        assert_eq!(centrality.values().sum::<usize>(), 2 * 3);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let (nodes, edges) = fixture();
        let top = top_by_centrality(&nodes, &edges, 3);

        let ids = top.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["hub", "a", "b"]);
    }
}
