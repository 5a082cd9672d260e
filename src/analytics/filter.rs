use std::collections::{HashSet, VecDeque};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use super::Adjacency;
use crate::model::{Edge, EntityType, Node};

/// A filtered node set plus only the edges whose endpoints both survived.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}

pub fn induced_subgraph(
    nodes: &[Node],
    edges: &[Edge],
    mut keep: impl FnMut(&Node) -> bool,
) -> Subgraph {
    let nodes = nodes
        .iter()
        .filter(|node| keep(node))
        .cloned()
        .collect::<Vec<_>>();
    let kept = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    let edges = edges
        .iter()
        .filter(|edge| kept.contains(edge.from.as_str()) && kept.contains(edge.to.as_str()))
        .cloned()
        .collect();

    Subgraph { nodes, edges }
}

pub fn filter_by_type(nodes: &[Node], edges: &[Edge], types: &[EntityType]) -> Subgraph {
    induced_subgraph(nodes, edges, |node| types.contains(&node.label))
}

/// Nodes within `depth` hops of `center` (edges undirected). An unknown center
/// yields an empty subgraph.
pub fn neighborhood(nodes: &[Node], edges: &[Edge], center: &str, depth: usize) -> Subgraph {
    let adjacency = Adjacency::build(nodes, edges);
    let Some(start) = adjacency.index(center) else {
        return Subgraph::default();
    };

    let mut within = vec![false; nodes.len()];
    let mut queue = VecDeque::from([(start, 0usize)]);
    within[start] = true;

    while let Some((node, hops)) = queue.pop_front() {
        if hops >= depth {
            continue;
        }

        for &next in &adjacency.neighbors[node] {
            if !within[next] {
                within[next] = true;
                queue.push_back((next, hops + 1));
            }
        }
    }

    let mut index = 0usize;
    induced_subgraph(nodes, edges, |_| {
        let keep = within[index];
        index += 1;
        keep
    })
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Fuzzy match over display name and id. A blank query keeps every node.
pub fn search(nodes: &[Node], edges: &[Edge], query: &str) -> Subgraph {
    let query = query.trim();
    if query.is_empty() {
        return induced_subgraph(nodes, edges, |_| true);
    }

    let matcher = SkimMatcherV2::default();
    induced_subgraph(nodes, edges, |node| {
        fuzzy_match_score(&matcher, &node.name, query).is_some()
            || fuzzy_match_score(&matcher, &node.id, query).is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("p1", "Jane Roe", EntityType::Person),
            Node::new("p2", "John Doe", EntityType::Person),
            Node::new("o1", "Acme Holdings", EntityType::Organization),
            Node::new("c1", "Roe v. Acme", EntityType::Case),
            Node::new("ct", "District Court", EntityType::Court),
        ];
        let edges = vec![
            Edge::new("p1", "o1", "EMPLOYED_BY"),
            Edge::new("p1", "c1", "PARTY_TO"),
            Edge::new("o1", "c1", "PARTY_TO"),
            Edge::new("c1", "ct", "HEARD_IN"),
            Edge::new("p2", "ghost", "KNOWS"),
        ];
        (nodes, edges)
    }

    fn assert_no_dangling(subgraph: &Subgraph) {
        for edge in &subgraph.edges {
            assert!(subgraph.contains(&edge.from), "dangling from {}", edge.from);
            assert!(subgraph.contains(&edge.to), "dangling to {}", edge.to);
        }
    }

    #[test]
    fn type_filter_returns_the_induced_subgraph() {
        let (nodes, edges) = fixture();
        let subgraph = filter_by_type(&nodes, &edges, &[EntityType::Person, EntityType::Case]);

        let ids = subgraph.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["p1", "p2", "c1"]);
        assert_eq!(subgraph.edges.len(), 1);
        assert_no_dangling(&subgraph);
    }

    #[test]
    fn neighborhood_respects_depth() {
        let (nodes, edges) = fixture();

        let one_hop = neighborhood(&nodes, &edges, "ct", 1);
        let ids = one_hop.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["c1", "ct"]);

        let two_hops = neighborhood(&nodes, &edges, "ct", 2);
        assert_eq!(two_hops.nodes.len(), 4);
        assert_eq!(two_hops.edges.len(), 4);
        assert_no_dangling(&two_hops);

        assert!(neighborhood(&nodes, &edges, "missing", 3).nodes.is_empty());
    }

    #[test]
    fn search_matches_names_fuzzily() {
        let (nodes, edges) = fixture();

        let hits = search(&nodes, &edges, "acme");
        let ids = hits.nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["o1", "c1"]);
        assert_no_dangling(&hits);

        let everything = search(&nodes, &edges, "   ");
        assert_eq!(everything.nodes.len(), 5);
        assert_eq!(everything.edges.len(), 4);
    }
}
