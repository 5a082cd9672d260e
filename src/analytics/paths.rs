use std::collections::VecDeque;

use super::Adjacency;
use crate::model::{Edge, Node};

/// Breadth-first shortest relationship path, edges treated as undirected.
///
/// Returns the node ids from `from` to `to` inclusive, `[from]` when both are the
/// same node, and an empty path when either endpoint is unknown or unreachable.
pub fn shortest_path(nodes: &[Node], edges: &[Edge], from: &str, to: &str) -> Vec<String> {
    let adjacency = Adjacency::build(nodes, edges);
    let (Some(start), Some(target)) = (adjacency.index(from), adjacency.index(to)) else {
        return Vec::new();
    };

    if start == target {
        return vec![nodes[start].id.clone()];
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = vec![false; nodes.len()];
    let mut parent = vec![usize::MAX; nodes.len()];
    visited[start] = true;

    while let Some(node) = queue.pop_front() {
        if node == target {
            break;
        }

        for &next in &adjacency.neighbors[node] {
            if !visited[next] {
                visited[next] = true;
                parent[next] = node;
                queue.push_back(next);
            }
        }
    }

    if !visited[target] {
        return Vec::new();
    }

    let mut path = vec![nodes[target].id.clone()];
    let mut cursor = target;
    while cursor != start {
        let prev = parent[cursor];
        if prev == usize::MAX {
            return Vec::new();
        }

        path.push(nodes[prev].id.clone());
        cursor = prev;
    }

    path.reverse();
    path
}

/// For each consecutive pair on `path`, the first edge (in input order) joining
/// the pair in either direction.
pub fn path_edges<'a>(edges: &'a [Edge], path: &[String]) -> Vec<&'a Edge> {
    path.windows(2)
        .filter_map(|pair| {
            let [a, b] = pair else {
                return None;
            };
            edges.iter().find(|edge| {
                (edge.from == *a && edge.to == *b) || (edge.from == *b && edge.to == *a)
            })
        })
        .collect()
}
