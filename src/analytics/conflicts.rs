use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::centrality::degree_centrality;
use super::risk::{risk_level, risk_score};
use crate::model::{Conflict, GraphSnapshot, RiskLevel};

/// Inverse index from entity id to the conflicts that concern it, in input order.
pub fn conflicts_by_entity(conflicts: &[Conflict]) -> HashMap<&str, Vec<&Conflict>> {
    let mut index: HashMap<&str, Vec<&Conflict>> = HashMap::new();
    for conflict in conflicts {
        index
            .entry(conflict.entity_id.as_str())
            .or_default()
            .push(conflict);
    }
    index
}

/// Derived per-node attributes used to decorate the rendered graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityInsight {
    pub id: String,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub centrality: usize,
    pub conflict_count: usize,
    /// Related entity ids from this node's conflicts that exist in the snapshot,
    /// first occurrence order, without duplicates.
    pub related_entities: Vec<String>,
}

/// One insight per node, in node order. Conflicts about unknown entities and
/// related ids outside the node set are skipped.
pub fn enrich(snapshot: &GraphSnapshot) -> Vec<EntityInsight> {
    let index = conflicts_by_entity(&snapshot.conflicts);
    let centrality = degree_centrality(&snapshot.nodes, &snapshot.edges);
    let ids = snapshot.node_ids();

    let dangling = index.keys().filter(|id| !ids.contains(*id)).count();
    if dangling > 0 {
        tracing::debug!(dangling, "ignoring conflicts for entities outside the node set");
    }

    snapshot
        .nodes
        .iter()
        .map(|node| {
            let conflicts = index.get(node.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);

            let mut seen = HashSet::new();
            let related_entities = conflicts
                .iter()
                .flat_map(|conflict| conflict.related_entities.iter())
                .filter(|id| ids.contains(id.as_str()) && seen.insert(id.as_str()))
                .cloned()
                .collect();

            EntityInsight {
                id: node.id.clone(),
                risk_score: risk_score(conflicts.iter().copied()),
                risk_level: risk_level(conflicts.iter().copied()),
                centrality: centrality.get(&node.id).copied().unwrap_or(0),
                conflict_count: conflicts.len(),
                related_entities,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, EntityType, Node, Severity};

    #[test]
    fn index_groups_by_entity_in_input_order() {
        let conflicts = vec![
            Conflict::new("a", "first", Severity::Low),
            Conflict::new("b", "other", Severity::High),
            Conflict::new("a", "second", Severity::Critical),
        ];

        let index = conflicts_by_entity(&conflicts);
        let kinds = index["a"]
            .iter()
            .map(|c| c.conflict_type.as_str())
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["first", "second"]);
        assert_eq!(index["b"].len(), 1);
        assert!(!index.contains_key("c"));
    }

    #[test]
    fn enrich_scores_each_node_and_skips_dangling_references() {
        let mut flagged = Conflict::new("p1", "adverse_party", Severity::High);
        flagged.related_entities = vec!["o1".into(), "ghost".into(), "o1".into()];

        let snapshot = GraphSnapshot::new(
            vec![
                Node::new("p1", "Jane Roe", EntityType::Person),
                Node::new("o1", "Acme", EntityType::Organization),
            ],
            vec![Edge::new("p1", "o1", "EMPLOYED_BY")],
        )
        .with_conflicts(vec![
            flagged,
            Conflict::new("p1", "prior_counsel", Severity::Medium),
            Conflict::new("ghost", "adverse_party", Severity::Critical),
        ]);

        let insights = enrich(&snapshot);
        assert_eq!(insights.len(), 2);

        assert_eq!(insights[0].risk_score, 75);
        assert_eq!(insights[0].risk_level, RiskLevel::High);
        assert_eq!(insights[0].conflict_count, 2);
        assert_eq!(insights[0].centrality, 1);
        assert_eq!(insights[0].related_entities, ["o1"]);

        assert_eq!(insights[1].risk_score, 0);
        assert_eq!(insights[1].risk_level, RiskLevel::Low);
    }
}
