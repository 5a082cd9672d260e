use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Fixed set of legal entity kinds. Labels outside the set map to `Unknown`
/// so a new backend label never rejects a whole snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Person,
    Organization,
    Case,
    Document,
    Event,
    LegalConcept,
    Court,
    Location,
    #[serde(other)]
    Unknown,
}

impl EntityType {
    pub const ALL: [EntityType; 9] = [
        Self::Person,
        Self::Organization,
        Self::Case,
        Self::Document,
        Self::Event,
        Self::LegalConcept,
        Self::Court,
        Self::Location,
        Self::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Organization => "Organization",
            Self::Case => "Case",
            Self::Document => "Document",
            Self::Event => "Event",
            Self::LegalConcept => "Legal concept",
            Self::Court => "Court",
            Self::Location => "Location",
            Self::Unknown => "Unknown",
        }
    }
}

/// Ordered conflict severity; `Ord` follows the declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn weight(self) -> u32 {
        match self {
            Self::Low => 10,
            Self::Medium => 25,
            Self::High => 50,
            Self::Critical => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Coarse risk classification. There is deliberately no "none" level: an entity
/// without findings is reported as `Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_weight(weight: u32) -> Self {
        if weight >= Severity::Critical.weight() {
            Self::Critical
        } else if weight >= Severity::High.weight() {
            Self::High
        } else if weight >= Severity::Medium.weight() {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub label: EntityType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, label: EntityType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label,
            properties: Map::new(),
        }
    }
}

/// Typed relationship. Identity is the `(from, to, kind)` triple; parallel edges
/// with different kinds are allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: kind.into(),
            properties: Map::new(),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite `id`, if `id` is one of the endpoints.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(self.to.as_str())
        } else if self.to == id {
            Some(self.from.as_str())
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub entity_id: String,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_type: String,
    pub conflict_type: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub related_entities: Vec<String>,
}

impl Conflict {
    pub fn new(
        entity_id: impl Into<String>,
        conflict_type: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_name: String::new(),
            entity_type: String::new(),
            conflict_type: conflict_type.into(),
            description: String::new(),
            severity,
            related_entities: Vec::new(),
        }
    }
}

/// An immutable node/edge/conflict delivery from the data-fetching layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            conflicts: Vec::new(),
        }
    }

    pub fn with_conflicts(mut self, conflicts: Vec<Conflict>) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    /// Edges whose endpoints both exist in the node set, in input order.
    pub fn valid_edges(&self) -> Vec<&Edge> {
        let ids = self.node_ids();
        retain_valid_edges(&self.edges, &ids)
    }
}

pub(crate) fn retain_valid_edges<'a>(edges: &'a [Edge], ids: &HashSet<&str>) -> Vec<&'a Edge> {
    let valid = edges
        .iter()
        .filter(|edge| ids.contains(edge.from.as_str()) && ids.contains(edge.to.as_str()))
        .collect::<Vec<_>>();

    let dropped = edges.len() - valid.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropping edges with endpoints outside the node set");
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_parses_the_fetch_layer_shape() {
        let raw = r#"{
            "nodes": [
                {"id": "p1", "name": "Jane Roe", "label": "Person"},
                {"id": "o1", "name": "Acme LLP", "label": "Organization", "properties": {"city": "Berlin"}},
                {"id": "x1", "name": "Mystery", "label": "Spaceship"}
            ],
            "edges": [{"from": "p1", "to": "o1", "type": "EMPLOYED_BY"}],
            "conflicts": [{
                "entity_id": "p1",
                "entity_name": "Jane Roe",
                "entity_type": "Person",
                "conflict_type": "adverse_party",
                "description": "represented opposing side",
                "severity": "high",
                "related_entities": ["o1"]
            }]
        }"#;

        let snapshot = GraphSnapshot::from_json_str(raw).unwrap();
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.nodes[1].properties["city"], "Berlin");
        assert_eq!(snapshot.nodes[2].label, EntityType::Unknown);
        assert_eq!(snapshot.edges[0].kind, "EMPLOYED_BY");
        assert_eq!(snapshot.conflicts[0].severity, Severity::High);
    }

    #[test]
    fn unknown_severity_fails_at_the_boundary() {
        let raw = r#"{
            "nodes": [{"id": "p1", "name": "Jane", "label": "Person"}],
            "conflicts": [{"entity_id": "p1", "conflict_type": "x", "severity": "catastrophic"}]
        }"#;

        assert!(GraphSnapshot::from_json_str(raw).is_err());
    }

    #[test]
    fn valid_edges_skip_dangling_endpoints() {
        let snapshot = GraphSnapshot::new(
            vec![
                Node::new("a", "A", EntityType::Person),
                Node::new("b", "B", EntityType::Case),
            ],
            vec![
                Edge::new("a", "b", "PARTY_TO"),
                Edge::new("a", "ghost", "KNOWS"),
            ],
        );

        let valid = snapshot.valid_edges();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].to, "b");
    }

    #[test]
    fn severity_ordering_and_levels_line_up() {
        assert!(Severity::Low < Severity::Critical);
        assert_eq!(RiskLevel::from_weight(Severity::Medium.weight()), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_weight(0), RiskLevel::Low);
    }
}
