//! The required-slots graph: building the index and walking it.

use crate::condition::Condition;
use crate::error::DefinitionError;
use ahash::AHashMap;
use serde_json::Value;
use tracing::debug;

pub mod definition;
mod evaluator;
mod validate;

pub use definition::{EdgeDefinition, GraphDefinition, NodeDefinition, NodeKind};

/// A non-start node of the parsed graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub value: Value,
}

/// An outgoing edge with its condition already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: Option<String>,
    pub target: String,
    pub condition: Condition,
}

/// The parsed index of a required-slots graph.
///
/// Built once per form configuration and immutable afterwards, so it can be
/// shared across threads and evaluated against any number of conversations.
#[derive(Debug, Clone)]
pub struct RequiredSlotsGraph {
    start: Option<String>,
    nodes: AHashMap<String, GraphNode>,
    edges: AHashMap<String, Vec<GraphEdge>>,
    cycle_guard: bool,
}

pub struct GraphBuilder<'a> {
    definition: &'a GraphDefinition,
    cycle_guard: bool,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(definition: &'a GraphDefinition) -> Self {
        Self {
            definition,
            cycle_guard: true,
        }
    }

    /// Stop a branch when an edge leads back to a node already on the current
    /// path. Enabled by default; disabling it lets a cyclic graph recurse
    /// without bound.
    pub fn cycle_guard(mut self, enabled: bool) -> Self {
        self.cycle_guard = enabled;
        self
    }

    pub fn build(self) -> RequiredSlotsGraph {
        let mut start = None;
        let mut nodes = AHashMap::new();
        for node in &self.definition.nodes {
            if node.kind == NodeKind::Start {
                match &start {
                    None => start = Some(node.id.clone()),
                    Some(first) => debug!(first = %first, ignored = %node.id, "extra start node ignored"),
                }
                continue;
            }
            nodes.insert(
                node.id.clone(),
                GraphNode {
                    name: node.slot_name.clone(),
                    kind: node.kind,
                    value: node.slot_value.clone().unwrap_or(Value::Null),
                },
            );
        }

        let mut edges: AHashMap<String, Vec<GraphEdge>> = AHashMap::new();
        for edge in &self.definition.edges {
            if !edge.is_complete() {
                debug!(source = %edge.source, target_node = %edge.target, "edge without both endpoints ignored");
                continue;
            }
            edges.entry(edge.source.clone()).or_default().push(GraphEdge {
                id: edge.id.clone(),
                target: edge.target.clone(),
                condition: Condition::from_json(&edge.condition),
            });
        }
        // Conditional edges are tried before unconditional fallbacks; the sort
        // is stable, so source order holds within each group.
        for outgoing in edges.values_mut() {
            outgoing.sort_by_key(|edge| edge.condition.is_unconditional());
        }

        RequiredSlotsGraph {
            start,
            nodes,
            edges,
            cycle_guard: self.cycle_guard,
        }
    }
}

impl RequiredSlotsGraph {
    pub fn builder(definition: &GraphDefinition) -> GraphBuilder<'_> {
        GraphBuilder::new(definition)
    }

    /// Builds the index with default settings. Never fails: a missing start
    /// node or dangling edges only make the affected branches empty.
    pub fn build(definition: &GraphDefinition) -> Self {
        GraphBuilder::new(definition).build()
    }

    /// Parses a JSON graph document and builds it.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(Self::build(&GraphDefinition::from_json(json)?))
    }

    /// Id of the traversal origin, if the definition had a start node.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Outgoing edges of `source` in evaluation order; empty for unknown ids.
    pub fn outgoing(&self, source: &str) -> &[GraphEdge] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of nodes other than the start node.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_cycle_guard(&self) -> bool {
        self.cycle_guard
    }
}
