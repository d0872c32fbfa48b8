use crate::error::DefinitionError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;

/// The raw required-slots graph of a form, as authored in the host's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphDefinition {
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

/// The role a node plays in the graph.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Traversal origin.
    Start,
    /// A slot to request from the user.
    Slot,
    /// A terminal assignment of a literal value to a slot.
    SlotSet,
    /// Any other or missing type; treated like a slot node.
    #[serde(other)]
    #[default]
    Other,
}

/// A single node of the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: NodeKind,
    #[serde(rename = "slotName", default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,
    #[serde(rename = "slotValue", default, skip_serializing_if = "Option::is_none")]
    pub slot_value: Option<Value>,
}

/// A directed, optionally conditional transition between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Empty when the document leaves it out; such an edge is never followed.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    /// `null` (or absent), a condition tree object, or a predicate string.
    #[serde(default)]
    pub condition: Value,
}

/// Reads a node type without rejecting the document: `null`, numbers and
/// unknown names all become [`NodeKind::Other`].
fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeKind, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

impl GraphDefinition {
    /// Parses a graph definition from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a graph definition from a JSON value, e.g. a form's `graph_elements`.
    pub fn from_value(value: Value) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Loads a graph definition from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

impl NodeDefinition {
    pub fn start(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Start,
            slot_name: None,
            slot_value: None,
        }
    }

    pub fn slot(id: impl Into<String>, slot_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Slot,
            slot_name: Some(slot_name.into()),
            slot_value: None,
        }
    }

    pub fn slot_set(
        id: impl Into<String>,
        slot_name: impl Into<String>,
        slot_value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::SlotSet,
            slot_name: Some(slot_name.into()),
            slot_value: Some(slot_value.into()),
        }
    }
}

impl EdgeDefinition {
    /// Whether both endpoints are present.
    pub fn is_complete(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }

    /// An unconditional edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            condition: Value::Null,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<Value>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
