//! Common test utilities for building graph definitions and conversation states.
use serde_json::{Value, json};
use slotgraph::prelude::*;

/// A rule leaf in the condition-tree format.
#[allow(dead_code)]
pub fn rule(field: &str, operator: &str, value: &str) -> Value {
    json!({
        "type": "rule",
        "properties": {
            "field": field,
            "operator": operator,
            "value": [value],
            "valueSrc": ["value"],
            "valueType": ["text"],
            "valueError": [null],
        },
    })
}

/// The age/authorization/comments form graph.
///
/// ```text
/// (start)
///    |
///   AGE --- age condition --- AUTHORIZATION
///    |                            |
///    | otherwise                  | authorization == "true"
///    |                            |
/// COMMENTS -----------------------
/// ```
///
/// The age condition is `age < 18 <conjunction> age > 65`, negated when `negated` is set.
#[allow(dead_code)]
pub fn required_slots_graph(conjunction: &str, negated: bool) -> GraphDefinition {
    GraphDefinition::from_value(json!({
        "nodes": [
            {"id": "0", "type": "start"},
            {"id": "1", "type": "slot", "slotName": "age"},
            {"id": "2", "type": "slot", "slotName": "authorization"},
            {"id": "3", "type": "slot", "slotName": "comments"},
        ],
        "edges": [
            {"id": "a", "type": "condition", "source": "0", "target": "1", "condition": null},
            {"id": "d", "type": "condition", "source": "1", "target": "3", "condition": null},
            {
                "id": "b",
                "type": "condition",
                "source": "1",
                "target": "2",
                "condition": {
                    "type": "group",
                    "id": "9a99988a-0123-4456-b89a-b1607f326fd8",
                    "children1": {
                        "a98ab9b9-cdef-4012-b456-71607f326fd9": rule("age", "lt", "18"),
                        "98a8a9ba-0123-4456-b89a-b16e721c8cd0": rule("age", "gt", "65"),
                    },
                    "properties": {"conjunction": conjunction, "not": negated},
                },
            },
            {
                "id": "c",
                "type": "condition",
                "source": "2",
                "target": "3",
                "condition": {
                    "type": "group",
                    "id": "9a99988a-0123-4456-b89a-b1607f326fd8",
                    "children1": {
                        "a98ab9b9-cdef-4012-b456-71607f326fd9": rule("authorization", "is_exactly", "true"),
                    },
                    "properties": {"conjunction": "OR", "not": null},
                },
            },
        ],
    }))
    .expect("fixture graph is valid")
}

/// The same graph with terminal assignments: `finished = false` when authorization
/// is refused and `finished = true` after comments.
#[allow(dead_code)]
pub fn required_slots_graph_with_set_slots(conjunction: &str, negated: bool) -> GraphDefinition {
    let mut graph = required_slots_graph(conjunction, negated);
    graph.nodes.push(NodeDefinition::slot_set("4", "finished", false));
    graph.nodes.push(NodeDefinition::slot_set("5", "finished", true));
    graph.edges.push(EdgeDefinition::new("2", "4").with_id("e"));
    graph.edges.push(EdgeDefinition::new("3", "5").with_id("f"));
    graph
}

/// A conversation where `age` and `authorization` have been filled.
#[allow(dead_code)]
pub fn state(age: i64, authorization: &str) -> ConversationState {
    ConversationState::new()
        .with_slot("age", age)
        .with_slot("authorization", authorization)
}

/// Shorthand for a list of requested slot names.
#[allow(dead_code)]
pub fn slots(names: &[&str]) -> Vec<RequiredSlot> {
    names.iter().map(|name| RequiredSlot::slot(*name)).collect()
}
