//! Tests for building and walking the required-slots graph.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotgraph::prelude::*;

/// (conjunction, negated, age, authorization required)
const CASES: &[(&str, bool, i64, bool)] = &[
    // under 18 or over 65
    ("OR", false, 17, true),
    ("OR", false, 30, false),
    ("OR", false, 66, true),
    // at least 18 and at most 65
    ("OR", true, 17, false),
    ("OR", true, 30, true),
    ("OR", true, 66, false),
    // under 18 and over 65 (contradiction)
    ("AND", false, 17, false),
    ("AND", false, 30, false),
    ("AND", false, 66, false),
    // at least 18 or at most 65 (tautology)
    ("AND", true, 17, true),
    ("AND", true, 30, true),
    ("AND", true, 66, true),
];

fn expected(authorization_req: bool, authorized: bool, with_slots: bool) -> Vec<RequiredSlot> {
    let mut expected = slots(&["age"]);
    if authorization_req {
        expected.push(RequiredSlot::slot("authorization"));
    }
    // Comments come right after age, or after authorization once it is granted.
    if !authorization_req || authorized {
        expected.push(RequiredSlot::slot("comments"));
    }
    if with_slots {
        let finished = !authorization_req || authorized;
        expected.push(RequiredSlot::slot_set("finished", finished));
    }
    expected
}

#[test]
fn test_required_slots_grid() {
    for &(conjunction, negated, age, authorization_req) in CASES {
        for with_slots in [false, true] {
            let definition = if with_slots {
                required_slots_graph_with_set_slots(conjunction, negated)
            } else {
                required_slots_graph(conjunction, negated)
            };
            let graph = RequiredSlotsGraph::build(&definition);

            for authorized in [false, true] {
                let authorization = if authorized { "true" } else { "false" };
                assert_eq!(
                    graph.required_slots(&state(age, authorization)),
                    expected(authorization_req, authorized, with_slots),
                    "conjunction={} negated={} age={} authorization={} with_slots={}",
                    conjunction,
                    negated,
                    age,
                    authorization,
                    with_slots
                );
            }
        }
    }
}

#[test]
fn test_minor_requires_authorization() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph("OR", false));
    let minor = ConversationState::new().with_slot("age", 17);
    assert_eq!(graph.required_slots(&minor), slots(&["age", "authorization"]));

    let adult = ConversationState::new().with_slot("age", 30);
    assert_eq!(graph.required_slots(&adult), slots(&["age", "comments"]));
}

#[test]
fn test_negated_condition_flips_branch() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph("OR", true));
    let adult = ConversationState::new().with_slot("age", 30);
    assert_eq!(graph.required_slots(&adult), slots(&["age", "authorization"]));

    let minor = ConversationState::new().with_slot("age", 17);
    assert_eq!(graph.required_slots(&minor), slots(&["age", "comments"]));
}

#[test]
fn test_slot_set_ends_traversal() {
    let mut definition = required_slots_graph_with_set_slots("OR", false);
    // Anything beyond the terminal node must never be reached.
    definition.nodes.push(NodeDefinition::slot("6", "unreachable"));
    definition.edges.push(EdgeDefinition::new("5", "6"));
    let graph = RequiredSlotsGraph::build(&definition);

    let result = graph.required_slots(&state(17, "true"));
    assert_eq!(
        result,
        vec![
            RequiredSlot::slot("age"),
            RequiredSlot::slot("authorization"),
            RequiredSlot::slot("comments"),
            RequiredSlot::slot_set("finished", true),
        ]
    );
    assert_eq!(result.iter().filter(|slot| slot.is_terminal()).count(), 1);
}

#[test]
fn test_slot_set_result_of_its_own_branch_is_the_terminal_only() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph_with_set_slots("OR", false));
    let result = graph.required_slots_from(&state(17, "true"), "3");
    assert_eq!(result, vec![RequiredSlot::slot_set("finished", true)]);
}

#[test]
fn test_first_match_wins() {
    let definition = GraphDefinition {
        nodes: vec![
            NodeDefinition::start("start"),
            NodeDefinition::slot("a", "first"),
            NodeDefinition::slot("b", "second"),
            NodeDefinition::slot("c", "fallback"),
        ],
        edges: vec![
            EdgeDefinition::new("start", "c"),
            EdgeDefinition::new("start", "a").with_condition("x > 1"),
            EdgeDefinition::new("start", "b").with_condition("x > 0"),
        ],
    };
    let graph = RequiredSlotsGraph::build(&definition);

    let both = ConversationState::new().with_slot("x", 5);
    assert_eq!(graph.required_slots(&both), slots(&["first"]));

    let second_only = ConversationState::new().with_slot("x", 1);
    assert_eq!(graph.required_slots(&second_only), slots(&["second"]));

    let neither = ConversationState::new().with_slot("x", 0);
    assert_eq!(graph.required_slots(&neither), slots(&["fallback"]));
}

#[test]
fn test_first_unconditional_edge_wins_among_fallbacks() {
    let definition = GraphDefinition {
        nodes: vec![
            NodeDefinition::start("0"),
            NodeDefinition::slot("1", "one"),
            NodeDefinition::slot("2", "two"),
        ],
        edges: vec![EdgeDefinition::new("0", "1"), EdgeDefinition::new("0", "2")],
    };
    let graph = RequiredSlotsGraph::build(&definition);
    assert_eq!(graph.required_slots(&ConversationState::new()), slots(&["one"]));
    assert_eq!(graph.outgoing("0").len(), 2);
}

#[test]
fn test_depth_first_order() {
    let definition = GraphDefinition {
        nodes: vec![
            NodeDefinition::start("s"),
            NodeDefinition::slot("1", "name"),
            NodeDefinition::slot("2", "email"),
            NodeDefinition::slot("3", "phone"),
            NodeDefinition::slot("4", "company"),
        ],
        edges: vec![
            EdgeDefinition::new("s", "1"),
            EdgeDefinition::new("1", "2").with_condition("contact == 'email'"),
            EdgeDefinition::new("1", "3"),
            EdgeDefinition::new("2", "4"),
            EdgeDefinition::new("3", "4"),
        ],
    };
    let graph = RequiredSlotsGraph::build(&definition);

    let by_email = ConversationState::new().with_slot("contact", "email");
    assert_eq!(
        graph.required_slots(&by_email),
        slots(&["name", "email", "company"])
    );
    assert_eq!(
        graph.required_slots(&ConversationState::new()),
        slots(&["name", "phone", "company"])
    );
}

#[test]
fn test_evaluation_is_deterministic() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph_with_set_slots("AND", true));
    let conversation = state(66, "false");
    let first = graph.required_slots(&conversation);
    for _ in 0..10 {
        assert_eq!(graph.required_slots(&conversation), first);
    }
}

#[test]
fn test_graph_is_shared_across_threads() {
    let graph = std::sync::Arc::new(RequiredSlotsGraph::build(&required_slots_graph("OR", false)));
    let handles: Vec<_> = [17, 30, 66, 40]
        .into_iter()
        .map(|age| {
            let graph = std::sync::Arc::clone(&graph);
            std::thread::spawn(move || {
                let result = graph.required_slots(&ConversationState::new().with_slot("age", age));
                (age, result)
            })
        })
        .collect();

    for handle in handles {
        let (age, result) = handle.join().unwrap();
        let expected = if age < 18 || age > 65 {
            slots(&["age", "authorization"])
        } else {
            slots(&["age", "comments"])
        };
        assert_eq!(result, expected);
    }
}

#[test]
fn test_missing_start_yields_nothing() {
    let mut definition = required_slots_graph("OR", false);
    definition.nodes.retain(|node| node.kind != NodeKind::Start);
    let graph = RequiredSlotsGraph::build(&definition);
    assert_eq!(graph.start(), None);
    assert!(graph.required_slots(&state(17, "true")).is_empty());
}

#[test]
fn test_only_first_start_node_is_used() {
    let mut definition = required_slots_graph("OR", false);
    definition.nodes.push(NodeDefinition::start("other"));
    definition.nodes.push(NodeDefinition::slot("x", "never"));
    definition.edges.push(EdgeDefinition::new("other", "x"));
    let graph = RequiredSlotsGraph::build(&definition);
    assert_eq!(graph.start(), Some("0"));
    assert_eq!(graph.required_slots(&state(30, "false")), slots(&["age", "comments"]));
}

#[test]
fn test_dangling_target_is_skipped() {
    let definition = GraphDefinition {
        nodes: vec![NodeDefinition::start("0"), NodeDefinition::slot("1", "age")],
        edges: vec![EdgeDefinition::new("0", "1"), EdgeDefinition::new("1", "ghost")],
    };
    let graph = RequiredSlotsGraph::build(&definition);
    assert_eq!(graph.required_slots(&ConversationState::new()), slots(&["age"]));
    assert!(graph.outgoing("ghost").is_empty());
}

#[test]
fn test_cycle_guard_cuts_back_edges() {
    let definition = GraphDefinition {
        nodes: vec![
            NodeDefinition::start("0"),
            NodeDefinition::slot("1", "question"),
            NodeDefinition::slot("2", "confirmation"),
        ],
        edges: vec![
            EdgeDefinition::new("0", "1"),
            EdgeDefinition::new("1", "2"),
            EdgeDefinition::new("2", "1"),
        ],
    };
    let graph = RequiredSlotsGraph::build(&definition);
    assert!(graph.has_cycle_guard());
    assert_eq!(
        graph.required_slots(&ConversationState::new()),
        slots(&["question", "confirmation"])
    );
}

#[test]
fn test_cycle_guard_falls_through_to_next_edge() {
    let definition = GraphDefinition {
        nodes: vec![
            NodeDefinition::start("0"),
            NodeDefinition::slot("1", "question"),
            NodeDefinition::slot("2", "done"),
        ],
        edges: vec![
            EdgeDefinition::new("0", "1"),
            EdgeDefinition::new("1", "1").with_condition("retry == true"),
            EdgeDefinition::new("1", "2"),
        ],
    };
    let graph = RequiredSlotsGraph::build(&definition);
    let retrying = ConversationState::new().with_slot("retry", true);
    assert_eq!(graph.required_slots(&retrying), slots(&["question", "done"]));
}

#[test]
fn test_from_json_document() {
    let graph = RequiredSlotsGraph::from_json(
        r#"{
            "nodes": [
                {"id": "0", "type": "start"},
                {"id": "1", "type": "slot", "slotName": "age"},
                {"id": "2", "type": "slotSet", "slotName": "adult", "slotValue": true}
            ],
            "edges": [
                {"source": "0", "target": "1"},
                {"source": "1", "target": "2", "condition": "age >= 18"}
            ]
        }"#,
    )
    .unwrap();

    let adult = ConversationState::new().with_slot("age", 30);
    assert_eq!(
        graph.required_slots(&adult),
        vec![RequiredSlot::slot("age"), RequiredSlot::slot_set("adult", true)]
    );
    assert!(matches!(
        RequiredSlotsGraph::from_json("{\"nodes\": 3}"),
        Err(DefinitionError::JsonParseError(_))
    ));
}

#[test]
fn test_result_serializes_for_the_host() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph_with_set_slots("OR", false));
    let result = graph.required_slots(&state(17, "false"));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!(["age", "authorization", {"name": "finished", "type": "slotSet", "value": false}])
    );
}

#[test]
fn test_plain_maps_are_slot_sources() {
    let graph = RequiredSlotsGraph::build(&required_slots_graph("OR", false));
    let mut slots_map = std::collections::HashMap::new();
    slots_map.insert("age".to_string(), json!(70));
    slots_map.insert("authorization".to_string(), json!("true"));
    assert_eq!(
        graph.required_slots(&slots_map),
        slots(&["age", "authorization", "comments"])
    );
}

#[test]
fn test_typeless_node_is_requested_like_a_slot() {
    let graph = RequiredSlotsGraph::from_json(
        r#"{
            "nodes": [
                {"id": "0", "type": "start"},
                {"id": "1", "slotName": "age"},
                {"id": "2", "type": null, "slotName": "comments"}
            ],
            "edges": [
                {"source": "0", "target": "1"},
                {"source": "1", "target": "2"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(graph.node("1").map(|node| node.kind), Some(NodeKind::Other));
    assert_eq!(
        graph.required_slots(&ConversationState::new()),
        slots(&["age", "comments"])
    );
}

#[test]
fn test_edge_without_endpoint_is_ignored() {
    let graph = RequiredSlotsGraph::from_json(
        r#"{
            "nodes": [
                {"id": "0", "type": "start"},
                {"id": "1", "type": "slot", "slotName": "age"},
                {"id": "2", "type": "slot", "slotName": "comments"}
            ],
            "edges": [
                {"source": "0", "target": "1"},
                {"source": "1", "condition": "age >= 18"},
                {"target": "2"},
                {"source": "1", "target": "2"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(graph.outgoing("1").len(), 1);
    assert!(graph.outgoing("").is_empty());

    let adult = ConversationState::new().with_slot("age", 30);
    assert_eq!(graph.required_slots(&adult), slots(&["age", "comments"]));
}
