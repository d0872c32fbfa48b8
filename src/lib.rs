//! # Slotgraph - Required-Slots Graph Evaluator
//!
//! **Slotgraph** decides which pieces of information ("slots") a slot-filling
//! form still has to collect from a user, in what order, and when to stop by
//! assigning a slot directly. The decision is driven by a small directed graph
//! whose edges carry conditions over the conversation's current slot values.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Graph**: Deserialize the form's graph document into a
//!     `GraphDefinition` (nodes and edges), or go straight to
//!     `RequiredSlotsGraph::from_json`.
//! 2.  **Build**: `RequiredSlotsGraph::build` indexes the nodes, groups edges by
//!     source and parses every condition once. The result is immutable and can
//!     be shared across threads.
//! 3.  **Evaluate**: Call `required_slots` with a snapshot of the conversation's
//!     slot values on every turn. The result lists slot names to request, or
//!     ends in a single terminal slot assignment.
//!
//! Conditions come in three shapes: nothing (always true), a structured tree of
//! rule leaves and AND/OR groups, or a free-form JEXL predicate string such as
//! `age >= 18 && consent == "yes"`.
//!
//! ## Quick Start
//!
//! ```rust
//! use slotgraph::prelude::*;
//! use serde_json::json;
//!
//! let definition = GraphDefinition::from_value(json!({
//!     "nodes": [
//!         {"id": "0", "type": "start"},
//!         {"id": "1", "type": "slot", "slotName": "age"},
//!         {"id": "2", "type": "slot", "slotName": "authorization"},
//!         {"id": "3", "type": "slot", "slotName": "comments"},
//!         {"id": "4", "type": "slotSet", "slotName": "finished", "slotValue": true}
//!     ],
//!     "edges": [
//!         {"source": "0", "target": "1", "condition": null},
//!         {"source": "1", "target": "3", "condition": null},
//!         {"source": "1", "target": "2", "condition": {
//!             "type": "group",
//!             "children1": {
//!                 "r1": {"type": "rule", "properties": {"field": "age", "operator": "lt", "value": ["18"]}}
//!             },
//!             "properties": {"conjunction": "OR", "not": false}
//!         }},
//!         {"source": "2", "target": "3", "condition": "authorization == 'true'"},
//!         {"source": "3", "target": "4", "condition": null}
//!     ]
//! }))
//! .unwrap();
//!
//! let graph = RequiredSlotsGraph::build(&definition);
//!
//! let state = ConversationState::new().with_slot("age", 30);
//! assert_eq!(
//!     graph.required_slots(&state),
//!     vec![
//!         RequiredSlot::slot("age"),
//!         RequiredSlot::slot("comments"),
//!         RequiredSlot::slot_set("finished", true),
//!     ]
//! );
//!
//! let minor = ConversationState::new().with_slot("age", 17);
//! assert_eq!(
//!     graph.required_slots(&minor),
//!     vec![RequiredSlot::slot("age"), RequiredSlot::slot("authorization")]
//! );
//! ```

pub mod condition;
pub mod error;
pub mod graph;
pub mod predicate;
pub mod prelude;
pub mod slot;
pub mod state;
pub mod trace;
pub mod value;
