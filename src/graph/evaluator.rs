use super::{NodeKind, RequiredSlotsGraph};
use crate::condition::Condition;
use crate::slot::{RequiredSlot, SlotAssignment};
use crate::state::SlotSource;
use crate::trace::{EdgeAttempt, EdgeOutcome, TraversalTrace};
use tracing::{debug, trace};

impl RequiredSlotsGraph {
    /// Computes the slots still required for a conversation, in the order they
    /// should be requested.
    ///
    /// The walk starts at the start node and, at every node, follows the first
    /// outgoing edge whose condition holds (conditional edges before the
    /// unconditional fallback). Each slot node reached is appended before its
    /// subtree. Reaching a `slotSet` node ends the branch with a single
    /// [`RequiredSlot::SlotSet`] element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slotgraph::prelude::*;
    /// use serde_json::json;
    ///
    /// let graph = RequiredSlotsGraph::from_json(r#"{
    ///     "nodes": [
    ///         {"id": "0", "type": "start"},
    ///         {"id": "1", "type": "slot", "slotName": "age"},
    ///         {"id": "2", "type": "slot", "slotName": "guardian"}
    ///     ],
    ///     "edges": [
    ///         {"source": "0", "target": "1", "condition": null},
    ///         {"source": "1", "target": "2", "condition": "age < 18"}
    ///     ]
    /// }"#).unwrap();
    ///
    /// let minor = ConversationState::new().with_slot("age", 12);
    /// assert_eq!(
    ///     graph.required_slots(&minor),
    ///     vec![RequiredSlot::slot("age"), RequiredSlot::slot("guardian")]
    /// );
    ///
    /// let adult = ConversationState::new().with_slot("age", json!(40));
    /// assert_eq!(graph.required_slots(&adult), vec![RequiredSlot::slot("age")]);
    /// ```
    pub fn required_slots<S: SlotSource + ?Sized>(&self, state: &S) -> Vec<RequiredSlot> {
        match self.start.as_deref() {
            Some(start) => self.required_slots_from(state, start),
            None => Vec::new(),
        }
    }

    /// Same as [`required_slots`](Self::required_slots), starting from an
    /// arbitrary node instead of the start node.
    pub fn required_slots_from<S: SlotSource + ?Sized>(
        &self,
        state: &S,
        start: &str,
    ) -> Vec<RequiredSlot> {
        let mut path = vec![start];
        self.walk(state, start, &mut path, None)
    }

    /// Computes the required slots and records every edge considered on the way.
    pub fn explain<S: SlotSource + ?Sized>(&self, state: &S) -> (Vec<RequiredSlot>, TraversalTrace) {
        match self.start.as_deref() {
            Some(start) => self.explain_from(state, start),
            None => (Vec::new(), TraversalTrace::default()),
        }
    }

    pub fn explain_from<S: SlotSource + ?Sized>(
        &self,
        state: &S,
        start: &str,
    ) -> (Vec<RequiredSlot>, TraversalTrace) {
        let mut recorded = TraversalTrace::default();
        let mut path = vec![start];
        let result = self.walk(state, start, &mut path, Some(&mut recorded));
        (result, recorded)
    }

    /// Evaluates a single condition against the conversation snapshot.
    pub fn check_condition<S: SlotSource + ?Sized>(&self, state: &S, condition: &Condition) -> bool {
        condition.check(state)
    }

    fn walk<'g, S: SlotSource + ?Sized>(
        &'g self,
        state: &S,
        source: &'g str,
        path: &mut Vec<&'g str>,
        mut recorded: Option<&mut TraversalTrace>,
    ) -> Vec<RequiredSlot> {
        let depth = path.len() - 1;

        for edge in self.outgoing(source) {
            let outcome = if self.cycle_guard && path.contains(&edge.target.as_str()) {
                debug!(source, target_node = %edge.target, "edge leads back onto the current path; skipped");
                EdgeOutcome::CycleSkipped
            } else if edge.condition.check(state) {
                EdgeOutcome::Matched
            } else {
                EdgeOutcome::NotMatched
            };
            trace!(source, target_node = %edge.target, ?outcome, "edge considered");

            if let Some(recorded) = recorded.as_deref_mut() {
                recorded.attempts.push(EdgeAttempt {
                    depth,
                    source: source.to_string(),
                    target: edge.target.clone(),
                    edge_id: edge.id.clone(),
                    condition: edge.condition.to_string(),
                    outcome,
                });
            }
            if outcome != EdgeOutcome::Matched {
                continue;
            }

            // First match wins: whatever happens below, no other edge of `source` is tried.
            let node = self.nodes.get(&edge.target);
            if let Some(node) = node.filter(|n| n.kind == NodeKind::SlotSet) {
                return vec![RequiredSlot::SlotSet(SlotAssignment {
                    name: node.name.clone().unwrap_or_default(),
                    value: node.value.clone(),
                })];
            }

            let mut required = Vec::new();
            match node.and_then(|n| n.name.as_ref()) {
                Some(name) => required.push(RequiredSlot::Slot(name.clone())),
                None => debug!(target_node = %edge.target, "edge target is not a named slot node"),
            }
            path.push(&edge.target);
            required.extend(self.walk(state, &edge.target, path, recorded));
            path.pop();
            return required;
        }

        Vec::new()
    }
}
