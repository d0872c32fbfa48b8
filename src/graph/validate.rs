use super::{GraphDefinition, NodeKind, RequiredSlotsGraph};
use crate::condition::{Condition, RuleOperatorSpec};
use crate::error::GraphError;
use ahash::{AHashMap, AHashSet};

impl RequiredSlotsGraph {
    /// Strictly validates a graph definition.
    ///
    /// [`build`](Self::build) accepts anything and degrades silently; call this
    /// first when malformed configuration should be rejected. Every finding is
    /// reported, in definition order.
    pub fn validate(definition: &GraphDefinition) -> Result<(), Vec<GraphError>> {
        let mut findings = Vec::new();

        let mut ids = AHashSet::new();
        let mut start: Option<&str> = None;
        for (index, node) in definition.nodes.iter().enumerate() {
            if node.id.is_empty() {
                findings.push(GraphError::MissingNodeId(index));
            } else if !ids.insert(node.id.as_str()) {
                findings.push(GraphError::DuplicateNode(node.id.clone()));
            }
            match node.kind {
                NodeKind::Start => match start {
                    None => start = Some(node.id.as_str()),
                    Some(first) => findings.push(GraphError::MultipleStartNodes {
                        first: first.to_string(),
                        ignored: node.id.clone(),
                    }),
                },
                _ if node.slot_name.as_deref().is_none_or(str::is_empty) => {
                    findings.push(GraphError::MissingSlotName(node.id.clone()));
                }
                _ => {}
            }
        }
        if start.is_none() {
            findings.push(GraphError::MissingStartNode);
        }

        let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for (index, edge) in definition.edges.iter().enumerate() {
            if !edge.is_complete() {
                findings.push(GraphError::IncompleteEdge(index));
                continue;
            }
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    findings.push(GraphError::DanglingEdge {
                        source_node_id: edge.source.clone(),
                        missing_node_id: endpoint.clone(),
                    });
                }
            }
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());

            Condition::from_json(&edge.condition).walk(&mut |condition| match condition {
                Condition::Predicate(predicate) => {
                    if let Some(error) = predicate.error() {
                        findings.push(GraphError::InvalidPredicate {
                            source_node_id: edge.source.clone(),
                            target_node_id: edge.target.clone(),
                            error: error.clone(),
                        });
                    }
                }
                Condition::Rule(rule) => {
                    if let RuleOperatorSpec::Unknown(operator) = &rule.operator {
                        findings.push(GraphError::UnknownOperator {
                            source_node_id: edge.source.clone(),
                            target_node_id: edge.target.clone(),
                            operator: operator.clone(),
                        });
                    }
                }
                Condition::Always | Condition::Group { .. } => {}
            });
        }

        let order: Vec<&str> = definition.nodes.iter().map(|n| n.id.as_str()).collect();
        for node in find_cycle_entries(&order, &adjacency) {
            findings.push(GraphError::Cycle(node.to_string()));
        }

        if findings.is_empty() {
            Ok(())
        } else {
            Err(findings)
        }
    }

    /// Validates, then builds with default settings.
    pub fn build_strict(definition: &GraphDefinition) -> Result<Self, Vec<GraphError>> {
        Self::validate(definition)?;
        Ok(Self::build(definition))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search reporting the node each back edge points to, once per node.
fn find_cycle_entries<'a>(
    order: &[&'a str],
    adjacency: &AHashMap<&'a str, Vec<&'a str>>,
) -> Vec<&'a str> {
    let mut marks: AHashMap<&str, Mark> = AHashMap::new();
    let mut entries = Vec::new();

    for &root in order {
        if marks.contains_key(root) {
            continue;
        }
        // Explicit stack of (node, index of the next child to visit).
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::Visiting);

        while let Some((node, next)) = stack.last_mut() {
            let children = adjacency.get(*node).map(Vec::as_slice).unwrap_or_default();
            match children.get(*next) {
                Some(&child) => {
                    *next += 1;
                    match marks.get(child) {
                        Some(Mark::Visiting) => {
                            if !entries.contains(&child) {
                                entries.push(child);
                            }
                        }
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(child, Mark::Visiting);
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    marks.insert(*node, Mark::Done);
                    stack.pop();
                }
            }
        }
    }

    entries
}
