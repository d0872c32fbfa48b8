use super::{EdgeAttempt, EdgeOutcome, TraversalTrace};
use crate::slot::RequiredSlot;
use itertools::Itertools;

/// Formats traversal traces into human-readable text.
pub struct TraceFormatter;

impl TraceFormatter {
    /// Renders every edge attempt on its own line, indented by depth, followed
    /// by the resulting required slots.
    pub fn format(trace: &TraversalTrace, result: &[RequiredSlot]) -> String {
        let mut lines: Vec<String> = trace.attempts.iter().map(Self::format_attempt).collect();
        lines.push(format!("=> [{}]", result.iter().join(", ")));
        lines.join("\n")
    }

    /// Renders only the edges that were taken, e.g. `start -> 1 -> 2`.
    pub fn format_path(trace: &TraversalTrace) -> String {
        let mut path = trace.path().peekable();
        let origin = match path.peek() {
            Some(first) => first.source.clone(),
            None => return String::new(),
        };
        std::iter::once(origin)
            .chain(path.map(|attempt| attempt.target.clone()))
            .join(" -> ")
    }

    fn format_attempt(attempt: &EdgeAttempt) -> String {
        let marker = match attempt.outcome {
            EdgeOutcome::Matched => "taken",
            EdgeOutcome::NotMatched => "not matched",
            EdgeOutcome::CycleSkipped => "skipped (cycle)",
        };
        let edge = match &attempt.edge_id {
            Some(id) => format!(" [{}]", id),
            None => String::new(),
        };
        format!(
            "{}{} -> {}{} if {}: {}",
            "  ".repeat(attempt.depth),
            attempt.source,
            attempt.target,
            edge,
            attempt.condition,
            marker
        )
    }
}
