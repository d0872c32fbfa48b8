mod formatter;

pub use formatter::TraceFormatter;

/// What happened when an edge was considered during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Matched,
    NotMatched,
    /// The target is already on the current path.
    CycleSkipped,
}

/// A record of one edge being considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeAttempt {
    /// Nesting level of the source node; the start node is depth 0.
    pub depth: usize,
    pub source: String,
    pub target: String,
    pub edge_id: Option<String>,
    /// Human-readable rendering of the edge condition.
    pub condition: String,
    pub outcome: EdgeOutcome,
}

/// A record of how a required-slots result was reached, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalTrace {
    pub attempts: Vec<EdgeAttempt>,
}

impl TraversalTrace {
    /// The edges that were taken, in order.
    pub fn path(&self) -> impl Iterator<Item = &EdgeAttempt> {
        self.attempts
            .iter()
            .filter(|attempt| attempt.outcome == EdgeOutcome::Matched)
    }
}
