//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load a graph, build it and evaluate it.
//!
//! # Example
//!
//! ```rust,no_run
//! use slotgraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = RequiredSlotsGraph::from_json(&std::fs::read_to_string("path/to/graph.json")?)?;
//! let state = ConversationState::from_file("path/to/state.json")?;
//!
//! for slot in graph.required_slots(&state) {
//!     println!("{}", slot);
//! }
//! # Ok(())
//! # }
//! ```

// Graph definition, building and evaluation
pub use crate::graph::{
    EdgeDefinition, GraphDefinition, NodeDefinition, NodeKind, RequiredSlotsGraph,
};

// Conditions
pub use crate::condition::{Condition, Conjunction, Rule, validate_with_rule};
pub use crate::predicate::Predicate;

// Inputs and outputs
pub use crate::slot::{RequiredSlot, SlotAssignment};
pub use crate::state::{ConversationState, SlotSource};

// Tracing
pub use crate::trace::{TraceFormatter, TraversalTrace};

// Error types
pub use crate::error::{DefinitionError, GraphError, PredicateError, RuleError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
