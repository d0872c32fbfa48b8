use thiserror::Error;

/// Errors that can occur while reading a graph definition document.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to parse required slots graph JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Findings reported by strict graph validation.
///
/// Building a graph never produces these; they only come out of
/// [`RequiredSlotsGraph::validate`](crate::graph::RequiredSlotsGraph::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Graph has no start node")]
    MissingStartNode,

    #[error("Graph has more than one start node: '{first}' is used, '{ignored}' is ignored")]
    MultipleStartNodes { first: String, ignored: String },

    #[error("Node id '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("Node '{0}' has no slot name")]
    MissingSlotName(String),

    #[error("Node #{0} has no id")]
    MissingNodeId(usize),

    #[error("Edge #{0} is missing its source or target")]
    IncompleteEdge(usize),

    #[error("Edge from '{source_node_id}' points to node '{missing_node_id}', which does not exist")]
    DanglingEdge {
        source_node_id: String,
        missing_node_id: String,
    },

    #[error("Edge '{source_node_id}' -> '{target_node_id}' has an invalid predicate: {error}")]
    InvalidPredicate {
        source_node_id: String,
        target_node_id: String,
        error: PredicateError,
    },

    #[error("Edge '{source_node_id}' -> '{target_node_id}' uses unknown operator '{operator}'")]
    UnknownOperator {
        source_node_id: String,
        target_node_id: String,
        operator: String,
    },

    #[error("Node '{0}' is part of a cycle")]
    Cycle(String),
}

/// Reasons a predicate string is rejected when the graph is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("Invalid predicate syntax: {0}")]
    Syntax(String),

    #[error("Predicate has more than {limit} operators")]
    TooManyOperators { limit: usize },

    #[error("Predicate is empty")]
    Empty,
}

/// A well-formed predicate that could not be evaluated, e.g. ordering a
/// string against a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to evaluate predicate: {0}")]
pub struct PredicateEvalError(pub String);

/// The indeterminate outcome of an atomic comparison.
///
/// Callers treat every variant as "not matching".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Validation operator '{operator}' requires a string, but found '{found}'")]
    RequiresString {
        operator: String,
        found: serde_json::Value,
    },

    #[error("Validation operator '{operator}' requires a number, but found '{found}'")]
    RequiresNumber {
        operator: String,
        found: serde_json::Value,
    },

    #[error("Validation operator '{operator}' requires a list comparatum, but found '{found}'")]
    RequiresList {
        operator: String,
        found: serde_json::Value,
    },

    #[error("Validation operator '{operator}' requires a valid pattern: {message}")]
    InvalidPattern { operator: String, message: String },

    #[error("Unknown validation operator '{0}'")]
    UnknownOperator(String),
}
