//! Free-form logical predicates over slot values, written in JEXL,
//! e.g. `age >= 18 && authorization == "true"`.
//!
//! A [`Predicate`] is checked for well-formedness once, when the graph is
//! built. Evaluating it never fails: an expression that did not parse, or that
//! applies an operator to values of incompatible types, simply does not match.

use crate::error::{PredicateError, PredicateEvalError};
use crate::state::SlotSource;
use crate::value::is_truthy;
use jexl_eval::Evaluator;
use serde_json::Value;
use tracing::warn;

/// Upper bound on the operators a predicate may contain. Evaluation recurses
/// once per operator, so this also bounds the evaluator's stack use.
pub const MAX_OPERATORS: usize = 256;

/// A predicate string together with the outcome of checking its syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    source: String,
    parsed: Result<(), PredicateError>,
}

impl Predicate {
    /// Checks `source`. Syntax errors are kept rather than returned, so the
    /// predicate can still take its place in a graph and evaluate to `false`.
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let parsed = check_syntax(&source);
        if let Err(e) = &parsed {
            warn!(predicate = %source, error = %e, "invalid predicate; it will never match");
        }
        Self { source, parsed }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The reason the source was rejected, if it was.
    pub fn error(&self) -> Option<&PredicateError> {
        self.parsed.as_ref().err()
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }

    /// Evaluates the predicate to a plain boolean; invalid predicates and
    /// evaluation errors yield `false`.
    pub fn check<S: SlotSource + ?Sized>(&self, state: &S) -> bool {
        match self.evaluate(state) {
            Ok(Some(value)) => is_truthy(&value),
            Ok(None) => false,
            Err(e) => {
                warn!(predicate = %self.source, error = %e, "predicate evaluation failed");
                false
            }
        }
    }

    /// Evaluates the predicate to its raw value, with every set slot in scope.
    /// `Ok(None)` means the source was rejected when it was parsed.
    pub fn evaluate<S: SlotSource + ?Sized>(
        &self,
        state: &S,
    ) -> Result<Option<Value>, PredicateEvalError> {
        if self.parsed.is_err() {
            return Ok(None);
        }
        Evaluator::new()
            .eval_in_context(&self.source, Value::Object(state.to_context()))
            .map(Some)
            .map_err(|e| PredicateEvalError(e.to_string()))
    }
}

/// Checks that `source` is a well-formed JEXL expression of bounded size.
pub fn check_syntax(source: &str) -> Result<(), PredicateError> {
    if source.trim().is_empty() {
        return Err(PredicateError::Empty);
    }
    if count_operators(source) > MAX_OPERATORS {
        return Err(PredicateError::TooManyOperators {
            limit: MAX_OPERATORS,
        });
    }
    jexl_parser::Parser::parse(source)
        .map(|_| ())
        .map_err(|e| PredicateError::Syntax(e.to_string()))
}

/// Counts operator and bracket characters outside string literals. Every
/// level of the syntax tree needs at least one of them.
fn count_operators(source: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in source.chars() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if "!&|=<>+-*/%^?:.([{".contains(c) => count += 1,
            None => {}
        }
    }
    count + source.split_whitespace().filter(|word| *word == "in").count()
}
