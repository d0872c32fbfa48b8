//! Edge conditions and their evaluation against a conversation snapshot.

use crate::predicate::Predicate;
use crate::state::SlotSource;
use crate::value::is_truthy;
use itertools::Itertools;
use serde_json::Value;
use std::fmt;
use tracing::debug;

pub mod rule;

pub use rule::{Operator, RuleOperator, validate_with_rule};

use crate::error::RuleError;

/// How the children of a group condition are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

/// The operator of an atomic rule as read from the graph document.
///
/// Operators the evaluator does not know are kept verbatim so they can be
/// reported by validation; they never match.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOperatorSpec {
    Known(RuleOperator),
    Unknown(String),
}

impl RuleOperatorSpec {
    fn parse(name: &str) -> Self {
        match name.parse() {
            Ok(operator) => RuleOperatorSpec::Known(operator),
            Err(_) => RuleOperatorSpec::Unknown(name.to_string()),
        }
    }
}

/// An atomic comparison between a slot's current value and a configured operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub field: String,
    pub operator: RuleOperatorSpec,
    pub operand: Option<Value>,
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: &str, operand: Option<Value>) -> Self {
        Self {
            field: field.into(),
            operator: RuleOperatorSpec::parse(operator),
            operand,
        }
    }

    /// Runs the comparison; `Err` means the result is indeterminate.
    pub fn evaluate<S: SlotSource + ?Sized>(&self, state: &S) -> Result<bool, RuleError> {
        let operator = match &self.operator {
            RuleOperatorSpec::Known(operator) => operator,
            RuleOperatorSpec::Unknown(name) => return Err(RuleError::UnknownOperator(name.clone())),
        };
        rule::check(state.slot_value(&self.field), operator, self.operand.as_ref())
    }
}

/// A condition guarding a graph edge, decided once when the graph is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// No condition: the edge always matches.
    #[default]
    Always,
    /// A free-form logical predicate string.
    Predicate(Predicate),
    /// A single atomic comparison.
    Rule(Rule),
    /// A combination of child conditions, optionally negated.
    Group {
        conjunction: Conjunction,
        negated: bool,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Reads a condition from the JSON shape used by the graph document.
    ///
    /// - `null` is [`Condition::Always`];
    /// - a string is a [`Condition::Predicate`];
    /// - an object with `"type": "rule"` is a [`Condition::Rule`] read from its `properties`;
    /// - any other value is a [`Condition::Group`] read from `properties` and `children1`.
    pub fn from_json(raw: &Value) -> Self {
        match raw {
            Value::Null => Condition::Always,
            Value::String(source) => Condition::Predicate(Predicate::parse(source.as_str())),
            _ => {
                let props = raw.get("properties");
                let prop = |key: &str| props.and_then(|p| p.get(key));

                if raw.get("type").and_then(Value::as_str) == Some("rule") {
                    let field = prop("field").and_then(Value::as_str).unwrap_or_default();
                    let operator = prop("operator").and_then(Value::as_str).unwrap_or_default();
                    // The operand is always wrapped in a one-element list.
                    let operand = match prop("value") {
                        Some(Value::Array(values)) => values.first().cloned(),
                        Some(Value::Null) | None => None,
                        Some(other) => Some(other.clone()),
                    };
                    return Condition::Rule(Rule::new(field, operator, operand));
                }

                let conjunction = match prop("conjunction").and_then(Value::as_str) {
                    Some("OR") => Conjunction::Or,
                    _ => Conjunction::And,
                };
                let negated = prop("not").is_some_and(is_truthy);
                let children = match raw.get("children1") {
                    Some(Value::Object(map)) => map.values().map(Condition::from_json).collect(),
                    Some(Value::Array(items)) => items.iter().map(Condition::from_json).collect(),
                    _ => Vec::new(),
                };
                Condition::Group {
                    conjunction,
                    negated,
                    children,
                }
            }
        }
    }

    pub fn is_unconditional(&self) -> bool {
        matches!(self, Condition::Always)
    }

    /// Evaluates the condition against the conversation snapshot.
    ///
    /// Never fails: invalid predicates and indeterminate rule comparisons are
    /// treated as not matching.
    pub fn check<S: SlotSource + ?Sized>(&self, state: &S) -> bool {
        match self {
            Condition::Always => true,
            Condition::Predicate(predicate) => predicate.check(state),
            Condition::Rule(rule) => match rule.evaluate(state) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(field = %rule.field, "{}", e);
                    false
                }
            },
            Condition::Group {
                conjunction,
                negated,
                children,
            } => {
                let combined = match conjunction {
                    Conjunction::Or => children.iter().any(|child| child.check(state)),
                    Conjunction::And => children.iter().all(|child| child.check(state)),
                };
                combined != *negated
            }
        }
    }

    /// Visits this condition and every nested one, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Condition)) {
        visit(self);
        if let Condition::Group { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

impl fmt::Display for RuleOperatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOperatorSpec::Known(operator) => write!(f, "{}", operator),
            RuleOperatorSpec::Unknown(name) => write!(f, "{}?", name),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "always"),
            Condition::Predicate(predicate) => write!(f, "`{}`", predicate.source()),
            Condition::Rule(Rule {
                field,
                operator,
                operand,
            }) => match operand {
                Some(operand) => write!(f, "{} {} {}", field, operator, operand),
                None => write!(f, "{} {}", field, operator),
            },
            Condition::Group {
                conjunction,
                negated,
                children,
            } => {
                let separator = match conjunction {
                    Conjunction::And => " AND ",
                    Conjunction::Or => " OR ",
                };
                if *negated {
                    write!(f, "NOT ")?;
                }
                write!(f, "({})", children.iter().join(separator))
            }
        }
    }
}
