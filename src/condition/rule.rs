use crate::error::RuleError;
use crate::value::{coerce_integer, coerce_number, loosely_equal};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("word pattern is valid"));

/// The comparison an atomic rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    IsIn,
    IsExactly,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Longer,
    LongerOrEqual,
    Shorter,
    ShorterOrEqual,
    Email,
    Word,
}

/// Master macro tying each operator to its wire name.
macro_rules! define_operators {
    ( $( ($variant:ident, $name:literal) ),* $(,)? ) => {
        impl Operator {
            pub const ALL: &'static [Operator] = &[ $( Operator::$variant ),* ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Operator::$variant => $name, )*
                }
            }
        }

        impl FromStr for Operator {
            type Err = RuleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Operator::$variant), )*
                    _ => Err(RuleError::UnknownOperator(s.to_string())),
                }
            }
        }
    };
}

define_operators! {
    (IsIn, "is_in"),
    (IsExactly, "is_exactly"),
    (Contains, "contains"),
    (StartsWith, "starts_with"),
    (EndsWith, "ends_with"),
    (Matches, "matches"),
    (Eq, "eq"),
    (Gt, "gt"),
    (Gte, "gte"),
    (Lt, "lt"),
    (Lte, "lte"),
    (Longer, "longer"),
    (LongerOrEqual, "longer_or_equal"),
    (Shorter, "shorter"),
    (ShorterOrEqual, "shorter_or_equal"),
    (Email, "email"),
    (Word, "word"),
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An operator as written in a rule, possibly negated (`not_contains`, `is_not_in`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleOperator {
    pub operator: Operator,
    pub negated: bool,
}

impl FromStr for RuleOperator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "is_not_in" {
            return Ok(Self {
                operator: Operator::IsIn,
                negated: true,
            });
        }
        if let Ok(operator) = s.parse::<Operator>() {
            return Ok(Self {
                operator,
                negated: false,
            });
        }
        match s.strip_prefix("not_").map(str::parse::<Operator>) {
            Some(Ok(operator)) => Ok(Self {
                operator,
                negated: true,
            }),
            _ => Err(RuleError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.negated, self.operator) {
            (true, Operator::IsIn) => write!(f, "is_not_in"),
            (true, op) => write!(f, "not_{}", op),
            (false, op) => write!(f, "{}", op),
        }
    }
}

/// Validates `value` against a named operator and comparatum.
///
/// Returns `Ok(true)`/`Ok(false)` for a determinate result and `Err(RuleError)`
/// when the operands do not fit the operator (e.g. a length comparison with a
/// non-numeric bound), which callers treat as "not matching".
pub fn validate_with_rule(
    value: Option<&Value>,
    operator: &str,
    comparatum: Option<&Value>,
) -> Result<bool, RuleError> {
    let operator: RuleOperator = operator.parse()?;
    check(value, &operator, comparatum)
}

/// Same as [`validate_with_rule`] with an already parsed operator.
pub fn check(
    value: Option<&Value>,
    operator: &RuleOperator,
    comparatum: Option<&Value>,
) -> Result<bool, RuleError> {
    let value = value.unwrap_or(&Value::Null);
    let comparatum = comparatum.unwrap_or(&Value::Null);
    let outcome = apply(operator.operator, value, comparatum)?;
    Ok(outcome != operator.negated)
}

fn apply(operator: Operator, value: &Value, comparatum: &Value) -> Result<bool, RuleError> {
    match operator {
        Operator::IsIn => match comparatum {
            Value::Array(items) => Ok(items.iter().any(|item| loosely_equal(item, value))),
            other => Err(RuleError::RequiresList {
                operator: operator.to_string(),
                found: other.clone(),
            }),
        },
        Operator::IsExactly => Ok(loosely_equal(value, comparatum)),
        Operator::Contains => {
            let (v, c) = strings(operator, value, comparatum)?;
            Ok(v.contains(c))
        }
        Operator::StartsWith => {
            let (v, c) = strings(operator, value, comparatum)?;
            Ok(v.starts_with(c))
        }
        Operator::EndsWith => {
            let (v, c) = strings(operator, value, comparatum)?;
            Ok(v.ends_with(c))
        }
        Operator::Matches => {
            let (v, c) = strings(operator, value, comparatum)?;
            let pattern = Regex::new(&format!("^(?:{})", c)).map_err(|e| {
                RuleError::InvalidPattern {
                    operator: operator.to_string(),
                    message: e.to_string(),
                }
            })?;
            Ok(pattern.is_match(v))
        }
        Operator::Eq | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
            let v = number(operator, value)?;
            let c = number(operator, comparatum)?;
            Ok(match operator {
                Operator::Eq => v == c,
                Operator::Gt => v > c,
                Operator::Gte => v >= c,
                Operator::Lt => v < c,
                _ => v <= c,
            })
        }
        Operator::Longer | Operator::LongerOrEqual | Operator::Shorter | Operator::ShorterOrEqual => {
            let v = string(operator, value)?;
            let bound = coerce_integer(comparatum).ok_or_else(|| RuleError::RequiresNumber {
                operator: operator.to_string(),
                found: comparatum.clone(),
            })?;
            let length = v.chars().count() as i64;
            Ok(match operator {
                Operator::Longer => length > bound,
                Operator::LongerOrEqual => length >= bound,
                Operator::Shorter => length < bound,
                _ => length <= bound,
            })
        }
        Operator::Email => Ok(EMAIL_PATTERN.is_match(string(operator, value)?)),
        Operator::Word => Ok(WORD_PATTERN.is_match(string(operator, value)?)),
    }
}

fn string<'a>(operator: Operator, value: &'a Value) -> Result<&'a str, RuleError> {
    value.as_str().ok_or_else(|| RuleError::RequiresString {
        operator: operator.to_string(),
        found: value.clone(),
    })
}

fn strings<'a>(
    operator: Operator,
    value: &'a Value,
    comparatum: &'a Value,
) -> Result<(&'a str, &'a str), RuleError> {
    Ok((string(operator, value)?, string(operator, comparatum)?))
}

fn number(operator: Operator, value: &Value) -> Result<f64, RuleError> {
    coerce_number(value).ok_or_else(|| RuleError::RequiresNumber {
        operator: operator.to_string(),
        found: value.clone(),
    })
}
