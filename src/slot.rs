use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A terminal outcome: assign `value` to slot `name` and stop requesting slots.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAssignment {
    pub name: String,
    pub value: Value,
}

/// One element of a required-slots result.
#[derive(Debug, Clone, PartialEq)]
pub enum RequiredSlot {
    /// A slot that still has to be requested from the user.
    Slot(String),
    /// A terminal slot assignment reached through a `slotSet` node.
    SlotSet(SlotAssignment),
}

impl RequiredSlot {
    /// Shorthand for building a [`RequiredSlot::Slot`].
    pub fn slot(name: impl Into<String>) -> Self {
        RequiredSlot::Slot(name.into())
    }

    /// Shorthand for building a [`RequiredSlot::SlotSet`].
    pub fn slot_set(name: impl Into<String>, value: impl Into<Value>) -> Self {
        RequiredSlot::SlotSet(SlotAssignment {
            name: name.into(),
            value: value.into(),
        })
    }

    /// The slot this element concerns, whether requested or assigned.
    pub fn name(&self) -> &str {
        match self {
            RequiredSlot::Slot(name) => name,
            RequiredSlot::SlotSet(assignment) => &assignment.name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequiredSlot::SlotSet(_))
    }
}

impl fmt::Display for RequiredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredSlot::Slot(name) => write!(f, "{}", name),
            RequiredSlot::SlotSet(SlotAssignment { name, value }) => {
                write!(f, "{} := {}", name, value)
            }
        }
    }
}

// Slots serialize as bare strings and assignments as `{name, type: "slotSet", value}`,
// which is the shape the host's form action consumes.
impl Serialize for RequiredSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequiredSlot::Slot(name) => serializer.serialize_str(name),
            RequiredSlot::SlotSet(SlotAssignment { name, value }) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "slotSet")?;
                map.serialize_entry("value", value)?;
                map.end()
            }
        }
    }
}
