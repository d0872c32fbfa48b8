use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;

/// Read-only access to the current slot values of a conversation.
///
/// The evaluator only ever reads through this trait, so any map-like
/// snapshot of the host's tracker can be plugged in. A slot holding `null`
/// counts as unset.
pub trait SlotSource {
    /// Returns the current value of `name`, or `None` if the slot is unset.
    fn slot_value(&self, name: &str) -> Option<&Value>;

    /// Every set slot, in no particular order.
    fn slots(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_>;

    /// The set slots as a JSON object, the context predicate strings are evaluated in.
    fn to_context(&self) -> Map<String, Value> {
        self.slots()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

impl<S: SlotSource + ?Sized> SlotSource for &S {
    fn slot_value(&self, name: &str) -> Option<&Value> {
        (**self).slot_value(name)
    }

    fn slots(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        (**self).slots()
    }
}

macro_rules! impl_slot_source_for_map {
    ($($map:ty),* $(,)?) => {
        $(
            impl SlotSource for $map {
                fn slot_value(&self, name: &str) -> Option<&Value> {
                    self.get(name).filter(|value| !value.is_null())
                }

                fn slots(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
                    Box::new(
                        self.iter()
                            .filter(|(_, value)| !value.is_null())
                            .map(|(name, value)| (name.as_str(), value)),
                    )
                }
            }
        )*
    };
}

impl_slot_source_for_map!(
    AHashMap<String, Value>,
    HashMap<String, Value>,
    BTreeMap<String, Value>,
    Map<String, Value>,
);

/// An owned snapshot of slot values, as handed over by the host on each call.
///
/// A slot explicitly set to `null` is indistinguishable from an unset slot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ConversationState {
    slots: AHashMap<String, Value>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.slots.insert(name.into(), value.into());
    }

    /// Iterates over every `(name, value)` pair in the snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Parses a snapshot from a JSON object of `slot name -> value`.
    pub fn from_json(json: &str) -> Result<Self, crate::error::DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, crate::error::DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| {
            crate::error::DefinitionError::Io {
                path: path.to_string(),
                source,
            }
        })?;
        Self::from_json(&content)
    }
}

impl SlotSource for ConversationState {
    fn slot_value(&self, name: &str) -> Option<&Value> {
        self.slots.slot_value(name)
    }

    fn slots(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        self.slots.slots()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConversationState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            slots: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
