use std::collections::BTreeMap;

use crate::foundation::error::{DollError, DollResult};

/// Who requested a state change.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Direct edit from outside the dial system.
    External,
    /// Write performed by the named dial.
    Dial(String),
}

impl Origin {
    pub fn is_dial(&self, name: &str) -> bool {
        matches!(self, Self::Dial(d) if d == name)
    }
}

/// Notification for one animation whose value actually changed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StateChange {
    pub animation: String,
    pub old: i64,
    pub new: i64,
    pub origin: Origin,
}

impl StateChange {
    pub fn delta(&self) -> i64 {
        self.new - self.old
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    value: i64,
    minimum: i64,
    maximum: i64,
}

/// Current integer value of every animation.
///
/// Values always stay inside the range registered for their animation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationState {
    slots: BTreeMap<String, Slot>,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        minimum: i64,
        maximum: i64,
        initial: i64,
    ) -> DollResult<()> {
        let name = name.into();
        if minimum > maximum {
            return Err(DollError::configuration(format!(
                "state '{name}' has minimum {minimum} above maximum {maximum}"
            )));
        }
        if self.slots.contains_key(&name) {
            return Err(DollError::configuration(format!(
                "state '{name}' is registered twice"
            )));
        }
        self.slots.insert(
            name,
            Slot {
                value: initial.clamp(minimum, maximum),
                minimum,
                maximum,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.slots.get(name).map(|s| s.value)
    }

    pub fn range(&self, name: &str) -> Option<(i64, i64)> {
        self.slots.get(name).map(|s| (s.minimum, s.maximum))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Set a value, clamped to the animation range.
    ///
    /// Returns `None` when the clamped value equals the current one. Unknown names are a
    /// configuration error.
    pub fn set(
        &mut self,
        name: &str,
        value: i64,
        origin: Origin,
    ) -> DollResult<Option<StateChange>> {
        let slot = self.slots.get_mut(name).ok_or_else(|| {
            DollError::configuration(format!("unknown animation state '{name}'"))
        })?;
        let new = value.clamp(slot.minimum, slot.maximum);
        if new == slot.value {
            return Ok(None);
        }
        let old = std::mem::replace(&mut slot.value, new);
        tracing::trace!(animation = name, old, new, ?origin, "state changed");
        Ok(Some(StateChange {
            animation: name.to_owned(),
            old,
            new,
            origin,
        }))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.slots.iter().map(|(k, s)| (k.as_str(), s.value))
    }

    /// Snapshot of all values keyed by animation name.
    pub fn values(&self) -> BTreeMap<String, i64> {
        self.iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
