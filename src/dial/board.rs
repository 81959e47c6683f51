use crate::{
    dial::controller::Dial,
    foundation::error::{DollError, DollResult},
    state::store::{AnimationState, StateChange},
};

/// Outcome of [`DialBoard::change_dial`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialOutcome {
    pub value: i64,
    pub changes: Vec<StateChange>,
    /// Other dials that observed one of `changes`, in board order.
    pub refreshed: Vec<String>,
}

/// Ordered set of dials sharing one animation state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DialBoard {
    dials: Vec<Dial>,
}

impl DialBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dial: Dial) -> DollResult<()> {
        if self.get(&dial.name).is_some() {
            return Err(DollError::configuration(format!(
                "dial '{}' is defined twice",
                dial.name
            )));
        }
        self.dials.push(dial);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Dial> {
        self.dials.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dial> {
        self.dials.iter()
    }

    pub fn len(&self) -> usize {
        self.dials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dials.is_empty()
    }

    /// Deliver a state change to every dial; returns the names of dials that followed it.
    pub fn broadcast(&mut self, change: &StateChange) -> Vec<String> {
        self.dials
            .iter_mut()
            .filter_map(|d| d.on_state_changed(change).then(|| d.name.clone()))
            .collect()
    }

    /// Move dial `name` to `value` and let every other dial follow the resulting changes.
    pub fn change_dial(
        &mut self,
        name: &str,
        value: i64,
        state: &mut AnimationState,
    ) -> DollResult<DialOutcome> {
        let dial = self
            .dials
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| DollError::configuration(format!("unknown dial '{name}'")))?;
        let update = dial.change_value(value, state)?;

        let mut refreshed: Vec<String> = Vec::new();
        for change in &update.changes {
            for other in self.broadcast(change) {
                if !refreshed.contains(&other) {
                    refreshed.push(other);
                }
            }
        }
        Ok(DialOutcome {
            value: update.value,
            changes: update.changes,
            refreshed,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dial/board.rs"]
mod tests;
