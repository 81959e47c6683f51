use crate::{
    foundation::error::{DollError, DollResult},
    state::store::{AnimationState, Origin, StateChange},
};

/// One animation driven by a dial.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationBinding {
    pub animation: String,
    pub minimum: i64,
    pub maximum: i64,
    /// Animation units per dial unit: `(maximum - minimum) / dial range`.
    pub weight: f64,
    value: f64,
}

impl AnimationBinding {
    /// Fractional value the dial tracks for this animation.
    pub fn value(&self) -> f64 {
        self.value
    }

    fn advance(&mut self, by: f64) -> f64 {
        self.value = (self.value + by).clamp(self.minimum as f64, self.maximum as f64);
        self.value
    }
}

/// Result of moving a dial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialUpdate {
    /// Requested value after clamping to the dial range.
    pub value: i64,
    /// Animation states that actually changed.
    pub changes: Vec<StateChange>,
}

/// Integer control mapped onto one or more animation states.
///
/// The dial keeps a fractional running value per bound animation so that small dial steps
/// accumulate instead of being lost to rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct Dial {
    pub name: String,
    pub minimum: i64,
    pub maximum: i64,
    bindings: Vec<AnimationBinding>,
}

impl Dial {
    pub fn new(name: impl Into<String>, minimum: i64, maximum: i64) -> DollResult<Self> {
        let name = name.into();
        if maximum <= minimum {
            return Err(DollError::configuration(format!(
                "dial '{name}' needs maximum above minimum, got [{minimum}, {maximum}]"
            )));
        }
        Ok(Self {
            name,
            minimum,
            maximum,
            bindings: Vec::new(),
        })
    }

    pub fn range(&self) -> i64 {
        self.maximum - self.minimum
    }

    pub fn bindings(&self) -> &[AnimationBinding] {
        &self.bindings
    }

    pub fn binding(&self, animation: &str) -> Option<&AnimationBinding> {
        self.bindings.iter().find(|b| b.animation == animation)
    }

    /// Bind an animation over `[minimum, maximum]`, starting at `initial`.
    pub fn add_animation(
        &mut self,
        name: impl Into<String>,
        minimum: i64,
        initial: i64,
        maximum: i64,
    ) -> DollResult<()> {
        let animation = name.into();
        if maximum <= minimum {
            return Err(DollError::configuration(format!(
                "dial '{}' binds '{animation}' over an empty range [{minimum}, {maximum}]",
                self.name
            )));
        }
        if self.binding(&animation).is_some() {
            return Err(DollError::configuration(format!(
                "dial '{}' binds '{animation}' twice",
                self.name
            )));
        }
        let weight = (maximum - minimum) as f64 / self.range() as f64;
        self.bindings.push(AnimationBinding {
            animation,
            minimum,
            maximum,
            weight,
            value: initial.clamp(minimum, maximum) as f64,
        });
        Ok(())
    }

    /// Dial position derived from the live animation states.
    ///
    /// The dial range is split between bound animations in proportion to their weights and
    /// each share is filled by that animation's progress through its range.
    pub fn value(&self, state: &AnimationState) -> DollResult<i64> {
        let weightsum: f64 = self.bindings.iter().map(|b| b.weight).sum();
        if self.bindings.is_empty() || weightsum <= 0.0 {
            return Err(DollError::configuration(format!(
                "dial '{}' controls no animations",
                self.name
            )));
        }

        let dialrange = self.range() as f64;
        let mut acc = 0.0;
        for b in &self.bindings {
            let current = state.get(&b.animation).ok_or_else(|| {
                DollError::configuration(format!(
                    "dial '{}' reads unknown animation '{}'",
                    self.name, b.animation
                ))
            })?;
            let portion = dialrange * b.weight / weightsum;
            let progress = (current - b.minimum) as f64 / (b.maximum - b.minimum) as f64;
            acc += portion * progress;
        }
        Ok((self.minimum + acc.round_ties_even() as i64).clamp(self.minimum, self.maximum))
    }

    /// Move the dial to `newval` and push the resulting animation values into `state`.
    ///
    /// Writes are tagged with this dial as origin. Moving to the current position changes
    /// nothing.
    pub fn change_value(
        &mut self,
        newval: i64,
        state: &mut AnimationState,
    ) -> DollResult<DialUpdate> {
        let newval = newval.clamp(self.minimum, self.maximum);
        let oldval = self.value(state)?;
        if newval == oldval {
            return Ok(DialUpdate {
                value: newval,
                changes: Vec::new(),
            });
        }

        let step = (newval - oldval) as f64;
        let origin = Origin::Dial(self.name.clone());
        let mut changes = Vec::new();
        for b in &mut self.bindings {
            let target = b.advance(step * b.weight).round_ties_even() as i64;
            if state.get(&b.animation) == Some(target) {
                continue;
            }
            if let Some(change) = state.set(&b.animation, target, origin.clone())? {
                changes.push(change);
            }
        }
        tracing::debug!(
            dial = %self.name,
            oldval,
            newval,
            changed = changes.len(),
            "dial moved"
        );
        Ok(DialUpdate {
            value: newval,
            changes,
        })
    }

    /// Follow a state change made elsewhere. Returns `true` when the dial display may have moved.
    ///
    /// Changes this dial wrote itself are ignored.
    pub fn on_state_changed(&mut self, change: &StateChange) -> bool {
        if change.origin.is_dial(&self.name) {
            return false;
        }
        let Some(b) = self
            .bindings
            .iter_mut()
            .find(|b| b.animation == change.animation)
        else {
            return false;
        };
        b.advance(change.delta() as f64);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dial/controller.rs"]
mod tests;
