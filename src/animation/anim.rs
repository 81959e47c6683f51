use crate::{
    foundation::core::Point,
    foundation::error::{DollError, DollResult},
    geometry::element::GeometryElement,
    state::store::AnimationState,
};

/// How a keyframe track fills the gap between two keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    /// Use the frame of the last key at or below the value.
    #[default]
    Hold,
    /// Blend the two surrounding frames point by point.
    Linear,
}

/// Frame attached to one state value.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub at: i64,
    pub frame: GeometryElement,
}

/// Keyframe track over integer state values.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    pub keys: Vec<Keyframe>, // strictly increasing `at`
    pub mode: InterpMode,
}

impl Keyframes {
    pub fn validate(&self, owner: &str) -> DollResult<()> {
        if self.keys.is_empty() {
            return Err(DollError::animation(format!(
                "'{owner}' must have at least one keyframe"
            )));
        }
        if !self.keys.windows(2).all(|w| w[0].at < w[1].at) {
            return Err(DollError::animation(format!(
                "'{owner}' keyframes must be sorted by state value without repeats"
            )));
        }
        if self.mode == InterpMode::Linear {
            for w in self.keys.windows(2) {
                w[0].frame.zip_with(&w[1].frame, &mut |a, _| a).map_err(|e| {
                    DollError::animation(format!(
                        "'{owner}' frames at {} and {} cannot be blended: {e}",
                        w[0].at, w[1].at
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Frame for `value`. Values outside the keyed span hold the first/last frame.
    pub fn sample(&self, value: i64) -> DollResult<GeometryElement> {
        let Some(first) = self.keys.first() else {
            return Err(DollError::animation("keyframe track has no keys"));
        };

        let idx = self.keys.partition_point(|k| k.at <= value);
        if idx == 0 {
            return Ok(first.frame.clone());
        }
        let a = &self.keys[idx - 1];
        if idx >= self.keys.len() || a.at == value {
            return Ok(a.frame.clone());
        }
        let b = &self.keys[idx];
        match self.mode {
            InterpMode::Hold => Ok(a.frame.clone()),
            InterpMode::Linear => {
                let t = (value - a.at) as f64 / (b.at - a.at) as f64;
                a.frame.zip_with(&b.frame, &mut |p, q| p.lerp(q, t))
            }
        }
    }
}

/// One input of a combined animation: a keyframe track driven by another state value.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedAxis {
    pub state: String,
    pub keys: Keyframes,
}

/// Frame built from several state values at once.
///
/// Every axis samples its own track; the displacement of that frame from `base` is added to
/// the result, so independent controls blend into a single shape.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedRule {
    pub base: GeometryElement,
    pub axes: Vec<CombinedAxis>,
}

impl CombinedRule {
    pub fn validate(&self, owner: &str) -> DollResult<()> {
        if self.axes.is_empty() {
            return Err(DollError::animation(format!(
                "combined animation '{owner}' has no axes"
            )));
        }
        for axis in &self.axes {
            axis.keys.validate(owner)?;
            for key in &axis.keys.keys {
                key.frame.zip_with(&self.base, &mut |a, _| a).map_err(|e| {
                    DollError::animation(format!(
                        "combined animation '{owner}' axis '{}' frame at {} does not match the base frame: {e}",
                        axis.state, key.at
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn sample(&self, owner: &str, state: &AnimationState) -> DollResult<GeometryElement> {
        let mut acc = self.base.clone();
        for axis in &self.axes {
            let value = state.get(&axis.state).ok_or_else(|| {
                DollError::configuration(format!(
                    "combined animation '{owner}' requires missing state '{}'",
                    axis.state
                ))
            })?;
            let frame = axis.keys.sample(value)?;
            let shift = frame.zip_with(&self.base, &mut |f, b| Point::new(f.x - b.x, f.y - b.y))?;
            acc = acc.zip_with(&shift, &mut |a, d| Point::new(a.x + d.x, a.y + d.y))?;
        }
        Ok(acc)
    }
}

/// Frame selection rule of an animation.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationRule {
    /// Frame depends on this animation's own state value only.
    Simple(Keyframes),
    /// Frame depends on several named state values.
    Combined(CombinedRule),
}

/// Named state variable with an integer range and a frame selection rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub name: String,
    pub minimum: i64,
    pub maximum: i64,
    pub default: i64,
    pub rule: AnimationRule,
}

impl Animation {
    /// Build and validate an animation definition.
    pub fn new(
        name: impl Into<String>,
        minimum: i64,
        default: i64,
        maximum: i64,
        rule: AnimationRule,
    ) -> DollResult<Self> {
        let anim = Self {
            name: name.into(),
            minimum,
            maximum,
            default,
            rule,
        };
        anim.validate()?;
        Ok(anim)
    }

    pub fn validate(&self) -> DollResult<()> {
        if self.minimum > self.maximum {
            return Err(DollError::animation(format!(
                "animation '{}' has minimum {} above maximum {}",
                self.name, self.minimum, self.maximum
            )));
        }
        if !self.contains(self.default) {
            return Err(DollError::animation(format!(
                "animation '{}' default {} is outside [{}, {}]",
                self.name, self.default, self.minimum, self.maximum
            )));
        }
        match &self.rule {
            AnimationRule::Simple(keys) => keys.validate(&self.name),
            AnimationRule::Combined(rule) => rule.validate(&self.name),
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.minimum <= value && value <= self.maximum
    }

    /// State names the frame depends on.
    pub fn inputs(&self) -> Vec<&str> {
        match &self.rule {
            AnimationRule::Simple(_) => vec![self.name.as_str()],
            AnimationRule::Combined(rule) => rule.axes.iter().map(|a| a.state.as_str()).collect(),
        }
    }

    /// Frame for `value` of this animation. Combined animations read their inputs from `state`.
    ///
    /// `value` must lie inside `[minimum, maximum]`; callers clamp before asking.
    pub fn get_frame(&self, value: i64, state: &AnimationState) -> DollResult<GeometryElement> {
        if !self.contains(value) {
            return Err(DollError::animation(format!(
                "animation '{}' has no frame for {value} (range [{}, {}])",
                self.name, self.minimum, self.maximum
            )));
        }
        match &self.rule {
            AnimationRule::Simple(keys) => keys.sample(value),
            AnimationRule::Combined(rule) => rule.sample(&self.name, state),
        }
    }

    /// Frame for the current state.
    pub fn current_frame(&self, state: &AnimationState) -> DollResult<GeometryElement> {
        let value = state.get(&self.name).ok_or_else(|| {
            DollError::configuration(format!("no state for animation '{}'", self.name))
        })?;
        self.get_frame(value, state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
