use std::collections::BTreeMap;
use std::path::Path;

use crate::{
    compose::compositor,
    dial::board::DialBoard,
    document::model::Document,
    foundation::core::{DrawOpts, ExportOpts},
    foundation::error::{DollError, DollResult},
    geometry::element::GeometryElement,
    geometry::style::Style,
    scene::doll::Doll,
    scene::model::DollDef,
    state::store::{AnimationState, Origin, StateChange},
};

/// Notification emitted by a [`Session`] when something a view may show has changed.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    StateChanged(StateChange),
    DialChanged { dial: String, value: i64 },
    StyleChanged { elemid: String },
}

/// Editing session over one doll: live animation state, dial positions and style overrides.
///
/// All mutation goes through the session; every change is propagated to the dials before the
/// call returns and recorded as an [`Event`].
#[derive(Debug)]
pub struct Session {
    doll: Doll,
    state: AnimationState,
    dials: DialBoard,
    styles: BTreeMap<String, Style>,
    events: Vec<Event>,
}

impl Session {
    /// Start a session with every animation at its default.
    pub fn new(doll: Doll) -> DollResult<Self> {
        let state = doll.initial_state()?;
        let dials = doll.dials.clone();
        Ok(Self {
            doll,
            state,
            dials,
            styles: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    pub fn from_def(def: DollDef) -> DollResult<Self> {
        Self::new(Doll::build(def)?)
    }

    pub fn doll(&self) -> &Doll {
        &self.doll
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn dials(&self) -> &DialBoard {
        &self.dials
    }

    /// Set an animation state directly. Returns the applied change, `None` if nothing moved.
    pub fn set_state(&mut self, name: &str, value: i64) -> DollResult<Option<StateChange>> {
        let Some(change) = self.state.set(name, value, Origin::External)? else {
            return Ok(None);
        };
        let refreshed = self.dials.broadcast(&change);
        self.events.push(Event::StateChanged(change.clone()));
        self.push_dial_events(&refreshed)?;
        Ok(Some(change))
    }

    /// Move a dial. Returns the dial value after clamping.
    pub fn change_dial(&mut self, name: &str, value: i64) -> DollResult<i64> {
        let outcome = self.dials.change_dial(name, value, &mut self.state)?;
        if outcome.changes.is_empty() {
            return Ok(outcome.value);
        }
        self.events
            .extend(outcome.changes.into_iter().map(Event::StateChanged));
        self.push_dial_events(&[name.to_string()])?;
        self.push_dial_events(&outcome.refreshed)?;
        Ok(outcome.value)
    }

    fn push_dial_events(&mut self, names: &[String]) -> DollResult<()> {
        for name in names {
            let value = self.dial_value(name)?;
            self.events.push(Event::DialChanged {
                dial: name.clone(),
                value,
            });
        }
        Ok(())
    }

    /// Dial position derived from the live state.
    pub fn dial_value(&self, name: &str) -> DollResult<i64> {
        self.dials
            .get(name)
            .ok_or_else(|| DollError::configuration(format!("unknown dial '{name}'")))?
            .value(&self.state)
    }

    /// Every dial with its current value, in definition order.
    pub fn dial_values(&self) -> DollResult<Vec<(String, i64)>> {
        self.dials
            .iter()
            .map(|d| Ok((d.name.clone(), d.value(&self.state)?)))
            .collect()
    }

    /// Override the style of one element (or layer group) in every later draw.
    pub fn set_style(&mut self, elemid: impl Into<String>, style: Style) {
        let elemid = elemid.into();
        self.styles.insert(elemid.clone(), style);
        self.events.push(Event::StyleChanged { elemid });
    }

    /// Drop a style override. Returns the removed style.
    pub fn clear_style(&mut self, elemid: &str) -> Option<Style> {
        let removed = self.styles.remove(elemid)?;
        self.events.push(Event::StyleChanged {
            elemid: elemid.to_string(),
        });
        Some(removed)
    }

    pub fn styles(&self) -> &BTreeMap<String, Style> {
        &self.styles
    }

    /// Frame of animation `name` for `value`, or for the current state when `value` is `None`.
    ///
    /// Hypothetical values are clamped to the animation range. A combined animation has no
    /// input of its own: its frame always comes from the current values of its axes, so
    /// `value` is only range checked.
    pub fn animation_frame(&self, name: &str, value: Option<i64>) -> DollResult<GeometryElement> {
        let anim = self
            .doll
            .animation(name)
            .ok_or_else(|| DollError::configuration(format!("unknown animation '{name}'")))?;
        match value {
            Some(v) => anim.get_frame(v.clamp(anim.minimum, anim.maximum), &self.state),
            None => anim.current_frame(&self.state),
        }
    }

    /// Current frame of every animation, sorted by animation name.
    pub fn frames(&self) -> DollResult<Vec<(String, GeometryElement)>> {
        let mut frames = self
            .doll
            .animations
            .iter()
            .map(|a| Ok((a.name.clone(), a.current_frame(&self.state)?)))
            .collect::<DollResult<Vec<_>>>()?;
        frames.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(frames)
    }

    /// Compose the doll for the current state.
    pub fn draw(&self, opts: &DrawOpts) -> DollResult<Document> {
        compositor::draw(&self.doll, &self.state, &self.styles, opts)
    }

    /// Draw and prefix every id. The session itself is left untouched.
    pub fn export(&self, opts: &ExportOpts) -> DollResult<Document> {
        let mut doc = self.draw(&opts.draw)?;
        doc.prefix_ids(&opts.prefix);
        Ok(doc)
    }

    /// Export and write the result as SVG.
    pub fn save_to_file(&self, path: impl AsRef<Path>, opts: &ExportOpts) -> DollResult<()> {
        let path = path.as_ref();
        let doc = self.export(opts)?;
        doc.write_svg(path)?;
        tracing::info!(path = %path.display(), "saved drawing");
        Ok(())
    }

    /// Take every event recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
