//! Paperdoll composes a parametric 2D vector figure from layered, animated geometry.
//!
//! Integer controls ("dials") drive animation states; every state selects a geometry frame;
//! paths may conform to other, possibly animated, paths. The public API is session-oriented:
//!
//! - Load a [`DollDef`] description and validate it into a [`Doll`]
//! - Create a [`Session`] and move dials or set states
//! - Draw a [`Document`] and serialize it as SVG
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compose;
pub(crate) mod dial;
/// Composed documents and their SVG serialization.
pub mod document;
pub(crate) mod geometry;
/// Description model and validated doll definitions.
pub mod scene;
/// Editing sessions.
pub mod session;
pub(crate) mod state;

pub use crate::foundation::core::{BezPath, DrawOpts, ExportOpts, PathEl, Point, Vec2, ViewBox};
pub use crate::foundation::error::{DollError, DollResult};

pub use crate::animation::anim::{
    Animation, AnimationRule, CombinedAxis, CombinedRule, InterpMode, Keyframe, Keyframes,
};
pub use crate::compose::compositor::{COORD_DIGITS, DOCUMENT_ID, draw};
pub use crate::compose::layer::{Layer, LayerEntry};
pub use crate::compose::styling::{PrefixRule, StyleRules};
pub use crate::dial::board::{DialBoard, DialOutcome};
pub use crate::dial::controller::{AnimationBinding, Dial, DialUpdate};
pub use crate::document::model::{DefNode, Document};
pub use crate::geometry::delta::{Anchor, Delta};
pub use crate::geometry::element::{GeometryElement, Group, PathElement};
pub use crate::geometry::resolver::{GeometryResolver, GeometryTable};
pub use crate::geometry::style::Style;
pub use crate::geometry::trace::trace_outline;
pub use crate::scene::doll::Doll;
pub use crate::scene::model::DollDef;
pub use crate::session::editor::{Event, Session};
pub use crate::state::store::{AnimationState, Origin, StateChange};
