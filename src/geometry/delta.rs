use crate::{
    foundation::core::{BezPath, Point, Vec2},
    foundation::error::{DollError, DollResult},
    foundation::math::{end_point, map_points},
};

/// One pinned command of a conforming path.
///
/// After conforming, the end point of command `command` sits at
/// `end point of target command target_command + offset`. The command's control points move
/// along with its end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub command: usize,
    pub target_command: usize,
    pub offset: Vec2,
}

/// Conforming rule: recompute a path relative to the resolved geometry of `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Delta {
    pub target: String,
    pub anchors: Vec<Anchor>,
}

impl Delta {
    pub fn new(target: impl Into<String>, anchors: Vec<Anchor>) -> Self {
        Self {
            target: target.into(),
            anchors,
        }
    }

    /// Build a delta whose offsets reproduce `own` exactly when the target is still `authored_target`.
    ///
    /// `pairs` are `(command, target_command)` index pairs.
    pub fn between(
        target: impl Into<String>,
        own: &BezPath,
        authored_target: &BezPath,
        pairs: &[(usize, usize)],
    ) -> DollResult<Self> {
        let target = target.into();
        let anchors = pairs
            .iter()
            .map(|&(command, target_command)| {
                let p = command_end(own, command, "own")?;
                let q = command_end(authored_target, target_command, &target)?;
                Ok(Anchor {
                    command,
                    target_command,
                    offset: p - q,
                })
            })
            .collect::<DollResult<Vec<_>>>()?;
        Ok(Self { target, anchors })
    }

    /// Return the conformed shape of `own` (element `elemid`) against the resolved `target` path.
    pub fn conform(&self, elemid: &str, own: &BezPath, target: &BezPath) -> DollResult<BezPath> {
        let mut elements = own.elements().to_vec();
        for anchor in &self.anchors {
            let Some(el) = elements.get(anchor.command).copied() else {
                return Err(DollError::geometry(format!(
                    "'{elemid}' anchors command {} but has {} commands",
                    anchor.command,
                    elements.len()
                )));
            };
            let current = end_point(&el).ok_or_else(|| {
                DollError::geometry(format!(
                    "'{elemid}' anchors close-path command {}",
                    anchor.command
                ))
            })?;
            let pinned = command_end(target, anchor.target_command, &self.target)? + anchor.offset;
            let shift = pinned - current;
            elements[anchor.command] = map_points(el, |p| p + shift);
        }
        Ok(BezPath::from_vec(elements))
    }
}

fn command_end(path: &BezPath, index: usize, owner: &str) -> DollResult<Point> {
    let el = path.elements().get(index).ok_or_else(|| {
        DollError::geometry(format!(
            "command {index} is out of range for '{owner}' ({} commands)",
            path.elements().len()
        ))
    })?;
    end_point(el).ok_or_else(|| {
        DollError::geometry(format!(
            "command {index} of '{owner}' is a close-path and has no end point"
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/delta.rs"]
mod tests;
