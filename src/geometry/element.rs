use std::collections::BTreeMap;

use crate::{
    document::model::Document,
    foundation::core::{BezPath, Point},
    foundation::error::{DollError, DollResult},
    foundation::math::{command_letter, zip_points},
    geometry::delta::Delta,
    geometry::style::Style,
};

/// A vector primitive addressed by a stable element id.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryElement {
    /// Drawing commands.
    Path(PathElement),
    /// Ordered children.
    Group(Group),
    /// Root of a composed drawing.
    Document(Box<Document>),
}

/// Path element: an ordered command sequence, optionally conforming to another element.
#[derive(Clone, Debug, PartialEq)]
pub struct PathElement {
    pub id: String,
    pub style: Option<Style>,
    pub path: BezPath,
    /// Rule for recomputing this path from the resolved geometry of another element.
    pub delta: Option<Delta>,
}

/// Group element. `attributes` carries extra XML attributes (layer labels and the like).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub id: String,
    pub style: Option<Style>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<GeometryElement>,
}

impl PathElement {
    pub fn new(id: impl Into<String>, path: BezPath) -> Self {
        Self {
            id: id.into(),
            style: None,
            path,
            delta: None,
        }
    }

    /// Parse SVG path data (`d` attribute).
    pub fn from_svg(id: impl Into<String>, d: &str) -> DollResult<Self> {
        let id = id.into();
        let d = d.trim();
        if d.is_empty() {
            return Err(DollError::geometry(format!(
                "path '{id}' has empty path data"
            )));
        }
        let path = BezPath::from_svg(d)
            .map_err(|e| DollError::geometry(format!("path '{id}' has invalid path data: {e}")))?;
        Ok(Self::new(id, path))
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_delta(mut self, delta: Delta) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Number of drawing commands.
    pub fn command_count(&self) -> usize {
        self.path.elements().len()
    }
}

impl Group {
    pub fn new(id: impl Into<String>, children: Vec<GeometryElement>) -> Self {
        Self {
            id: id.into(),
            children,
            ..Self::default()
        }
    }
}

impl From<PathElement> for GeometryElement {
    fn from(value: PathElement) -> Self {
        Self::Path(value)
    }
}

impl From<Group> for GeometryElement {
    fn from(value: Group) -> Self {
        Self::Group(value)
    }
}

impl GeometryElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Path(p) => &p.id,
            Self::Group(g) => &g.id,
            Self::Document(d) => &d.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self {
            Self::Path(p) => p.id = id,
            Self::Group(g) => g.id = id,
            Self::Document(d) => d.id = id,
        }
    }

    pub fn style(&self) -> Option<&Style> {
        match self {
            Self::Path(p) => p.style.as_ref(),
            Self::Group(g) => g.style.as_ref(),
            Self::Document(_) => None,
        }
    }

    /// Replace the style. Documents carry no style and ignore the call.
    pub fn set_style(&mut self, style: Option<Style>) {
        match self {
            Self::Path(p) => p.style = style,
            Self::Group(g) => g.style = style,
            Self::Document(_) => {}
        }
    }

    pub fn delta(&self) -> Option<&Delta> {
        match self {
            Self::Path(p) => p.delta.as_ref(),
            Self::Group(_) | Self::Document(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathElement> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Direct children: group members or document layers.
    pub fn children(&self) -> &[GeometryElement] {
        match self {
            Self::Path(_) => &[],
            Self::Group(g) => &g.children,
            Self::Document(d) => &d.layers,
        }
    }

    fn children_mut(&mut self) -> &mut [GeometryElement] {
        match self {
            Self::Path(_) => &mut [],
            Self::Group(g) => &mut g.children,
            Self::Document(d) => &mut d.layers,
        }
    }

    /// Pre-order traversal including `self`.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Visit `self` and every descendant mutably, parents before children.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut GeometryElement)) {
        f(self);
        for child in self.children_mut() {
            child.walk_mut(&mut *f);
        }
    }

    /// Elements with no children, in drawing order. A path is its own single leaf.
    pub fn leaves(&self) -> impl Iterator<Item = &GeometryElement> {
        self.iter().filter(|e| matches!(e, Self::Path(_)))
    }

    /// Rebuild the tree, replacing every path leaf with `f(leaf)`.
    pub fn map_leaves(
        &self,
        f: &mut impl FnMut(&GeometryElement) -> DollResult<GeometryElement>,
    ) -> DollResult<GeometryElement> {
        match self {
            Self::Path(_) => f(self),
            Self::Group(g) => {
                let mut children = Vec::with_capacity(g.children.len());
                for child in &g.children {
                    children.push(child.map_leaves(&mut *f)?);
                }
                Ok(Self::Group(Group {
                    id: g.id.clone(),
                    style: g.style.clone(),
                    attributes: g.attributes.clone(),
                    children,
                }))
            }
            Self::Document(_) => Err(DollError::geometry(format!(
                "document '{}' cannot be nested inside drawing geometry",
                self.id()
            ))),
        }
    }

    /// Combine two structurally identical trees point by point.
    ///
    /// Ids, styles and deltas are taken from `self`. Trees must match in shape: same variants,
    /// same child counts, same command kinds at every index.
    pub fn zip_with(
        &self,
        other: &GeometryElement,
        f: &mut impl FnMut(Point, Point) -> Point,
    ) -> DollResult<GeometryElement> {
        match (self, other) {
            (Self::Path(a), Self::Path(b)) => {
                let (ea, eb) = (a.path.elements(), b.path.elements());
                if ea.len() != eb.len() {
                    return Err(DollError::geometry(format!(
                        "paths '{}' and '{}' have {} and {} commands",
                        a.id,
                        b.id,
                        ea.len(),
                        eb.len()
                    )));
                }
                let mut path = BezPath::new();
                for (i, (&x, &y)) in ea.iter().zip(eb).enumerate() {
                    let el = zip_points(x, y, &mut *f).ok_or_else(|| {
                        DollError::geometry(format!(
                            "paths '{}' and '{}' differ at command {i} ({} vs {})",
                            a.id,
                            b.id,
                            command_letter(&x),
                            command_letter(&y)
                        ))
                    })?;
                    path.push(el);
                }
                Ok(Self::Path(PathElement {
                    path,
                    ..a.clone()
                }))
            }
            (Self::Group(a), Self::Group(b)) => {
                if a.children.len() != b.children.len() {
                    return Err(DollError::geometry(format!(
                        "groups '{}' and '{}' have {} and {} children",
                        a.id,
                        b.id,
                        a.children.len(),
                        b.children.len()
                    )));
                }
                let mut children = Vec::with_capacity(a.children.len());
                for (x, y) in a.children.iter().zip(&b.children) {
                    children.push(x.zip_with(y, &mut *f)?);
                }
                Ok(Self::Group(Group {
                    id: a.id.clone(),
                    style: a.style.clone(),
                    attributes: a.attributes.clone(),
                    children,
                }))
            }
            _ => Err(DollError::geometry(format!(
                "elements '{}' and '{}' differ in kind",
                self.id(),
                other.id()
            ))),
        }
    }
}

/// Pre-order iterator over an element tree.
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a GeometryElement>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a GeometryElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children().iter().rev());
        Some(next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/element.rs"]
mod tests;
