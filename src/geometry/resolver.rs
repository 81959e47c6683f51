use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    foundation::error::{DollError, DollResult},
    geometry::element::{GeometryElement, PathElement},
};

/// Static geometry loaded from description data, indexed by element id.
///
/// Every element is reachable by its own id, including descendants of indexed groups.
#[derive(Clone, Debug, Default)]
pub struct GeometryTable {
    roots: Vec<String>,
    index: BTreeMap<String, GeometryElement>,
}

impl GeometryTable {
    /// Index `roots` and all of their descendants. Ids must be unique across the whole table.
    pub fn from_roots(roots: Vec<GeometryElement>) -> DollResult<Self> {
        let mut table = Self::default();
        for root in roots {
            table.insert(root)?;
        }
        Ok(table)
    }

    /// Add one root element and its descendants.
    pub fn insert(&mut self, root: GeometryElement) -> DollResult<()> {
        if let GeometryElement::Document(_) = root {
            return Err(DollError::configuration(format!(
                "document '{}' cannot be stored as static geometry",
                root.id()
            )));
        }
        let mut seen = BTreeSet::new();
        for elem in root.iter() {
            if self.index.contains_key(elem.id()) || !seen.insert(elem.id()) {
                return Err(DollError::configuration(format!(
                    "duplicate geometry id '{}'",
                    elem.id()
                )));
            }
        }
        // second pass so a rejected root leaves the table untouched
        for elem in root.iter().skip(1) {
            self.index.insert(elem.id().to_string(), elem.clone());
        }
        self.roots.push(root.id().to_string());
        self.index.insert(root.id().to_string(), root);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GeometryElement> {
        self.index.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Root ids in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Per-draw geometry resolution.
///
/// Holds the geometry drawn during the current pass (animation frames and traced outlines) on
/// top of the static table, and memoizes conformed results. A resolver lives for exactly one
/// draw; conformed shapes depend on the animation state and must not outlive it.
#[derive(Debug)]
pub struct GeometryResolver<'a> {
    table: &'a GeometryTable,
    drawn: BTreeMap<String, GeometryElement>,
    memo: HashMap<String, GeometryElement>,
    in_progress: Vec<String>,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(table: &'a GeometryTable) -> Self {
        Self {
            table,
            drawn: BTreeMap::new(),
            memo: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Record geometry produced during this draw. Claiming an id twice is a configuration error.
    pub fn insert_drawn(&mut self, elem: GeometryElement) -> DollResult<()> {
        if self.drawn.contains_key(elem.id()) {
            return Err(DollError::configuration(format!(
                "element id '{}' is drawn more than once",
                elem.id()
            )));
        }
        self.memo.clear();
        self.drawn.insert(elem.id().to_string(), elem);
        Ok(())
    }

    /// Geometry recorded for `id` during this draw, unresolved.
    pub fn drawn(&self, id: &str) -> Option<&GeometryElement> {
        self.drawn.get(id)
    }

    fn lookup(&self, id: &str) -> DollResult<&GeometryElement> {
        self.drawn
            .get(id)
            .or_else(|| self.table.get(id))
            .ok_or_else(|| DollError::configuration(format!("unknown geometry id '{id}'")))
    }

    /// Concrete geometry for `id`, following conforming deltas through their targets.
    pub fn resolve(&mut self, id: &str) -> DollResult<GeometryElement> {
        if let Some(hit) = self.memo.get(id) {
            return Ok(hit.clone());
        }
        if self.in_progress.iter().any(|p| p == id) {
            let mut chain = self.in_progress.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(id);
            return Err(DollError::configuration(format!(
                "conforming cycle detected: {chain}"
            )));
        }

        let elem = self.lookup(id)?.clone();
        let resolved = match elem {
            GeometryElement::Path(own) if own.delta.is_some() => {
                self.in_progress.push(id.to_string());
                let conformed = self.conform(&own);
                self.in_progress.pop();
                GeometryElement::Path(conformed?)
            }
            other => other,
        };
        self.memo.insert(id.to_string(), resolved.clone());
        Ok(resolved)
    }

    fn conform(&mut self, own: &PathElement) -> DollResult<PathElement> {
        let Some(delta) = &own.delta else {
            return Ok(own.clone());
        };
        let target = self.resolve(&delta.target)?;
        let Some(target) = target.as_path() else {
            return Err(DollError::configuration(format!(
                "'{}' conforms to '{}', which is not a path",
                own.id, delta.target
            )));
        };
        let path = delta.conform(&own.id, &own.path, &target.path)?;
        Ok(PathElement {
            id: own.id.clone(),
            style: own.style.clone(),
            path,
            delta: None,
        })
    }

    /// Copy of `elem` with every conforming leaf replaced by its resolved geometry.
    pub fn resolve_deep(&mut self, elem: &GeometryElement) -> DollResult<GeometryElement> {
        elem.map_leaves(&mut |leaf| {
            if leaf.delta().is_some() {
                self.resolve(leaf.id())
            } else {
                Ok(leaf.clone())
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/resolver.rs"]
mod tests;
