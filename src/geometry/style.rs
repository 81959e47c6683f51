use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DollError, DollResult};

/// Inline CSS style (`fill:none;stroke:#000`) with declaration order preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Style {
    decls: Vec<(String, String)>,
}

impl Style {
    /// Parse a `property:value;...` declaration list.
    pub fn parse(s: &str) -> DollResult<Self> {
        let mut style = Self::default();
        for decl in s.split(';') {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            let Some((prop, value)) = decl.split_once(':') else {
                return Err(DollError::configuration(format!(
                    "style declaration '{decl}' is missing ':'"
                )));
            };
            let prop = prop.trim();
            if prop.is_empty() {
                return Err(DollError::configuration(format!(
                    "style declaration '{decl}' has an empty property"
                )));
            }
            style.set(prop, value.trim());
        }
        Ok(style)
    }

    /// Value of `prop`, if declared.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set `prop`, replacing an existing declaration in place or appending a new one.
    pub fn set(&mut self, prop: &str, value: &str) {
        match self.decls.iter_mut().find(|(p, _)| p == prop) {
            Some((_, v)) => *v = value.to_string(),
            None => self.decls.push((prop.to_string(), value.to_string())),
        }
    }

    /// Remove `prop`; returns its previous value.
    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let idx = self.decls.iter().position(|(p, _)| p == prop)?;
        Some(self.decls.remove(idx).1)
    }

    /// Declarations in source order.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl FromStr for Style {
    type Err = DollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Style {
    type Error = DollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Style> for String {
    fn from(value: Style) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (p, v)) in self.decls.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{p}:{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/style.rs"]
mod tests;
