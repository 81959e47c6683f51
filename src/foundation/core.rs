use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DollError, DollResult};

pub use kurbo::{BezPath, PathEl, Point, Vec2};

/// SVG `viewBox` as `min-x min-y width height`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ViewBox {
    /// Left edge in user units.
    pub min_x: f64,
    /// Top edge in user units.
    pub min_y: f64,
    /// Width in user units, must be > 0.
    pub width: f64,
    /// Height in user units, must be > 0.
    pub height: f64,
}

impl ViewBox {
    /// Create a validated view box.
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> DollResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(DollError::configuration(
                "viewBox width and height must be > 0",
            ));
        }
        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

impl FromStr for ViewBox {
    type Err = DollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|e| DollError::configuration(format!("invalid viewBox '{s}': {e}")))
            })
            .collect::<DollResult<Vec<_>>>()?;
        let &[min_x, min_y, width, height] = parts.as_slice() else {
            return Err(DollError::configuration(format!(
                "viewBox '{s}' must have exactly four numbers"
            )));
        };
        Self::new(min_x, min_y, width, height)
    }
}

impl TryFrom<String> for ViewBox {
    type Error = DollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewBox> for String {
    fn from(value: ViewBox) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// Canvas size and coordinate system of a composed document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawOpts {
    /// Document width in user units.
    pub width: f64,
    /// Document height in user units.
    pub height: f64,
    /// Document view box.
    pub viewbox: ViewBox,
}

impl Default for DrawOpts {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            viewbox: ViewBox {
                min_x: -300.0,
                min_y: 0.0,
                width: 600.0,
                height: 800.0,
            },
        }
    }
}

/// Options for exported documents.
///
/// Exports are drawn like regular documents, then every element id is prefixed so that an
/// exported file reused as template art can be told apart from authored sources.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportOpts {
    /// Prefix prepended to every element id.
    pub prefix: String,
    /// Draw options used for the export.
    pub draw: DrawOpts,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            prefix: "pdcexp_".to_string(),
            draw: DrawOpts {
                width: 200.0,
                height: 800.0,
                viewbox: ViewBox {
                    min_x: 0.0,
                    min_y: 0.0,
                    width: 200.0,
                    height: 800.0,
                },
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
