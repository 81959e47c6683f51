/// Convenience result type used across the paperdoll crate.
pub type DollResult<T> = Result<T, DollError>;

/// Error taxonomy shared by loading, state handling and the draw pipeline.
///
/// Configuration errors point at defects in the description data and abort the current
/// operation. Out-of-range control values are never errors; they are clamped where they enter.
#[derive(thiserror::Error, Debug)]
pub enum DollError {
    /// Authoring/data defect: duplicate ids, dangling references, cycles, empty dials.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid animation definition or a frame request outside the animation range.
    #[error("animation error: {0}")]
    Animation(String),

    /// Invalid path data, incompatible frame structure or an impossible geometric operation.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors when serializing or deserializing description data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DollError {
    /// Build a [`DollError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`DollError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`DollError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`DollError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for fatal authoring defects.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
