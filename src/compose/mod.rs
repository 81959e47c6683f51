pub(crate) mod compositor;
pub(crate) mod defs;
pub(crate) mod layer;
pub(crate) mod styling;
