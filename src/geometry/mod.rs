pub(crate) mod delta;
pub(crate) mod element;
pub(crate) mod resolver;
pub(crate) mod style;
pub(crate) mod trace;
