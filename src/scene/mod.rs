pub mod doll;
pub mod model;
