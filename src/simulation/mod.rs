mod field;
mod height;

pub use field::{HeightField, PointVertex};
pub use height::HeightFunction;
