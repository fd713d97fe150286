//! Plain geometry value types consumed by the triangulator.
//!
//! Vectors come from `glam`; this module only adds the shapes `glam` lacks.

mod rect;

pub use rect::Rect;
