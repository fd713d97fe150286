//! Kiln engine crate.
//!
//! GPU buffer ownership (shared handles, lazy dirty-tracked upload) and the
//! polygon triangulation pipeline that fills those buffers with stamped and
//! extruded geometry.

pub mod batch;
pub mod buffer;
pub mod context;
pub mod coords;
pub mod device;
pub mod logging;
pub mod triangulate;

pub use batch::IndexedVertexBatch;
pub use buffer::{Buffer, Usage};
pub use triangulate::{FrontFace, TriangulateError, Triangulator, WindingRule};
