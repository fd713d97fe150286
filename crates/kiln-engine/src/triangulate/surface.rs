use glam::{Vec3, Vec4};

use crate::buffer::{Vertex, VertexN, VertexRgba, VertexRgbaN, VertexRecord};

/// Vertex layouts the triangulator can emit.
///
/// Each layout takes the attributes it carries and ignores the rest, so one
/// generation routine serves all of them.
pub trait SurfaceVertex: VertexRecord {
    /// `true` if the layout stores a normal; walls then get flat per-face normals.
    const HAS_NORMAL: bool;

    fn surface(position: Vec3, normal: Vec3, color: Vec4) -> Self;
}

impl SurfaceVertex for Vertex {
    const HAS_NORMAL: bool = false;

    #[inline]
    fn surface(position: Vec3, _normal: Vec3, _color: Vec4) -> Self {
        Vertex::new(position)
    }
}

impl SurfaceVertex for VertexN {
    const HAS_NORMAL: bool = true;

    #[inline]
    fn surface(position: Vec3, normal: Vec3, _color: Vec4) -> Self {
        VertexN::new(position, normal)
    }
}

impl SurfaceVertex for VertexRgba {
    const HAS_NORMAL: bool = false;

    #[inline]
    fn surface(position: Vec3, _normal: Vec3, color: Vec4) -> Self {
        VertexRgba::new(position, color)
    }
}

impl SurfaceVertex for VertexRgbaN {
    const HAS_NORMAL: bool = true;

    #[inline]
    fn surface(position: Vec3, normal: Vec3, color: Vec4) -> Self {
        VertexRgbaN::new(position, color, normal)
    }
}
