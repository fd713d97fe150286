//! Interleaved vertex layouts.
//!
//! Field order is fixed (position, uv, color, normal) and so are the shader
//! locations: 0 position, 1 uv, 2 color, 3 normal. Every layout is plain `f32`
//! data with no padding, so records cast to bytes as-is.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Position only.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Position + texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexUv {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Position + color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexRgba {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Position + normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexN {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexUvRgba {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexUvN {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexRgbaN {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexUvRgbaN {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub normal: [f32; 3],
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3) -> Self {
        Self { position: position.to_array() }
    }
}

impl VertexUv {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position: position.to_array(), uv: uv.to_array() }
    }
}

impl VertexRgba {
    #[inline]
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self { position: position.to_array(), color: color.to_array() }
    }
}

impl VertexN {
    #[inline]
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position: position.to_array(), normal: normal.to_array() }
    }
}

impl VertexUvRgba {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            color: color.to_array(),
        }
    }
}

impl VertexUvN {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            normal: normal.to_array(),
        }
    }
}

impl VertexRgbaN {
    #[inline]
    pub fn new(position: Vec3, color: Vec4, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            normal: normal.to_array(),
        }
    }
}

impl VertexUvRgbaN {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2, color: Vec4, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            color: color.to_array(),
            normal: normal.to_array(),
        }
    }
}

impl From<Vec3> for Vertex {
    #[inline]
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}

// ── attribute accessors ───────────────────────────────────────────────────

macro_rules! impl_accessors {
    ($($ty:ident { $($field:ident: $vec:ident),+ })+) => {
        $(
            impl $ty {
                $(
                    #[inline]
                    pub fn $field(&self) -> $vec {
                        $vec::from_array(self.$field)
                    }
                )+
            }
        )+
    };
}

impl_accessors! {
    Vertex { position: Vec3 }
    VertexUv { position: Vec3, uv: Vec2 }
    VertexRgba { position: Vec3, color: Vec4 }
    VertexN { position: Vec3, normal: Vec3 }
    VertexUvRgba { position: Vec3, uv: Vec2, color: Vec4 }
    VertexUvN { position: Vec3, uv: Vec2, normal: Vec3 }
    VertexRgbaN { position: Vec3, color: Vec4, normal: Vec3 }
    VertexUvRgbaN { position: Vec3, uv: Vec2, color: Vec4, normal: Vec3 }
}
