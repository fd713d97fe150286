use glam::{Vec3, Vec4};

use crate::batch::IndexedVertexBatch;
use crate::buffer::IndexRecord;

use super::tess::Tessellation;
use super::{FrontFace, SurfaceVertex, Transform, TriangulateError};

/// Placement of one copy of the triangulated fill.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cap {
    /// Local z of the plane.
    pub z: f32,
    /// Local outward normal.
    pub normal: Vec3,
    /// Emit clockwise (in the contour plane) instead of counter-clockwise.
    pub reversed: bool,
}

/// Fails unless `added` more vertices stay addressable by the batch's index type.
pub(super) fn ensure_addressable<V, I, H>(
    batch: &IndexedVertexBatch<V, I, H>,
    added: usize,
) -> Result<(), TriangulateError>
where
    V: SurfaceVertex,
    I: IndexRecord,
{
    let required = batch.vertex_count() + added;
    if required > I::MAX_VERTICES {
        return Err(TriangulateError::IndexOverflow {
            required,
            max: I::MAX_VERTICES,
        });
    }
    Ok(())
}

pub(super) fn emit_cap<V, I, H, M>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    tess: &Tessellation,
    transform: &M,
    cap: Cap,
    color: Vec4,
) where
    V: SurfaceVertex,
    I: IndexRecord,
    M: Transform,
{
    let normal = if V::HAS_NORMAL {
        transform.transform_normal(cap.normal)
    } else {
        Vec3::ZERO
    };

    let base = batch.vertex_count();
    batch.vertices.extend(
        tess.vertices
            .iter()
            .map(|p| V::surface(transform.transform_point(p.extend(cap.z)), normal, color)),
    );

    batch.indices.reserve(tess.triangles.len() * 3);
    for &[a, b, c] in &tess.triangles {
        let (b, c) = if cap.reversed { (c, b) } else { (b, c) };
        batch.add_triangle(base + a as usize, base + b as usize, base + c as usize);
    }
}

/// One flat copy of the fill at z = 0, facing along the front-face normal.
pub(super) fn stamp<V, I, H, M>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    tess: &Tessellation,
    transform: &M,
    facing: FrontFace,
    color: Vec4,
) -> Result<(), TriangulateError>
where
    V: SurfaceVertex,
    I: IndexRecord,
    M: Transform,
{
    ensure_addressable(batch, tess.vertices.len())?;

    // Counter-clockwise seen from +z is clockwise seen from -z, so the
    // plane-space order is front-facing for either convention.
    let cap = Cap {
        z: 0.0,
        normal: Vec3::Z * facing.sign(),
        reversed: false,
    };
    emit_cap(batch, tess, transform, cap, color);
    Ok(())
}
