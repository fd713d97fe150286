use glam::{Vec3, Vec4};

use crate::batch::IndexedVertexBatch;
use crate::buffer::IndexRecord;

use super::outline::outline_edges;
use super::stamp::{Cap, emit_cap, ensure_addressable};
use super::tess::Tessellation;
use super::{FrontFace, SurfaceVertex, Transform, TriangulateError};

pub(super) struct Extrusion<'a, M> {
    pub facing: FrontFace,
    pub color: Vec4,
    pub transform: &'a M,
    pub distance: f32,
}

/// Front cap, back cap and side walls of a closed solid.
///
/// The back cap sits at local `z = -s * distance` (`s` the front-face sign),
/// so a positive distance grows the solid behind the stamped surface.
pub(super) fn extrude<V, I, H, M>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    tess: &Tessellation,
    ex: &Extrusion<'_, M>,
) -> Result<(), TriangulateError>
where
    V: SurfaceVertex,
    I: IndexRecord,
    M: Transform,
{
    let s = ex.facing.sign();
    let depth = -s * ex.distance;
    let edges = outline_edges(tess);
    let ring = ring_vertices(&edges, tess.vertices.len());

    let wall_vertices = if V::HAS_NORMAL {
        edges.len() * 4
    } else {
        ring.len() * 2
    };
    ensure_addressable(batch, tess.vertices.len() * 2 + wall_vertices)?;

    let front = -depth.signum();
    let back = depth.signum();
    let caps = [
        Cap { z: 0.0, normal: Vec3::Z * front, reversed: front != s },
        Cap { z: depth, normal: Vec3::Z * back, reversed: back != s },
    ];
    for cap in caps {
        emit_cap(batch, tess, ex.transform, cap, ex.color);
    }

    // Wall quads as built face outward counter-clockwise only when the back
    // cap lies on the -z side.
    let flip = front != s;
    if V::HAS_NORMAL {
        flat_walls(batch, tess, &edges, ex, depth, flip);
    } else {
        ring_walls(batch, tess, &edges, &ring, ex, depth, flip);
    }

    log::trace!(
        "extruded {} outline edges over {} (depth {depth})",
        edges.len(),
        ex.distance
    );
    Ok(())
}

/// Outline vertices in first-use order; `slot[v]` is `v`'s position in it.
struct Ring {
    vertices: Vec<u32>,
    slot: Vec<Option<usize>>,
}

impl Ring {
    fn len(&self) -> usize {
        self.vertices.len()
    }
}

fn ring_vertices(edges: &[[u32; 2]], tess_len: usize) -> Ring {
    let mut ring = Ring {
        vertices: Vec::new(),
        slot: vec![None; tess_len],
    };
    for &v in edges.iter().flatten() {
        let slot = &mut ring.slot[v as usize];
        if slot.is_none() {
            *slot = Some(ring.vertices.len());
            ring.vertices.push(v);
        }
    }
    ring
}

fn push_quad<V, I, H>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    [p0, p1, q0, q1]: [usize; 4],
    flip: bool,
) where
    V: SurfaceVertex,
    I: IndexRecord,
{
    if flip {
        batch.add_triangle(p0, q1, q0);
        batch.add_triangle(p0, p1, q1);
    } else {
        batch.add_triangle(p0, q0, q1);
        batch.add_triangle(p0, q1, p1);
    }
}

/// Walls sharing one front and one back vertex per outline vertex.
fn ring_walls<V, I, H, M>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    tess: &Tessellation,
    edges: &[[u32; 2]],
    ring: &Ring,
    ex: &Extrusion<'_, M>,
    depth: f32,
    flip: bool,
) where
    V: SurfaceVertex,
    I: IndexRecord,
    M: Transform,
{
    let base = batch.vertex_count();
    let n = ring.len();
    for z in [0.0, depth] {
        batch.vertices.extend(ring.vertices.iter().map(|&v| {
            let p = tess.vertices[v as usize].extend(z);
            V::surface(ex.transform.transform_point(p), Vec3::ZERO, ex.color)
        }));
    }

    for &[a, b] in edges {
        let (Some(sa), Some(sb)) = (ring.slot[a as usize], ring.slot[b as usize]) else {
            continue;
        };
        push_quad(batch, [base + sa, base + sb, base + n + sa, base + n + sb], flip);
    }
}

/// Walls with four vertices per quad and a flat outward normal.
fn flat_walls<V, I, H, M>(
    batch: &mut IndexedVertexBatch<V, I, H>,
    tess: &Tessellation,
    edges: &[[u32; 2]],
    ex: &Extrusion<'_, M>,
    depth: f32,
    flip: bool,
) where
    V: SurfaceVertex,
    I: IndexRecord,
    M: Transform,
{
    for &[a, b] in edges {
        let (a, b) = (tess.vertices[a as usize], tess.vertices[b as usize]);
        let e = b - a;
        // Fill is on the left of a -> b.
        let outward = Vec3::new(e.y, -e.x, 0.0).normalize_or_zero();
        let normal = ex.transform.transform_normal(outward);

        let base = batch.vertex_count();
        let corners = [a.extend(0.0), b.extend(0.0), a.extend(depth), b.extend(depth)];
        batch.vertices.extend(
            corners.map(|p| V::surface(ex.transform.transform_point(p), normal, ex.color)),
        );
        push_quad(batch, [base, base + 1, base + 2, base + 3], flip);
    }
}
