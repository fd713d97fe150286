use glam::Vec2;
use lyon_tessellation::math::point;
use lyon_tessellation::path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

use super::{TriangulateError, WindingRule};

/// Bounds applied to every tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationLimits {
    /// Vertices the engine may add beyond the input contour points.
    pub extra_vertices: usize,
    /// Flattening tolerance handed to the engine.
    pub tolerance: f32,
}

impl Default for TessellationLimits {
    fn default() -> Self {
        Self {
            extra_vertices: 256,
            tolerance: FillOptions::DEFAULT_TOLERANCE,
        }
    }
}

/// Triangulated fill in the contour plane. Triangles are counter-clockwise.
#[derive(Debug, Default)]
pub(crate) struct Tessellation {
    pub vertices: Vec<Vec2>,
    pub triangles: Vec<[u32; 3]>,
    /// Bytes the engine output occupied.
    pub footprint: usize,
}

impl From<WindingRule> for FillRule {
    fn from(rule: WindingRule) -> Self {
        match rule {
            WindingRule::EvenOdd => FillRule::EvenOdd,
            WindingRule::NonZero => FillRule::NonZero,
        }
    }
}

pub(crate) fn tessellate(
    tessellator: &mut FillTessellator,
    contours: &[Vec<Vec2>],
    rule: WindingRule,
    limits: &TessellationLimits,
) -> Result<Tessellation, TriangulateError> {
    let mut builder = Path::builder();
    let mut input_points = 0;
    for contour in contours {
        let Some((first, rest)) = contour.split_first() else { continue };
        builder.begin(point(first.x, first.y));
        for p in rest {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
        input_points += contour.len();
    }
    let path = builder.build();

    let options = FillOptions::tolerance(limits.tolerance).with_fill_rule(rule.into());
    let mut geometry: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    tessellator
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut geometry, |v: FillVertex| {
                Vec2::new(v.position().x, v.position().y)
            }),
        )?;

    let limit = input_points + limits.extra_vertices;
    if geometry.vertices.len() > limit {
        return Err(TriangulateError::CapacityExceeded {
            produced: geometry.vertices.len(),
            limit,
        });
    }

    let footprint = geometry.vertices.capacity() * std::mem::size_of::<Vec2>()
        + geometry.indices.capacity() * std::mem::size_of::<u32>();

    let vertices = geometry.vertices;
    let triangles = geometry
        .indices
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] = [t[0], t[1], t[2]];
            let (pa, pb, pc) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            if (pb - pa).perp_dot(pc - pa) < 0.0 { [a, c, b] } else { [a, b, c] }
        })
        .collect();

    log::trace!(
        "tessellated {} contours ({input_points} points) into {} vertices",
        contours.len(),
        vertices.len()
    );

    Ok(Tessellation {
        vertices,
        triangles,
        footprint,
    })
}
