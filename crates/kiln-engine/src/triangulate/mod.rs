//! Polygon contours to triangulated geometry.
//!
//! A [`Triangulator`] collects 2D contours and turns them into indexed
//! geometry in an [`IndexedVertexBatch`]: flat fills ([`Triangulator::stamp`])
//! or closed solids ([`Triangulator::extrude`]). The vertex layout of the batch
//! decides which attributes (color, normal) are written.

mod error;
mod extrude;
mod outline;
mod stamp;
mod surface;
mod tess;
mod transform;

use glam::{Vec2, Vec4};
use lyon_tessellation::FillTessellator;

use crate::batch::IndexedVertexBatch;
use crate::buffer::IndexRecord;
use crate::coords::Rect;

pub use error::TriangulateError;
pub use surface::SurfaceVertex;
pub use tess::TessellationLimits;
pub use transform::Transform;

/// How overlapping contours decide what is filled.
///
/// Only the rules the tessellation engine implements are offered. Positive,
/// negative and absolute-greater-or-equal-two winding are not available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WindingRule {
    EvenOdd,
    #[default]
    NonZero,
}

/// Vertex order treated as outward facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FrontFace {
    Cw,
    #[default]
    Ccw,
}

impl FrontFace {
    /// Sign of the local z axis that points outward: -1 for `Cw`, +1 for `Ccw`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            FrontFace::Cw => -1.0,
            FrontFace::Ccw => 1.0,
        }
    }
}

impl From<FrontFace> for wgpu::FrontFace {
    fn from(face: FrontFace) -> Self {
        match face {
            FrontFace::Cw => wgpu::FrontFace::Cw,
            FrontFace::Ccw => wgpu::FrontFace::Ccw,
        }
    }
}

/// Accumulates contours and generates geometry from them.
///
/// Contours persist across calls: the same outline can be stamped or extruded
/// under any number of transforms. Every call re-tessellates.
pub struct Triangulator {
    tessellator: FillTessellator,
    limits: TessellationLimits,
    contours: Vec<Vec<Vec2>>,
    winding_rule: WindingRule,
    front_face: FrontFace,
    color: Vec4,
    allocated: usize,
}

impl Default for Triangulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Triangulator {
    pub fn new() -> Self {
        Self::with_limits(TessellationLimits::default())
    }

    pub fn with_limits(limits: TessellationLimits) -> Self {
        Self {
            tessellator: FillTessellator::new(),
            limits,
            contours: Vec::new(),
            winding_rule: WindingRule::default(),
            front_face: FrontFace::default(),
            color: Vec4::ONE,
            allocated: 0,
        }
    }

    // ── configuration ─────────────────────────────────────────────────────

    pub fn set_winding_rule(&mut self, rule: WindingRule) -> &mut Self {
        self.winding_rule = rule;
        self
    }

    pub fn set_front_face(&mut self, face: FrontFace) -> &mut Self {
        self.front_face = face;
        self
    }

    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = color;
        self
    }

    pub fn set_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        self.set_color(Vec4::new(r, g, b, a))
    }

    pub fn set_limits(&mut self, limits: TessellationLimits) -> &mut Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    #[inline]
    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    #[inline]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    #[inline]
    pub fn limits(&self) -> TessellationLimits {
        self.limits
    }

    // ── contours ──────────────────────────────────────────────────────────

    /// Adds one closed contour. Its own orientation only matters through the
    /// winding rule.
    pub fn add_contour(&mut self, points: &[Vec2]) -> &mut Self {
        self.contours.push(points.to_vec());
        self
    }

    pub fn add_contours<C: AsRef<[Vec2]>>(
        &mut self,
        contours: impl IntoIterator<Item = C>,
    ) -> &mut Self {
        for contour in contours {
            self.add_contour(contour.as_ref());
        }
        self
    }

    /// Adds `rect` as a 4-point contour traversed in `orientation`.
    pub fn add_rect(&mut self, rect: Rect, orientation: FrontFace) -> &mut Self {
        let points = match orientation {
            FrontFace::Ccw => [rect.x1y1(), rect.x1y2(), rect.x2y2(), rect.x2y1()],
            FrontFace::Cw => [rect.x1y1(), rect.x2y1(), rect.x2y2(), rect.x1y2()],
        };
        self.add_contour(&points)
    }

    #[inline]
    pub fn contours(&self) -> &[Vec<Vec2>] {
        &self.contours
    }

    /// Forgets every contour.
    pub fn clear(&mut self) {
        self.contours.clear();
    }

    /// Total bytes of tessellation output produced over this triangulator's life.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    // ── generation ────────────────────────────────────────────────────────

    fn tessellate(&mut self) -> Result<tess::Tessellation, TriangulateError> {
        let tess = tess::tessellate(
            &mut self.tessellator,
            &self.contours,
            self.winding_rule,
            &self.limits,
        )?;
        self.allocated += tess.footprint;
        Ok(tess)
    }

    /// Appends the filled contours as a flat surface at local z = 0.
    ///
    /// Normal-bearing layouts get `transform.transform_normal((0, 0, ±1))`,
    /// signed by the front face. On error nothing is appended.
    pub fn stamp<V, I, H, M>(
        &mut self,
        batch: &mut IndexedVertexBatch<V, I, H>,
        transform: &M,
    ) -> Result<(), TriangulateError>
    where
        V: SurfaceVertex,
        I: IndexRecord,
        M: Transform,
    {
        let tess = self.tessellate()?;
        stamp::stamp(batch, &tess, transform, self.front_face, self.color)
    }

    /// Appends a closed solid: the stamped surface, a back cap `distance`
    /// behind it and side walls along the outline of the filled region.
    ///
    /// Where contours overlap, walls follow the resolved outline, not the
    /// individual contour edges.
    ///
    /// A zero distance appends nothing. On error nothing is appended.
    pub fn extrude<V, I, H, M>(
        &mut self,
        batch: &mut IndexedVertexBatch<V, I, H>,
        transform: &M,
        distance: f32,
    ) -> Result<(), TriangulateError>
    where
        V: SurfaceVertex,
        I: IndexRecord,
        M: Transform,
    {
        if distance == 0.0 {
            return Ok(());
        }

        let tess = self.tessellate()?;
        let extrusion = extrude::Extrusion {
            facing: self.front_face,
            color: self.color,
            transform,
            distance,
        };
        extrude::extrude(batch, &tess, &extrusion)
    }
}

impl std::fmt::Debug for Triangulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Triangulator")
            .field("contours", &self.contours.len())
            .field("winding_rule", &self.winding_rule)
            .field("front_face", &self.front_face)
            .field("color", &self.color)
            .field("limits", &self.limits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::buffer::{Usage, Vertex, VertexN, VertexRecord, VertexRgba, VertexRgbaN};
    use crate::context::RecordedBuffer;

    type Batch<V, I = u32> = IndexedVertexBatch<V, I, RecordedBuffer>;

    fn unit_square() -> Vec<Vec2> {
        vec![Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::new(1.0, 0.0)]
    }

    fn positions<V: VertexRecord>(batch: &Batch<V>, pos: impl Fn(&V) -> Vec3) -> Vec<Vec3> {
        batch.vertices.storage().iter().map(pos).collect()
    }

    fn triangles<V: VertexRecord>(batch: &Batch<V>) -> Vec<[usize; 3]> {
        batch
            .indices
            .storage()
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect()
    }

    /// Geometric normal of each triangle paired with its first vertex normal.
    fn face_normals(batch: &Batch<VertexN>) -> Vec<(Vec3, Vec3)> {
        let verts = batch.vertices.storage().to_vec();
        triangles(batch)
            .into_iter()
            .map(|[a, b, c]| {
                let (pa, pb, pc) = (verts[a].position(), verts[b].position(), verts[c].position());
                ((pb - pa).cross(pc - pa), verts[a].normal())
            })
            .collect()
    }

    // ── stamp ─────────────────────────────────────────────────────────────

    #[test]
    fn unit_square_stamps_two_triangles() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square())
            .set_winding_rule(WindingRule::NonZero);

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();

        assert_eq!(batch.vertex_count(), 4);
        assert_eq!(batch.index_count(), 6);
        let pos = positions(&batch, |v| v.position());
        for corner in unit_square() {
            assert!(pos.contains(&corner.extend(0.0)));
        }
    }

    #[test]
    fn stamp_applies_transform() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        let m = Mat4::from_translation(Vec3::new(2.0, 0.0, 5.0));
        tri.stamp(&mut batch, &m).unwrap();

        for p in positions(&batch, |v| v.position()) {
            assert_eq!(p.z, 5.0);
            assert!(p.x >= 2.0 && p.x <= 3.0);
        }
    }

    #[test]
    fn stamp_normal_follows_front_face() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut ccw = Batch::<VertexN>::new(Usage::Dynamic);
        tri.set_front_face(FrontFace::Ccw).stamp(&mut ccw, &Mat4::IDENTITY).unwrap();
        let mut cw = Batch::<VertexN>::new(Usage::Dynamic);
        tri.set_front_face(FrontFace::Cw).stamp(&mut cw, &Mat4::IDENTITY).unwrap();

        assert!(ccw.vertices.storage().iter().all(|v| v.normal() == Vec3::Z));
        assert!(cw.vertices.storage().iter().all(|v| v.normal() == Vec3::NEG_Z));
    }

    #[test]
    fn stamped_triangles_face_their_normal() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        for face in [FrontFace::Ccw, FrontFace::Cw] {
            let mut batch = Batch::<VertexN>::new(Usage::Dynamic);
            tri.set_front_face(face).stamp(&mut batch, &Mat4::IDENTITY).unwrap();
            for (geometric, normal) in face_normals(&batch) {
                // Counter-clockwise around the normal means front facing for Ccw.
                assert_eq!(geometric.dot(normal) > 0.0, face == FrontFace::Ccw);
            }
        }
    }

    #[test]
    fn stamp_writes_fill_color() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square()).set_rgba(1.0, 0.0, 0.0, 0.5);

        let mut batch = Batch::<VertexRgba>::new(Usage::Static);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        assert!(
            batch
                .vertices
                .storage()
                .iter()
                .all(|v| v.color() == Vec4::new(1.0, 0.0, 0.0, 0.5))
        );
    }

    #[test]
    fn repeated_stamps_offset_indices() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        tri.stamp(&mut batch, &Mat4::from_translation(Vec3::X * 3.0)).unwrap();

        assert_eq!(batch.vertex_count(), 8);
        let second = &triangles(&batch)[2..];
        assert!(second.iter().flatten().all(|&i| (4..8).contains(&i)));
    }

    #[test]
    fn empty_triangulator_stamps_nothing() {
        let mut tri = Triangulator::new();
        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        assert!(batch.is_empty());
    }

    // ── contours ──────────────────────────────────────────────────────────

    #[test]
    fn rect_orientations_are_reverses() {
        let rect = Rect::from_corners(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));
        let mut tri = Triangulator::new();
        tri.add_rect(rect, FrontFace::Ccw).add_rect(rect, FrontFace::Cw);

        let ccw = &tri.contours()[0];
        let mut cw = tri.contours()[1].clone();
        cw.reverse();
        cw.rotate_right(1);
        assert_eq!(ccw, &cw);
        assert_eq!(ccw[..], [rect.x1y1(), rect.x1y2(), rect.x2y2(), rect.x2y1()]);
    }

    #[test]
    fn contours_persist_until_cleared() {
        let mut tri = Triangulator::new();
        let shifted: Vec<Vec2> = unit_square().iter().map(|p| *p + Vec2::X * 2.0).collect();
        tri.add_contours([unit_square(), shifted]);
        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        assert_eq!(tri.contours().len(), 2);
        assert!(tri.allocated_bytes() > 0);

        tri.clear();
        assert!(tri.contours().is_empty());
    }

    // ── extrude ───────────────────────────────────────────────────────────

    #[test]
    fn extruded_square_shares_ring_vertices() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        tri.extrude(&mut batch, &Mat4::IDENTITY, 1.0).unwrap();

        // Two caps of 4, plus front and back rings of 4.
        assert_eq!(batch.vertex_count(), 16);
        assert_eq!(batch.index_count(), 36);
    }

    #[test]
    fn extruded_square_with_normals_has_flat_walls() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<VertexN>::new(Usage::Dynamic);
        tri.extrude(&mut batch, &Mat4::IDENTITY, 1.0).unwrap();

        assert_eq!(batch.vertex_count(), 24);
        assert_eq!(batch.index_count(), 36);
    }

    #[test]
    fn extrude_by_zero_appends_nothing() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<VertexRgbaN>::new(Usage::Dynamic);
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        let before = (batch.vertices.storage().to_vec(), batch.indices.storage().to_vec());

        tri.extrude(&mut batch, &Mat4::IDENTITY, 0.0).unwrap();

        assert_eq!(batch.vertices.storage().to_vec(), before.0);
        assert_eq!(batch.indices.storage().to_vec(), before.1);
    }

    #[test]
    fn extruded_faces_point_outward() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        for (face, distance) in [
            (FrontFace::Ccw, 1.0),
            (FrontFace::Ccw, -1.0),
            (FrontFace::Cw, 1.0),
            (FrontFace::Cw, -2.0),
        ] {
            let mut batch = Batch::<VertexN>::new(Usage::Dynamic);
            tri.set_front_face(face).extrude(&mut batch, &Mat4::IDENTITY, distance).unwrap();

            let verts = batch.vertices.storage().to_vec();
            let depth = -face.sign() * distance;
            let center = Vec3::new(0.5, 0.5, depth * 0.5);

            for [a, b, c] in triangles(&batch) {
                let centroid = (verts[a].position() + verts[b].position() + verts[c].position()) / 3.0;
                assert!(verts[a].normal().dot(centroid - center) > 0.0);
            }
            for (geometric, normal) in face_normals(&batch) {
                assert_eq!(geometric.dot(normal) > 0.0, face == FrontFace::Ccw);
            }
        }
    }

    #[test]
    fn positive_distance_keeps_stamp_normal_on_front_cap() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square()).set_front_face(FrontFace::Cw);

        let mut batch = Batch::<VertexN>::new(Usage::Dynamic);
        tri.extrude(&mut batch, &Mat4::IDENTITY, 1.0).unwrap();

        let verts = batch.vertices.storage().to_vec();
        assert!(verts[..4].iter().all(|v| v.normal() == Vec3::NEG_Z && v.position().z == 0.0));
        assert!(verts[4..8].iter().all(|v| v.normal() == Vec3::Z && v.position().z == 1.0));
    }

    #[test]
    fn extruded_colored_square_carries_fill_color() {
        let color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square()).set_color(color);

        let mut batch = Batch::<VertexRgba>::new(Usage::Dynamic);
        tri.extrude(&mut batch, &Mat4::IDENTITY, 1.0).unwrap();

        assert_eq!(batch.vertex_count(), 16);
        assert_eq!(batch.index_count(), 36);
        assert!(batch.vertices.storage().iter().all(|v| v.color() == color));
    }

    #[test]
    fn extruded_colored_square_with_normals_has_flat_outward_walls() {
        let color = Vec4::new(1.0, 0.5, 0.0, 0.25);
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square()).set_color(color);

        let mut batch = Batch::<VertexRgbaN>::new(Usage::Dynamic);
        tri.extrude(&mut batch, &Mat4::IDENTITY, 1.0).unwrap();

        assert_eq!(batch.vertex_count(), 24);
        assert_eq!(batch.index_count(), 36);

        let verts = batch.vertices.storage().to_vec();
        assert!(verts.iter().all(|v| v.color() == color));
        assert!(verts[..4].iter().all(|v| v.normal() == Vec3::Z));
        assert!(verts[4..8].iter().all(|v| v.normal() == Vec3::NEG_Z));

        let center = Vec3::new(0.5, 0.5, -0.5);
        let walls = &verts[8..];
        for quad in walls.chunks_exact(4) {
            let normal = quad[0].normal();
            assert!(quad.iter().all(|v| v.normal() == normal));
            assert_eq!(normal.z, 0.0);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            assert!(quad.iter().all(|v| normal.dot(v.position() - center) > 0.0));
        }
    }

    // ── limits ────────────────────────────────────────────────────────────

    #[test]
    fn u16_batch_rejects_unaddressable_geometry() {
        let mut tri = Triangulator::new();
        tri.add_contour(&unit_square());

        let mut batch = Batch::<Vertex, u16>::new(Usage::Dynamic);
        batch
            .vertices
            .extend(std::iter::repeat_n(Vertex::default(), 65_534));

        let err = tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap_err();
        assert!(matches!(
            err,
            TriangulateError::IndexOverflow {
                required: 65_538,
                max: 65_536
            }
        ));
        assert_eq!(batch.vertex_count(), 65_534);
        assert!(batch.indices.is_empty());
    }

    #[test]
    fn self_intersection_beyond_extra_vertices_is_rejected() {
        let bowtie = [Vec2::ZERO, Vec2::ONE, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let mut tri = Triangulator::with_limits(TessellationLimits {
            extra_vertices: 0,
            ..TessellationLimits::default()
        });
        tri.add_contour(&bowtie);

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        let err = tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, TriangulateError::CapacityExceeded { limit: 4, .. }));
        assert!(batch.is_empty());

        tri.set_limits(TessellationLimits::default());
        tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap();
        assert!(!batch.is_empty());
    }

    #[test]
    fn engine_errors_keep_their_source() {
        let mut tri = Triangulator::with_limits(TessellationLimits {
            tolerance: f32::NAN,
            ..TessellationLimits::default()
        });
        tri.add_contour(&unit_square());

        let mut batch = Batch::<Vertex>::new(Usage::Dynamic);
        let err = tri.stamp(&mut batch, &Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, TriangulateError::Tessellation(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(batch.is_empty());
    }
}
