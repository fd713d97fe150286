use std::collections::HashSet;

use super::tess::Tessellation;

type Point = (u32, u32);

/// Outline of the tessellated fill: triangle edges with no opposite partner,
/// directed so the fill lies on their left.
///
/// The engine splits contours at every intersection, so an edge here is
/// boundary along its whole length. Edges are matched by position, which
/// makes coincident duplicate vertices share their edges.
pub(crate) fn outline_edges(tess: &Tessellation) -> Vec<[u32; 2]> {
    let key = |i: u32| -> Point {
        let p = tess.vertices[i as usize];
        // Adding zero folds -0.0 into 0.0.
        ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
    };
    let sides = |&[a, b, c]: &[u32; 3]| [[a, b], [b, c], [c, a]];

    let directed: HashSet<(Point, Point)> = tess
        .triangles
        .iter()
        .flat_map(sides)
        .map(|[a, b]| (key(a), key(b)))
        .collect();

    tess.triangles
        .iter()
        .flat_map(sides)
        .filter(|&[a, b]| {
            let (ka, kb) = (key(a), key(b));
            ka != kb && !directed.contains(&(kb, ka))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn quad() -> Tessellation {
        Tessellation {
            vertices: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            footprint: 0,
        }
    }

    #[test]
    fn shared_diagonal_is_interior() {
        let edges = outline_edges(&quad());
        assert_eq!(edges.len(), 4);
        assert!(!edges.contains(&[0, 2]) && !edges.contains(&[2, 0]));
    }

    #[test]
    fn outline_keeps_fill_on_the_left() {
        let tess = quad();
        let center = Vec2::splat(0.5);
        for [a, b] in outline_edges(&tess) {
            let (pa, pb) = (tess.vertices[a as usize], tess.vertices[b as usize]);
            assert!((pb - pa).perp_dot(center - pa) > 0.0);
        }
    }

    #[test]
    fn coincident_vertices_share_edges() {
        let mut tess = quad();
        // Second triangle refers to a duplicate of vertex 0.
        tess.vertices.push(Vec2::new(-0.0, 0.0));
        tess.triangles[1] = [4, 2, 3];
        assert_eq!(outline_edges(&tess).len(), 4);
    }
}
