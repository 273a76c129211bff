//! Coplanar triangle pairs to quads.
//!
//! Triangles are visited in input order. For each one not yet consumed, its
//! local edges 0, 1, 2 are tried in turn and the first edge that qualifies
//! wins; there is no search for a better pairing. An edge qualifies when
//! - its fold is flat within the coplanar tolerance,
//! - exactly one other triangle is across it and that triangle is still
//!   unconsumed,
//! - the four corners pass [`is_convex_quad`].
//!
//! The neighbour's apex is spliced into the triangle's corner list right
//! after the first endpoint of the chosen edge, which keeps the winding.

use crate::geometry::is_convex_quad;
use crate::mesh::{Mesh, PointId, TriangleId};

/// Default tolerance in degrees under which a fold counts as flat.
pub const DEFAULT_COPLANAR_TOLERANCE: f32 = 1e-7;

/// A successful merge of a triangle with its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadMerge {
    /// Local edge index (0..3) of the shared edge in the visiting triangle.
    pub edge: usize,
    /// The neighbour's vertex that is not on the shared edge.
    pub apex: PointId,
    /// The neighbour triangle, consumed by the merge.
    pub partner: TriangleId,
}

impl QuadMerge {
    /// Corner loop of the quad given the visiting triangle's corners.
    pub fn corners(&self, points: &[PointId; 3]) -> [PointId; 4] {
        let mut out = [points[0]; 4];
        let mut k = 0;
        for (j, &p) in points.iter().enumerate() {
            out[k] = p;
            k += 1;
            if j == self.edge {
                out[k] = self.apex;
                k += 1;
            }
        }
        out
    }
}

/// An output polygon, as welded point indices in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polygon {
    /// A standalone triangle.
    Triangle([PointId; 3]),
    /// Two triangles merged across a flat edge.
    Quad([PointId; 4]),
}

/// Find the first edge of `t` across which it can merge into a convex quad.
///
/// `consumed` is indexed by triangle and marks triangles already emitted.
pub fn try_merge(
    mesh: &Mesh,
    t: TriangleId,
    consumed: &[bool],
    coplanar_tolerance: f32,
) -> Option<QuadMerge> {
    let tri = mesh.triangle(t);
    (0..3).find_map(|j| {
        let edge = mesh.edge(tri.edges[j]);
        if !edge.fold.is_flat(coplanar_tolerance) {
            return None;
        }
        let (partner, apex) = edge.across(t)?;
        if partner == t || consumed[partner.index()] {
            return None;
        }

        let corners = [
            tri.points[j],
            apex,
            tri.points[(j + 1) % 3],
            tri.points[(j + 2) % 3],
        ]
        .map(|p| *mesh.position(p));
        is_convex_quad(&corners).then_some(QuadMerge {
            edge: j,
            apex,
            partner,
        })
    })
}

/// Walk all triangles in input order and produce the output polygons.
///
/// With `merge` disabled every triangle is emitted on its own.
pub fn polygons(mesh: &Mesh, merge: bool, coplanar_tolerance: f32) -> Vec<Polygon> {
    let mut consumed = vec![false; mesh.num_triangles()];
    let mut out = Vec::with_capacity(mesh.num_triangles());

    for t in mesh.triangle_ids() {
        if consumed[t.index()] {
            continue;
        }
        let points = mesh.triangle(t).points;
        let merged = if merge {
            try_merge(mesh, t, &consumed, coplanar_tolerance)
        } else {
            None
        };

        consumed[t.index()] = true;
        match merged {
            Some(m) => {
                consumed[m.partner.index()] = true;
                out.push(Polygon::Quad(m.corners(&points)));
            }
            None => out.push(Polygon::Triangle(points)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Facet, MeshBuilder};
    use nalgebra::Point3;

    fn build(points: &[[f32; 3]], faces: &[[usize; 3]]) -> Mesh {
        let mut builder = MeshBuilder::new();
        for f in faces {
            builder.add_facet(&Facet::from_vertices(
                Point3::from(points[f[0]]),
                Point3::from(points[f[1]]),
                Point3::from(points[f[2]]),
            ));
        }
        builder.finish()
    }

    fn p(i: usize) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn test_corners_splice() {
        let pts = [p(0), p(1), p(2)];
        let m = |edge| QuadMerge {
            edge,
            apex: p(9),
            partner: TriangleId::new(1),
        };
        assert_eq!(m(0).corners(&pts), [p(0), p(9), p(1), p(2)]);
        assert_eq!(m(1).corners(&pts), [p(0), p(1), p(9), p(2)]);
        assert_eq!(m(2).corners(&pts), [p(0), p(1), p(2), p(9)]);
    }

    #[test]
    fn test_rectangle_merges() {
        // Two right triangles sharing the diagonal 0-2 of a 2x1 rectangle.
        let points = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let mesh = build(&points, &[[0, 1, 2], [0, 2, 3]]);

        let consumed = vec![false; 2];
        let m = try_merge(&mesh, TriangleId::new(0), &consumed, DEFAULT_COPLANAR_TOLERANCE)
            .expect("rectangle should merge");
        assert_eq!(m.edge, 2);
        assert_eq!(m.apex, p(3));
        assert_eq!(m.partner, TriangleId::new(1));

        let polys = polygons(&mesh, true, DEFAULT_COPLANAR_TOLERANCE);
        assert_eq!(polys, vec![Polygon::Quad([p(0), p(1), p(2), p(3)])]);
    }

    #[test]
    fn test_dart_does_not_merge() {
        // Triangles A-B-D and B-C-D share B-D; their union has a reflex
        // corner at D.
        let points = [
            [0.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.5, 1.0, 0.0],
        ];
        let mesh = build(&points, &[[0, 1, 3], [1, 2, 3]]);
        assert!(mesh.edges()[1].fold.is_flat(DEFAULT_COPLANAR_TOLERANCE));

        let consumed = vec![false; 2];
        assert!(try_merge(&mesh, TriangleId::new(0), &consumed, DEFAULT_COPLANAR_TOLERANCE).is_none());
        assert!(try_merge(&mesh, TriangleId::new(1), &consumed, DEFAULT_COPLANAR_TOLERANCE).is_none());

        let polys = polygons(&mesh, true, DEFAULT_COPLANAR_TOLERANCE);
        assert_eq!(polys.len(), 2);
        assert!(polys.iter().all(|poly| matches!(poly, Polygon::Triangle(_))));
    }

    #[test]
    fn test_folded_pair_does_not_merge() {
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.5],
        ];
        let mesh = build(&points, &[[0, 1, 2], [0, 2, 3]]);
        let polys = polygons(&mesh, true, DEFAULT_COPLANAR_TOLERANCE);
        assert_eq!(polys.len(), 2);
    }

    #[test]
    fn test_merge_disabled() {
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let mesh = build(&points, &[[0, 1, 2], [0, 2, 3]]);
        let polys = polygons(&mesh, false, DEFAULT_COPLANAR_TOLERANCE);
        assert_eq!(
            polys,
            vec![
                Polygon::Triangle([p(0), p(1), p(2)]),
                Polygon::Triangle([p(0), p(2), p(3)]),
            ]
        );
    }

    #[test]
    fn test_consumed_partner_skipped() {
        // Triangle 0 merges with triangle 2 across its edge 1 (1-2) before
        // reaching edge 2, so triangle 1 finds its coplanar neighbour
        // already consumed and stays a triangle.
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
        ];
        let mesh = build(&points, &[[0, 1, 2], [0, 2, 3], [1, 4, 2]]);
        let polys = polygons(&mesh, true, DEFAULT_COPLANAR_TOLERANCE);
        assert_eq!(
            polys,
            vec![
                Polygon::Quad([p(0), p(1), p(4), p(2)]),
                Polygon::Triangle([p(0), p(2), p(3)]),
            ]
        );
    }

    #[test]
    fn test_first_edge_wins() {
        // Triangle 0 is coplanar with two neighbours; edge 0 (0-1) is tried
        // before edge 1 (1-2).
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let mesh = build(&points, &[[0, 1, 2], [1, 0, 3], [2, 1, 4]]);
        let consumed = vec![false; 3];
        let m = try_merge(&mesh, TriangleId::new(0), &consumed, DEFAULT_COPLANAR_TOLERANCE)
            .expect("should merge");
        assert_eq!(m.edge, 0);
        assert_eq!(m.partner, TriangleId::new(1));
    }
}
