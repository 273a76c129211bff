//! The welded mesh aggregate.

use nalgebra::Point3;

use super::index::{EdgeId, PointId, TriangleId};
use super::points::PointStore;
use super::topology::{Edge, Triangle};

/// Counts of geometric anomalies met while building a [`Mesh`].
///
/// None of these stop a conversion; each is also logged as it is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshReport {
    /// Facets with zero area.
    pub degenerate_triangles: usize,
    /// Facets whose stored normal disagreed with the recomputed one.
    pub fixed_normals: usize,
    /// Edges with a single incident triangle.
    pub open_edges: usize,
    /// Edges with ambiguous incidence.
    pub non_manifold_edges: usize,
}

impl MeshReport {
    /// Whether every edge is shared by exactly two triangles.
    pub fn is_closed_manifold(&self) -> bool {
        self.open_edges == 0 && self.non_manifold_edges == 0
    }
}

/// A triangle mesh with welded points and classified edges.
///
/// Built by [`MeshBuilder`](super::MeshBuilder). Points, edges, and
/// triangles are index-addressed tables; nothing is removed once added.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) header: String,
    pub(crate) points: PointStore,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) report: MeshReport,
}

impl Mesh {
    /// Header text carried over from the STL file.
    #[inline]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The welded point table.
    #[inline]
    pub fn points(&self) -> &PointStore {
        &self.points
    }

    /// Position of a point.
    #[inline]
    pub fn position(&self, p: PointId) -> &Point3<f32> {
        self.points.position(p)
    }

    /// All triangles in input order.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get a triangle by index.
    #[inline]
    pub fn triangle(&self, t: TriangleId) -> &Triangle {
        &self.triangles[t.index()]
    }

    /// All edges in registration order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get an edge by index.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.index()]
    }

    /// Iterate over all triangle indices.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all edge indices.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Number of welded points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Anomaly counts gathered while building.
    #[inline]
    pub fn report(&self) -> &MeshReport {
        &self.report
    }

    /// Corner positions of a triangle in winding order.
    pub fn triangle_positions(&self, t: TriangleId) -> [Point3<f32>; 3] {
        let tri = self.triangle(t);
        tri.points.map(|p| *self.position(p))
    }
}
