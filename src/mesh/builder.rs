//! Mesh construction from STL facets.
//!
//! [`MeshBuilder`] takes facets one at a time, checks each stored normal
//! against the one implied by the vertex winding, and welds the vertices.
//! [`MeshBuilder::finish`] then builds the edge table and classifies every
//! edge, so a [`Mesh`] is always fully annotated.

use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};

use super::index::{PointId, TriangleId};
use super::points::{PointStore, DEFAULT_WELD_TOLERANCE};
use super::topology::{build_edges, Triangle};
use super::welded::{Mesh, MeshReport};
use crate::algo::classify::classify_edges;
use crate::geometry::facet_normal;

/// Default per-component tolerance when comparing a stored facet normal
/// with the recomputed one.
pub const DEFAULT_NORMAL_TOLERANCE: f32 = 1e-7;

/// One facet as read from an STL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// The normal stored in the file (not trusted).
    pub normal: Vector3<f32>,
    /// The three vertices in winding order.
    pub vertices: [Point3<f32>; 3],
}

impl Facet {
    /// Create a facet from a stored normal and three vertices.
    pub fn new(normal: Vector3<f32>, vertices: [Point3<f32>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Create a facet whose stored normal is zero.
    pub fn from_vertices(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self::new(Vector3::zeros(), [v0, v1, v2])
    }
}

/// Incremental builder for a [`Mesh`].
///
/// # Example
/// ```
/// use nalgebra::Point3;
/// use stl2ldraw::mesh::{Facet, MeshBuilder};
///
/// let mut builder = MeshBuilder::new().with_header("square");
/// builder.add_facet(&Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ));
/// builder.add_facet(&Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ));
/// let mesh = builder.finish();
/// assert_eq!(mesh.num_points(), 4);
/// assert_eq!(mesh.num_edges(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    header: String,
    points: PointStore,
    corners: Vec<[PointId; 3]>,
    normals: Vec<Vector3<f32>>,
    normal_tolerance: f32,
    report: MeshReport,
}

impl MeshBuilder {
    /// Create a builder with default tolerances.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a builder with room for `facets` facets.
    pub fn with_capacity(facets: usize) -> Self {
        Self {
            header: String::new(),
            points: PointStore::with_capacity(DEFAULT_WELD_TOLERANCE, 3 * facets),
            corners: Vec::with_capacity(facets),
            normals: Vec::with_capacity(facets),
            normal_tolerance: DEFAULT_NORMAL_TOLERANCE,
            report: MeshReport::default(),
        }
    }

    /// Set the header text.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the welding tolerance. Must be called before adding facets.
    pub fn with_weld_tolerance(mut self, tolerance: f32) -> Self {
        debug_assert!(self.points.is_empty(), "weld tolerance changed after welding");
        self.points = PointStore::with_capacity(tolerance, 3 * self.corners.capacity());
        self
    }

    /// Set the tolerance for reporting a corrected facet normal.
    pub fn with_normal_tolerance(mut self, tolerance: f32) -> Self {
        self.normal_tolerance = tolerance;
        self
    }

    /// Add one facet, returning its triangle index.
    ///
    /// Zero-area facets are kept with a zero normal and counted as degenerate.
    pub fn add_facet(&mut self, facet: &Facet) -> TriangleId {
        let id = TriangleId::new(self.corners.len());
        let [v0, v1, v2] = &facet.vertices;

        let normal = match facet_normal(v0, v1, v2) {
            Some(n) => n,
            None => {
                warn!("degenerated face {}", id.index());
                self.report.degenerate_triangles += 1;
                Vector3::zeros()
            }
        };

        let mismatch = (normal - facet.normal).amax();
        if mismatch > self.normal_tolerance {
            debug!(
                "fixed normal of face {}: {} {} {} (was {} {} {})",
                id.index(),
                normal.x,
                normal.y,
                normal.z,
                facet.normal.x,
                facet.normal.y,
                facet.normal.z
            );
            self.report.fixed_normals += 1;
        }

        let corners = facet.vertices.map(|v| self.points.weld(v));
        self.corners.push(corners);
        self.normals.push(normal);
        id
    }

    /// Number of facets added so far.
    pub fn num_facets(&self) -> usize {
        self.corners.len()
    }

    /// Build the edge table, classify every edge, and return the mesh.
    pub fn finish(self) -> Mesh {
        if self.report.fixed_normals > 0 {
            warn!(
                "fixed {} of {} facet normals",
                self.report.fixed_normals,
                self.corners.len()
            );
        }

        let (edges, triangle_edges) = build_edges(&self.corners);
        let triangles = self
            .corners
            .iter()
            .zip(&self.normals)
            .zip(triangle_edges)
            .map(|((&points, &normal), edges)| Triangle {
                points,
                edges,
                normal,
            })
            .collect();

        let mut mesh = Mesh {
            header: self.header,
            points: self.points,
            triangles,
            edges,
            report: self.report,
        };
        classify_edges(&mut mesh);

        info!(
            "welded {} triangles into {} points and {} edges",
            mesh.num_triangles(),
            mesh.num_points(),
            mesh.num_edges()
        );
        mesh
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}
