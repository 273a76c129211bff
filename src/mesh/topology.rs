//! Edge-triangle adjacency.
//!
//! Every triangle contributes three directed edges in winding order: local
//! edge `j` runs from `points[j]` to `points[(j + 1) % 3]`. Directed edges
//! are folded into undirected [`Edge`] records:
//!
//! - The first triangle to use a point pair creates the record and fixes its
//!   orientation as `(p0, p1)`. It occupies slot 0.
//! - A later triangle walking the edge the other way, `(p1, p0)`, is the
//!   well-formed neighbour and fills slot 1.
//! - A later triangle walking it the same way, or a third triangle on either
//!   side, turns the affected slot into [`Slot::Ambiguous`].
//!
//! Each slot also records the incident triangle's apex (the vertex not on
//! the edge), which gives the fold direction and the fourth corner when two
//! triangles are merged into a quad.

use std::collections::HashMap;

use nalgebra::Vector3;

use super::index::{EdgeId, PointId, TriangleId};

/// Occupancy of one side of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// No triangle registered on this side.
    Unset,
    /// Exactly one triangle registered on this side.
    Triangle(TriangleId),
    /// More than one triangle claimed this side.
    Ambiguous,
}

impl Slot {
    /// The triangle in this slot, if it holds exactly one.
    #[inline]
    pub fn triangle(self) -> Option<TriangleId> {
        match self {
            Slot::Triangle(t) => Some(t),
            _ => None,
        }
    }

    fn claim(self, t: TriangleId) -> Slot {
        match self {
            Slot::Unset => Slot::Triangle(t),
            _ => Slot::Ambiguous,
        }
    }
}

/// How many triangles meet at an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incidence {
    /// No triangle on either side.
    Unresolved,
    /// One triangle; the edge is on a boundary or hole.
    Single(TriangleId),
    /// One triangle on each side, in slot order.
    Pair(TriangleId, TriangleId),
    /// More than two triangles, or two with the same orientation.
    NonManifold,
}

/// Classification of an edge once adjacency is complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fold {
    /// Signed angle in degrees between the two incident triangles.
    /// Positive for convex folds, negative for concave ones.
    Dihedral(f32),
    /// Only one incident triangle.
    Open,
    /// Ambiguous incidence.
    NonManifold,
}

impl Fold {
    /// The numeric angle used by the classic converter: the dihedral angle,
    /// 360 for open edges, or 1000 for non-manifold ones.
    pub fn degrees(self) -> f32 {
        match self {
            Fold::Dihedral(a) => a,
            Fold::Open => 360.0,
            Fold::NonManifold => 1000.0,
        }
    }

    /// Whether the fold is flat within `tolerance` degrees.
    #[inline]
    pub fn is_flat(self, tolerance: f32) -> bool {
        matches!(self, Fold::Dihedral(a) if a.abs() <= tolerance)
    }
}

/// An undirected edge between two welded points.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Endpoints in the orientation of the first registering triangle.
    pub points: [PointId; 2],
    /// Incident triangle walking `p0 -> p1` (slot 0) and `p1 -> p0` (slot 1).
    pub slots: [Slot; 2],
    /// Apex of the most recent triangle registered in each slot.
    pub opposite: [Option<PointId>; 2],
    /// Fold classification; [`Fold::Open`] until classified.
    pub fold: Fold,
}

impl Edge {
    fn new(p0: PointId, p1: PointId, apex: PointId, t: TriangleId) -> Self {
        Self {
            points: [p0, p1],
            slots: [Slot::Triangle(t), Slot::Unset],
            opposite: [Some(apex), None],
            fold: Fold::Open,
        }
    }

    /// Summarize the two slots.
    pub fn incidence(&self) -> Incidence {
        match self.slots {
            [Slot::Ambiguous, _] | [_, Slot::Ambiguous] => Incidence::NonManifold,
            [Slot::Triangle(a), Slot::Triangle(b)] => Incidence::Pair(a, b),
            [Slot::Triangle(t), Slot::Unset] | [Slot::Unset, Slot::Triangle(t)] => {
                Incidence::Single(t)
            }
            [Slot::Unset, Slot::Unset] => Incidence::Unresolved,
        }
    }

    /// For a manifold edge, the triangle across from `t` and its apex.
    ///
    /// Returns `None` if the edge is not shared by exactly two triangles or
    /// `t` is not one of them.
    pub fn across(&self, t: TriangleId) -> Option<(TriangleId, PointId)> {
        match self.incidence() {
            Incidence::Pair(a, b) if a == t => Some((b, self.opposite[1]?)),
            Incidence::Pair(a, b) if b == t => Some((a, self.opposite[0]?)),
            _ => None,
        }
    }
}

/// A triangle with welded corners, adjacent edges, and a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Corner points in input winding order.
    pub points: [PointId; 3],
    /// Edge `j` joins `points[j]` and `points[(j + 1) % 3]`.
    pub edges: [EdgeId; 3],
    /// Unit normal, or zero for a degenerate triangle.
    pub normal: Vector3<f32>,
}

/// Builder for the edge table.
///
/// Lookups are keyed by the stored `(p0, p1)` orientation; a query checks
/// the forward key first and then the reversed one.
#[derive(Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    lookup: HashMap<(PointId, PointId), EdgeId>,
}

impl EdgeTable {
    /// Create a table sized for `triangles` triangles (three edges each).
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            edges: Vec::with_capacity(3 * triangles),
            lookup: HashMap::with_capacity(3 * triangles),
        }
    }

    /// Register the directed edge `p0 -> p1` of triangle `t`, whose third
    /// vertex is `apex`, and return the shared edge record's index.
    pub fn register_edge(
        &mut self,
        p0: PointId,
        p1: PointId,
        apex: PointId,
        t: TriangleId,
    ) -> EdgeId {
        if let Some(&id) = self.lookup.get(&(p0, p1)) {
            let edge = &mut self.edges[id.index()];
            edge.slots[0] = edge.slots[0].claim(t);
            edge.opposite[0] = Some(apex);
            return id;
        }
        if let Some(&id) = self.lookup.get(&(p1, p0)) {
            let edge = &mut self.edges[id.index()];
            edge.slots[1] = edge.slots[1].claim(t);
            edge.opposite[1] = Some(apex);
            return id;
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new(p0, p1, apex, t));
        self.lookup.insert((p0, p1), id);
        id
    }

    /// Register all three edges of triangle `t` in winding order.
    pub fn register_triangle(&mut self, t: TriangleId, points: &[PointId; 3]) -> [EdgeId; 3] {
        std::array::from_fn(|j| {
            self.register_edge(points[j], points[(j + 1) % 3], points[(j + 2) % 3], t)
        })
    }

    /// Number of edges registered so far.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge has been registered.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Finish building and return the edges in registration order.
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

/// Build the edge table for a list of triangle corners.
///
/// Returns the edges and, per triangle, the edge index of each local edge.
/// The result replaces any previous table; it cannot be extended later.
pub fn build_edges(corners: &[[PointId; 3]]) -> (Vec<Edge>, Vec<[EdgeId; 3]>) {
    let mut table = EdgeTable::with_capacity(corners.len());
    let triangle_edges = corners
        .iter()
        .enumerate()
        .map(|(i, pts)| table.register_triangle(TriangleId::new(i), pts))
        .collect();
    (table.into_edges(), triangle_edges)
}
