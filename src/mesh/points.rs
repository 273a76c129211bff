//! Point welding.
//!
//! STL repeats every vertex once per facet that uses it. [`PointStore`]
//! collapses those copies into a single indexed point table so that
//! adjacency can be found by comparing indices.
//!
//! Two coordinates are the same point when every axis differs by strictly
//! less than the tolerance. When several stored points qualify, the one that
//! was stored first wins. Lookups go through a uniform grid whose cell size
//! equals the tolerance, so only the 27 cells around a query can hold a
//! match; this gives the same answer as scanning the whole table in order.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::PointId;

/// Default welding tolerance in source units.
pub const DEFAULT_WELD_TOLERANCE: f32 = 1e-4;

type Cell = (i64, i64, i64);

/// An append-only table of welded points.
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<Point3<f32>>,
    tolerance: f32,
    grid: HashMap<Cell, Vec<PointId>>,
}

impl PointStore {
    /// Create an empty store with the given tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self::with_capacity(tolerance, 0)
    }

    /// Create an empty store with room for `capacity` points.
    pub fn with_capacity(tolerance: f32, capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            tolerance,
            grid: HashMap::with_capacity(capacity),
        }
    }

    /// Return the index of the first stored point within tolerance of `p`,
    /// storing `p` as a new point if there is none.
    ///
    /// # Example
    /// ```
    /// use nalgebra::Point3;
    /// use stl2ldraw::mesh::PointStore;
    ///
    /// let mut store = PointStore::new(1e-4);
    /// let a = store.weld(Point3::new(1.0, 2.0, 3.0));
    /// let b = store.weld(Point3::new(1.00005, 2.0, 3.0));
    /// assert_eq!(a, b);
    /// assert_eq!(store.len(), 1);
    /// ```
    pub fn weld(&mut self, p: Point3<f32>) -> PointId {
        let cell = self.cell_of(&p);
        if let Some(found) = self.find_near(&p, cell) {
            return found;
        }

        let id = PointId::new(self.points.len());
        self.points.push(p);
        self.grid.entry(cell).or_default().push(id);
        id
    }

    fn find_near(&self, p: &Point3<f32>, cell: Cell) -> Option<PointId> {
        let mut best: Option<PointId> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = (
                        cell.0.saturating_add(dx),
                        cell.1.saturating_add(dy),
                        cell.2.saturating_add(dz),
                    );
                    let Some(bucket) = self.grid.get(&key) else {
                        continue;
                    };
                    // Buckets are filled in insertion order, so the first hit
                    // is the oldest candidate in this cell.
                    if let Some(&id) = bucket.iter().find(|&&id| self.is_near(id, p)) {
                        best = Some(best.map_or(id, |b| b.min(id)));
                    }
                }
            }
        }
        best
    }

    fn is_near(&self, id: PointId, p: &Point3<f32>) -> bool {
        let q = &self.points[id.index()];
        (q.x - p.x).abs() < self.tolerance
            && (q.y - p.y).abs() < self.tolerance
            && (q.z - p.z).abs() < self.tolerance
    }

    fn cell_of(&self, p: &Point3<f32>) -> Cell {
        let t = f64::from(self.tolerance);
        // Saturating float-to-int casts keep huge coordinates in the end cells.
        (
            (f64::from(p.x) / t).floor() as i64,
            (f64::from(p.y) / t).floor() as i64,
            (f64::from(p.z) / t).floor() as i64,
        )
    }

    /// Position of a stored point.
    #[inline]
    pub fn position(&self, id: PointId) -> &Point3<f32> {
        &self.points[id.index()]
    }

    /// All stored points in index order.
    #[inline]
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.points
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The welding tolerance.
    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new(DEFAULT_WELD_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weld_same_coordinate() {
        let mut store = PointStore::default();
        let p = Point3::new(0.25, -7.5, 12.0);
        let a = store.weld(p);
        let b = store.weld(p);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_weld_within_tolerance() {
        let mut store = PointStore::default();
        let a = store.weld(Point3::new(1.0, 1.0, 1.0));
        let b = store.weld(Point3::new(1.00004, 0.99996, 1.00009));
        assert_eq!(a, b);
        assert_eq!(store.position(a), &Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_weld_outside_tolerance_on_one_axis() {
        let mut store = PointStore::default();
        let a = store.weld(Point3::new(0.0, 0.0, 0.0));
        let b = store.weld(Point3::new(0.0, 0.0, 0.0002));
        let c = store.weld(Point3::new(0.0, 0.0003, 0.0));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        let mut store = PointStore::new(1.0);
        let a = store.weld(Point3::new(0.9, 0.0, 0.0));
        let b = store.weld(Point3::new(1.1, 0.0, 0.0));
        assert_eq!(a, b);
        let c = store.weld(Point3::new(-0.5, -0.5, -0.5));
        assert_ne!(a, c);
    }

    #[test]
    fn test_weld_prefers_first_stored() {
        let mut store = PointStore::new(1.0);
        let a = store.weld(Point3::new(0.0, 0.0, 0.0));
        let b = store.weld(Point3::new(1.5, 0.0, 0.0));
        assert_ne!(a, b);
        // Within tolerance of both; the older point wins.
        let c = store.weld(Point3::new(0.8, 0.0, 0.0));
        assert_eq!(c, a);
        // Only near the second point.
        let d = store.weld(Point3::new(2.0, 0.0, 0.0));
        assert_eq!(d, b);
    }

    #[test]
    fn test_indices_are_stable() {
        let mut store = PointStore::default();
        let ids: Vec<PointId> = (0..10)
            .map(|i| store.weld(Point3::new(i as f32, 0.0, 0.0)))
            .collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(store.weld(Point3::new(i as f32, 0.0, 0.0)), *id);
        }
        assert_eq!(store.len(), 10);
    }
}
