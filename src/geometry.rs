//! Vector math shared by the mesh stages.
//!
//! STL stores single-precision coordinates, so the whole pipeline works on
//! `f32` points and vectors. Conversion to `f64` happens only when the
//! LDraw output is formatted.

use nalgebra::{Point3, Vector3};

/// Threshold on the product of turn dot products in [`is_convex_quad`].
pub const CONVEXITY_EPSILON: f32 = 1e-7;

/// Unit normal of the triangle `v0 v1 v2` (counter-clockwise winding).
///
/// Returns `None` for a zero-area triangle.
///
/// # Example
/// ```
/// use nalgebra::Point3;
/// use stl2ldraw::geometry::facet_normal;
///
/// let n = facet_normal(
///     &Point3::new(0.0, 0.0, 0.0),
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
/// )
/// .unwrap();
/// assert_eq!(n.z, 1.0);
/// ```
pub fn facet_normal(
    v0: &Point3<f32>,
    v1: &Point3<f32>,
    v2: &Point3<f32>,
) -> Option<Vector3<f32>> {
    let n = (v1 - v0).cross(&(v2 - v0));
    let m = n.norm();
    if m > 0.0 {
        Some(n / m)
    } else {
        None
    }
}

/// Signed fold angle in degrees across an edge shared by triangles A and B.
///
/// The magnitude is the angle between the two normals. `apex_a` and `apex_b`
/// are the vertices of A and B that are not on the shared edge. The angle is
/// negative when B's apex lies on the front side of A (a concave fold) and
/// positive otherwise.
pub fn fold_angle(
    normal_a: &Vector3<f32>,
    normal_b: &Vector3<f32>,
    apex_a: &Point3<f32>,
    apex_b: &Point3<f32>,
) -> f32 {
    // angle() clamps the cosine into [-1, 1] and yields 0 for a zero vector.
    let magnitude = normal_a.angle(normal_b).to_degrees();
    if normal_a.dot(&(apex_b - apex_a)) > 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Turning-sense test for the closed loop `corners[0..4]`.
///
/// Each corner's turn is the cross product of its incoming and outgoing
/// sides. The loop passes when `dot(c0, c1) * dot(c2, c3)` exceeds
/// [`CONVEXITY_EPSILON`], so a single reflex corner rejects it.
pub fn is_convex_quad(corners: &[Point3<f32>; 4]) -> bool {
    let sides: [Vector3<f32>; 4] = std::array::from_fn(|i| corners[(i + 1) % 4] - corners[i]);
    let turns: [Vector3<f32>; 4] = std::array::from_fn(|i| sides[i].cross(&sides[(i + 1) % 4]));
    turns[0].dot(&turns[1]) * turns[2].dot(&turns[3]) > CONVEXITY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_normal_unit() {
        let n = facet_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(3.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, -2.0),
        )
        .unwrap();
        assert!((n - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_facet_normal_degenerate() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(facet_normal(&p, &p, &Point3::new(4.0, 5.0, 6.0)).is_none());
        // Collinear points also have zero area
        assert!(facet_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
        )
        .is_none());
    }

    #[test]
    fn test_fold_angle_sign() {
        // Shared edge along the x axis. A lies in z=0 with apex at +y.
        let na = Vector3::new(0.0, 0.0, 1.0);
        let apex_a = Point3::new(0.0, 1.0, 0.0);

        // B bends down behind A: convex ridge.
        let nb = Vector3::new(0.0, -1.0, 0.0);
        let apex_b = Point3::new(0.0, 0.0, -1.0);
        let convex = fold_angle(&na, &nb, &apex_a, &apex_b);
        assert!((convex - 90.0).abs() < 1e-4);

        // B bends up in front of A: concave valley.
        let nb = Vector3::new(0.0, 1.0, 0.0);
        let apex_b = Point3::new(0.0, 0.0, 1.0);
        let concave = fold_angle(&na, &nb, &apex_a, &apex_b);
        assert!((concave + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_fold_angle_clamped() {
        // Slightly over-length normals must not produce NaN.
        let n = Vector3::new(0.0, 0.0, 1.000_000_1);
        let a = fold_angle(&n, &n, &Point3::origin(), &Point3::new(1.0, 0.0, 0.0));
        assert!(a.is_finite());
        assert!(a.abs() < 0.1);
    }

    #[test]
    fn test_fold_angle_zero_normal() {
        let a = fold_angle(
            &Vector3::zeros(),
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(a, 0.0);
    }

    #[test]
    fn test_convex_square() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(is_convex_quad(&square));
    }

    #[test]
    fn test_dart_rejected() {
        // Corner 3 is pushed inside, making a reflex angle there.
        let dart = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(1.5, 0.5, 0.0),
        ];
        assert!(!is_convex_quad(&dart));
    }

    #[test]
    fn test_collinear_corner_rejected() {
        // A zero turn gives a zero product, which is not above the threshold.
        let flat = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert!(!is_convex_quad(&flat));
    }
}
