//! Edge classification.
//!
//! Every edge gets a [`Fold`] once adjacency is complete:
//! - an edge with ambiguous incidence is [`Fold::NonManifold`] and is never
//!   drawn or merged across,
//! - an edge with a single triangle is [`Fold::Open`] and is always drawn as
//!   a hard line,
//! - an edge shared by two triangles carries their signed dihedral angle.

use log::warn;

use crate::geometry::fold_angle;
use crate::mesh::{Edge, Fold, Incidence, Mesh};

/// Classify one edge of `mesh`.
pub fn classify_edge(mesh: &Mesh, edge: &Edge) -> Fold {
    match edge.incidence() {
        Incidence::NonManifold => Fold::NonManifold,
        Incidence::Single(_) | Incidence::Unresolved => Fold::Open,
        Incidence::Pair(a, b) => match edge.opposite {
            [Some(apex_a), Some(apex_b)] => Fold::Dihedral(fold_angle(
                &mesh.triangle(a).normal,
                &mesh.triangle(b).normal,
                mesh.position(apex_a),
                mesh.position(apex_b),
            )),
            _ => Fold::Open,
        },
    }
}

/// Classify every edge of `mesh` in place and record anomaly counts in its
/// report. Each open or non-manifold edge is logged.
pub fn classify_edges(mesh: &mut Mesh) {
    let folds: Vec<Fold> = mesh
        .edges
        .iter()
        .map(|edge| classify_edge(mesh, edge))
        .collect();

    mesh.report.open_edges = 0;
    mesh.report.non_manifold_edges = 0;
    for (i, (edge, fold)) in mesh.edges.iter_mut().zip(folds).enumerate() {
        match fold {
            Fold::NonManifold => {
                warn!("non-manifold edge {}", i);
                mesh.report.non_manifold_edges += 1;
            }
            Fold::Open => {
                warn!("open edge {}", i);
                mesh.report.open_edges += 1;
            }
            Fold::Dihedral(_) => {}
        }
        edge.fold = fold;
    }
}
