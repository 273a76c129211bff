//! Algorithms over a welded [`Mesh`](crate::mesh::Mesh).
//!
//! - **Classification**: signed dihedral fold per edge, open and
//!   non-manifold detection
//! - **Quad merging**: greedy pairing of coplanar triangles into convex quads

pub mod classify;
pub mod quad;
