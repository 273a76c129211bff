//! Core mesh data structures.
//!
//! This module turns an STL triangle soup into an indexed mesh with explicit
//! edge adjacency.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], which holds three index-addressed tables:
//! - welded points ([`PointStore`], identified by [`PointId`])
//! - undirected edges ([`Edge`], identified by [`EdgeId`])
//! - triangles ([`Triangle`], identified by [`TriangleId`])
//!
//! Triangles name their edges and edges name their triangles, always through
//! indices. Slots that do not hold exactly one triangle are expressed with
//! [`Slot`] rather than sentinel numbers, and an edge's classification is a
//! [`Fold`].
//!
//! # Construction
//!
//! ```
//! use nalgebra::Point3;
//! use stl2ldraw::mesh::{Facet, Fold, MeshBuilder};
//!
//! let mut builder = MeshBuilder::new();
//! builder.add_facet(&Facet::from_vertices(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ));
//! let mesh = builder.finish();
//!
//! assert_eq!(mesh.num_edges(), 3);
//! assert!(mesh.edges().iter().all(|e| e.fold == Fold::Open));
//! ```

mod builder;
mod index;
mod points;
mod topology;
mod welded;

pub use builder::{Facet, MeshBuilder, DEFAULT_NORMAL_TOLERANCE};
pub use index::{EdgeId, PointId, TriangleId};
pub use points::{PointStore, DEFAULT_WELD_TOLERANCE};
pub use topology::{build_edges, Edge, EdgeTable, Fold, Incidence, Slot, Triangle};
pub use welded::{Mesh, MeshReport};
