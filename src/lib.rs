//! # stl2ldraw
//!
//! Convert STL triangle meshes into LDraw part files.
//!
//! STL stores every triangle on its own. LDraw parts want shared geometry:
//! edge lines where the surface folds sharply, optional lines where it
//! bends gently, and as few polygons as possible. Getting there takes a
//! small topology pipeline:
//!
//! 1. **Welding**: vertices closer than a tolerance collapse into one point.
//! 2. **Adjacency**: each undirected edge learns the triangles on either
//!    side, with open and non-manifold edges detected along the way.
//! 3. **Classification**: each shared edge gets a signed fold angle.
//! 4. **Emission**: coplanar convex pairs become quads; folds become edge
//!    or optional lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stl2ldraw::prelude::*;
//!
//! let mesh = convert_file("brick.stl", "brick.dat", &ConvertOptions::default()).unwrap();
//! println!("Points: {}", mesh.num_points());
//! println!("Open edges: {}", mesh.report().open_edges);
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use stl2ldraw::prelude::*;
//! use stl2ldraw::io::ldraw;
//! use nalgebra::Point3;
//!
//! // A unit square split along its diagonal.
//! let mut builder = MeshBuilder::new().with_header("square");
//! let (a, b, c, d) = (
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! );
//! builder.add_facet(&Facet::from_vertices(a, b, c));
//! builder.add_facet(&Facet::from_vertices(a, c, d));
//! let mesh = builder.finish();
//!
//! assert_eq!(mesh.num_points(), 4);
//! assert_eq!(mesh.report().open_edges, 4);
//!
//! let doc = ldraw::emit(&mesh, &ConvertOptions::default());
//! assert_eq!(doc.count(4), 1);
//! assert_eq!(doc.count(2), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;

pub use convert::{convert, convert_file, ConvertOptions};

/// Prelude module for convenient imports.
///
/// ```
/// use stl2ldraw::prelude::*;
/// ```
pub mod prelude {
    pub use crate::convert::{build_mesh, convert, convert_file, ConvertOptions};
    pub use crate::error::{ConvertError, Result};
    pub use crate::mesh::{
        Edge, EdgeId, Facet, Fold, Mesh, MeshBuilder, MeshReport, PointId, Triangle, TriangleId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
