//! The STL to LDraw conversion pipeline.
//!
//! ```text
//! STL facets -> weld points -> build edges -> classify edges
//!            -> merge quads + emit polygons -> emit edge lines
//! ```
//!
//! A conversion either completes or fails on the first fatal read error.
//! The LDraw document is rendered in memory before anything is written, so
//! a failed conversion never leaves a partial output file behind.

use std::path::Path;

use log::info;

use crate::algo::quad::DEFAULT_COPLANAR_TOLERANCE;
use crate::error::{ConvertError, Result};
use crate::io::ldraw::{self, Document};
use crate::io::stl::{self, StlFile};
use crate::mesh::{Mesh, DEFAULT_NORMAL_TOLERANCE, DEFAULT_WELD_TOLERANCE};

/// Options for a conversion.
///
/// The defaults reproduce the classic converter's output.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Per-axis distance under which two vertices are welded.
    pub weld_tolerance: f32,

    /// Per-component difference over which a stored facet normal is
    /// reported as fixed.
    pub normal_tolerance: f32,

    /// Fold angle in degrees at or under which two triangles count as
    /// coplanar for quad merging.
    pub coplanar_tolerance: f32,

    /// Fold angle in degrees from which an edge is drawn as a hard line.
    pub hard_edge_angle: f32,

    /// Smallest convex fold angle in degrees drawn as an optional line.
    pub optional_edge_min: f32,

    /// Uniform scale applied with the LDraw axis remap.
    pub scale: f64,

    /// Whether coplanar triangle pairs are merged into quads.
    pub merge_quads: bool,

    /// Color code for polygons (16 is the inherited "current color").
    pub face_color: u32,

    /// Color code for edge and optional lines (24 is the edge color).
    pub edge_color: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            normal_tolerance: DEFAULT_NORMAL_TOLERANCE,
            coplanar_tolerance: DEFAULT_COPLANAR_TOLERANCE,
            hard_edge_angle: 25.0,
            optional_edge_min: 1e-7,
            scale: 2.5,
            merge_quads: true,
            face_color: 16,
            edge_color: 24,
        }
    }
}

impl ConvertOptions {
    /// Set the welding tolerance.
    pub fn with_weld_tolerance(mut self, tolerance: f32) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Set the hard edge angle in degrees.
    pub fn with_hard_edge_angle(mut self, degrees: f32) -> Self {
        self.hard_edge_angle = degrees;
        self
    }

    /// Set the output scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set whether coplanar pairs are merged into quads.
    pub fn with_merge_quads(mut self, merge: bool) -> Self {
        self.merge_quads = merge;
        self
    }

    /// Check that every tolerance and the scale are usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("weld_tolerance", self.weld_tolerance),
            ("normal_tolerance", self.normal_tolerance),
            ("coplanar_tolerance", self.coplanar_tolerance),
            ("hard_edge_angle", self.hard_edge_angle),
            ("optional_edge_min", self.optional_edge_min),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConvertError::invalid_param(
                    name,
                    value,
                    "must be finite and positive",
                ));
            }
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConvertError::invalid_param(
                "scale",
                self.scale,
                "must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Weld the facets of an STL file into a classified mesh.
pub fn build_mesh(stl: &StlFile, options: &ConvertOptions) -> Result<Mesh> {
    options.validate()?;
    let mut builder = stl
        .to_builder()
        .with_weld_tolerance(options.weld_tolerance)
        .with_normal_tolerance(options.normal_tolerance);
    for facet in &stl.facets {
        builder.add_facet(facet);
    }
    Ok(builder.finish())
}

/// Convert an in-memory STL file to an LDraw document.
pub fn convert(stl: &StlFile, options: &ConvertOptions) -> Result<(Mesh, Document)> {
    let mesh = build_mesh(stl, options)?;
    let document = ldraw::emit(&mesh, options);
    Ok((mesh, document))
}

/// Convert the STL file at `input` and write the LDraw part to `output`.
///
/// Returns the welded mesh so callers can inspect or dump it.
///
/// # Example
///
/// ```no_run
/// use stl2ldraw::{convert_file, ConvertOptions};
///
/// let mesh = convert_file("brick.stl", "brick.dat", &ConvertOptions::default()).unwrap();
/// println!("{} open edges", mesh.report().open_edges);
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &ConvertOptions,
) -> Result<Mesh> {
    let stl = stl::load(input)?;
    let (mesh, document) = convert(&stl, options)?;
    ldraw::save(&document, output.as_ref())?;
    info!(
        "wrote {} records to {}",
        document.records().len(),
        output.as_ref().display()
    );
    Ok(mesh)
}
