//! LDraw part output.
//!
//! A part file is a flat list of line records, each starting with a line
//! type and (except comments) a color code:
//!
//! | Type | Record | Points |
//! |------|--------|--------|
//! | 0 | comment / meta command | none |
//! | 2 | edge line | 2 |
//! | 3 | triangle | 3 |
//! | 4 | quad | 4 |
//! | 5 | optional line | 2 endpoints + 2 control points |
//!
//! LDraw is Y-down with a different handedness from STL, so every point
//! is remapped `(x, y, z) -> (s*x, -s*z, s*y)` with the uniform scale `s`.

use std::fmt;
use std::path::Path;

use nalgebra::Point3;

use super::number::G;
use crate::algo::quad::{polygons, Polygon};
use crate::convert::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::mesh::{Fold, Mesh, PointId};

/// Longest header comment, in characters.
const MAX_HEADER: usize = 80;

/// One line of an LDraw file.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// `0 <text>`
    Comment(String),
    /// `2 <color> <p0> <p1>`
    Line {
        /// Color code.
        color: u32,
        /// Endpoints.
        points: [Point3<f64>; 2],
    },
    /// `3 <color> <p0> <p1> <p2>`
    Triangle {
        /// Color code.
        color: u32,
        /// Corners, counter-clockwise seen from outside.
        points: [Point3<f64>; 3],
    },
    /// `4 <color> <p0> <p1> <p2> <p3>`
    Quad {
        /// Color code.
        color: u32,
        /// Corners, counter-clockwise seen from outside.
        points: [Point3<f64>; 4],
    },
    /// `5 <color> <p0> <p1> <c0> <c1>`
    ///
    /// Drawn only when `c0` and `c1` lie on the same side of the line
    /// through `p0` and `p1` as seen from the camera.
    OptionalLine {
        /// Color code.
        color: u32,
        /// Endpoints followed by the two control points.
        points: [Point3<f64>; 4],
    },
}

impl Record {
    /// The LDraw line type number.
    pub fn line_type(&self) -> u8 {
        match self {
            Record::Comment(_) => 0,
            Record::Line { .. } => 2,
            Record::Triangle { .. } => 3,
            Record::Quad { .. } => 4,
            Record::OptionalLine { .. } => 5,
        }
    }

    /// Points of the record in output order.
    pub fn points(&self) -> &[Point3<f64>] {
        match self {
            Record::Comment(_) => &[],
            Record::Line { points, .. } => points,
            Record::Triangle { points, .. } => points,
            Record::Quad { points, .. } | Record::OptionalLine { points, .. } => points,
        }
    }

    /// The color code, if the record has one.
    pub fn color(&self) -> Option<u32> {
        match *self {
            Record::Comment(_) => None,
            Record::Line { color, .. }
            | Record::Triangle { color, .. }
            | Record::Quad { color, .. }
            | Record::OptionalLine { color, .. } => Some(color),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Record::Comment(text) = self {
            return write!(f, "0 {}", text);
        }
        write!(f, "{}", self.line_type())?;
        if let Some(color) = self.color() {
            write!(f, " {}", color)?;
        }
        for p in self.points() {
            write!(f, " {} {} {}", G(p.x), G(p.y), G(p.z))?;
        }
        Ok(())
    }
}

/// A complete LDraw part, one record per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    records: Vec<Record>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Count records of the given line type.
    pub fn count(&self, line_type: u8) -> usize {
        self.records
            .iter()
            .filter(|r| r.line_type() == line_type)
            .count()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// Map an STL point into LDraw space.
///
/// # Example
/// ```
/// use nalgebra::Point3;
/// use stl2ldraw::io::ldraw::ldraw_point;
///
/// let p = ldraw_point(&Point3::new(1.0, 2.0, 3.0), 2.5);
/// assert_eq!(p, Point3::new(2.5, -7.5, 5.0));
/// ```
pub fn ldraw_point(p: &Point3<f32>, scale: f64) -> Point3<f64> {
    Point3::new(
        f64::from(p.x) * scale,
        -f64::from(p.z) * scale,
        f64::from(p.y) * scale,
    )
}

/// Printable header comment: at most 80 characters, control characters
/// blanked.
fn header_comment(header: &str) -> String {
    header
        .chars()
        .take(MAX_HEADER)
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { ' ' })
        .collect()
}

/// Build the LDraw document for a classified mesh.
///
/// Polygons come first, in triangle order with coplanar pairs merged into
/// quads when enabled. Edge records follow in edge table order:
/// - open edges and folds with `|angle| >= hard_edge_angle` become edge
///   lines,
/// - convex folds from `optional_edge_min` up become optional lines whose
///   control points are the apexes of the two triangles,
/// - flat folds, shallow concave folds, and non-manifold edges are skipped.
pub fn emit(mesh: &Mesh, options: &ConvertOptions) -> Document {
    let map = |p: PointId| ldraw_point(mesh.position(p), options.scale);
    let mut doc = Document::new();

    doc.push(Record::Comment(header_comment(mesh.header())));
    doc.push(Record::Comment("BFC CERTIFY CCW".to_string()));

    for polygon in polygons(mesh, options.merge_quads, options.coplanar_tolerance) {
        doc.push(match polygon {
            Polygon::Triangle(points) => Record::Triangle {
                color: options.face_color,
                points: points.map(map),
            },
            Polygon::Quad(points) => Record::Quad {
                color: options.face_color,
                points: points.map(map),
            },
        });
    }

    for edge in mesh.edges() {
        let [p0, p1] = edge.points;
        let record = match edge.fold {
            Fold::NonManifold => None,
            Fold::Open => Some(Record::Line {
                color: options.edge_color,
                points: [map(p0), map(p1)],
            }),
            Fold::Dihedral(angle) if angle.abs() >= options.hard_edge_angle => {
                Some(Record::Line {
                    color: options.edge_color,
                    points: [map(p0), map(p1)],
                })
            }
            Fold::Dihedral(angle) if angle >= options.optional_edge_min => {
                match edge.opposite {
                    [Some(c0), Some(c1)] => Some(Record::OptionalLine {
                        color: options.edge_color,
                        points: [map(p0), map(p1), map(c0), map(c1)],
                    }),
                    _ => None,
                }
            }
            Fold::Dihedral(_) => None,
        };
        if let Some(record) = record {
            doc.push(record);
        }
    }

    doc
}

/// Write a document to `path`.
///
/// The file is written in one piece from the rendered text.
pub fn save<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, document.to_string()).map_err(|e| ConvertError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
