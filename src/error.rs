//! Error types for stl2ldraw.
//!
//! Only fatal conditions live here. Geometric anomalies (degenerate facets,
//! open or non-manifold edges) are logged and counted in
//! [`MeshReport`](crate::mesh::MeshReport) instead, and never abort a
//! conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that abort a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An ASCII STL file does not open with a `solid` line.
    #[error("file must start with 'solid' line")]
    MissingSolid,

    /// An expected ASCII STL keyword was not found.
    #[error("'{expected}' missing in facet {facet}")]
    MissingKeyword {
        /// The keyword that was expected.
        expected: &'static str,
        /// Index of the facet being read.
        facet: usize,
    },

    /// A number in an ASCII STL file could not be parsed or is not finite.
    #[error("invalid number '{token}' in facet {facet}")]
    InvalidNumber {
        /// The offending token.
        token: String,
        /// Index of the facet being read.
        facet: usize,
    },

    /// A binary STL facet carries a non-finite component.
    #[error("triangle {index} has a non-finite component")]
    NonFiniteFacet {
        /// Index of the offending facet.
        index: usize,
    },

    /// An ASCII STL stream ended before `endsolid`.
    #[error("unexpected end of file in facet {facet}")]
    UnexpectedEof {
        /// Index of the facet being read.
        facet: usize,
    },

    /// Error saving output to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl ConvertError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        ConvertError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
