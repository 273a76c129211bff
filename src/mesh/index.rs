//! Index types for mesh tables.
//!
//! Points, edges, and triangles live in vector-backed arenas; the position in
//! the arena is the element's identity. These wrappers keep the three index
//! spaces from being mixed up. Triangles and edges refer to each other only
//! through these indices, so there is no cyclic ownership.

use std::fmt::{self, Debug};

/// A type-safe point index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PointId(u32);

/// A type-safe undirected edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit in 32 bits.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(PointId, "P");
impl_index_type!(EdgeId, "E");
impl_index_type!(TriangleId, "T");
