//! File I/O.
//!
//! | Format | Module | Read | Write | Notes |
//! |--------|--------|------|-------|-------|
//! | STL | [`stl`] | ✓ | ✓ | Binary and ASCII; writing dumps the welded mesh |
//! | LDraw | [`ldraw`] | ✗ | ✓ | Part files (`.dat`) |
//!
//! Text output formats numbers with [`G`], which matches C's `%g`.

pub mod ldraw;
mod number;
pub mod stl;

pub use number::G;
