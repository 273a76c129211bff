//! STL (stereolithography) format support.
//!
//! Reading keeps what the converter needs and nothing more: the header text
//! and the facets in file order, each with its stored normal. Vertices are
//! not deduplicated here; welding happens in [`MeshBuilder`].
//!
//! # Format Detection
//!
//! A file is binary exactly when its size is `84 + 50 * n`, where `n` is the
//! little-endian facet count stored after the 80-byte header. Anything else
//! is parsed as ASCII. Sniffing on the `solid` prefix is unreliable because
//! many binary exporters put that word in the header.
//!
//! # Writing
//!
//! The welded mesh can be written back out, which is handy for checking
//! what the welding and normal repair did. Binary output goes through
//! `stl_io`; ASCII output keeps the original header line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use nalgebra::{Point3, Vector3};

use super::number::G;
use crate::error::{ConvertError, Result};
use crate::mesh::{Facet, Mesh, MeshBuilder};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one facet record in binary STL (normal + 3 vertices + attribute).
const FACET_SIZE: usize = 50;

/// Longest header kept, in bytes.
const MAX_HEADER: usize = 80;

/// The contents of an STL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StlFile {
    /// Printable header text, at most 80 characters.
    pub header: String,
    /// Facets in file order.
    pub facets: Vec<Facet>,
}

impl StlFile {
    /// Weld the facets into a mesh builder sized for this file.
    pub fn to_builder(&self) -> MeshBuilder {
        MeshBuilder::with_capacity(self.facets.len()).with_header(self.header.clone())
    }
}

/// Load an STL file, binary or ASCII.
///
/// # Example
///
/// ```no_run
/// use stl2ldraw::io::stl;
///
/// let file = stl::load("part.stl").unwrap();
/// println!("{}: {} facets", file.header, file.facets.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<StlFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConvertError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConvertError::Io(e)
        }
    })?;
    let stl = parse(&bytes)?;
    info!(
        "read {} facets from {} ({})",
        stl.facets.len(),
        path.display(),
        if is_binary(&bytes) { "binary" } else { "ASCII" }
    );
    Ok(stl)
}

/// Parse STL data held in memory.
pub fn parse(bytes: &[u8]) -> Result<StlFile> {
    if is_binary(bytes) {
        parse_binary(bytes)
    } else {
        parse_ascii(bytes)
    }
}

/// Whether `bytes` has exactly the size of a binary STL with the facet
/// count stored in its header.
pub fn is_binary(bytes: &[u8]) -> bool {
    match facet_count(bytes) {
        Some(n) => {
            bytes.len() as u64 == (HEADER_SIZE + 4) as u64 + FACET_SIZE as u64 * u64::from(n)
        }
        None => false,
    }
}

fn facet_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Turn raw header bytes into printable text: stop at the first NUL, keep
/// at most 80 bytes, and replace anything non-printable with a space.
fn sanitize_header(raw: &[u8]) -> String {
    raw.iter()
        .take(MAX_HEADER)
        .take_while(|&&b| b != 0)
        .map(|&b| if b == b' ' || b.is_ascii_graphic() { b as char } else { ' ' })
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn parse_binary(bytes: &[u8]) -> Result<StlFile> {
    let header = sanitize_header(&bytes[..HEADER_SIZE]);
    let facets = bytes[HEADER_SIZE + 4..]
        .chunks_exact(FACET_SIZE)
        .enumerate()
        .map(|(index, record)| {
            let v = |k: usize| read_vec3(&record[12 * k..12 * k + 12]);
            let normal = v(0);
            let vertices = [v(1), v(2), v(3)];
            if normal.iter().chain(vertices.iter().flatten()).all(|c| c.is_finite()) {
                Ok(Facet::new(normal, vertices.map(Point3::from)))
            } else {
                Err(ConvertError::NonFiniteFacet { index })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(StlFile { header, facets })
}

/// Read three little-endian f32s.
fn read_vec3(buf: &[u8]) -> Vector3<f32> {
    let c = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
    Vector3::new(c(0), c(4), c(8))
}

/// Whitespace-separated words of an ASCII STL body.
struct Words<I> {
    words: I,
    facet: usize,
}

impl<'a, I: Iterator<Item = &'a [u8]>> Words<I> {
    fn next_word(&mut self) -> Result<&'a [u8]> {
        self.words
            .next()
            .ok_or(ConvertError::UnexpectedEof { facet: self.facet })
    }

    fn expect(&mut self, keyword: &'static str, context: &'static str) -> Result<()> {
        let word = self.next_word()?;
        if word.eq_ignore_ascii_case(keyword.as_bytes()) {
            Ok(())
        } else {
            Err(ConvertError::MissingKeyword {
                expected: context,
                facet: self.facet,
            })
        }
    }

    fn number(&mut self) -> Result<f32> {
        let word = self.next_word()?;
        std::str::from_utf8(word)
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConvertError::InvalidNumber {
                token: String::from_utf8_lossy(word).into_owned(),
                facet: self.facet,
            })
    }

    fn vec3(&mut self) -> Result<Vector3<f32>> {
        Ok(Vector3::new(self.number()?, self.number()?, self.number()?))
    }
}

fn parse_ascii(bytes: &[u8]) -> Result<StlFile> {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let rest = &bytes[start..];
    let after_solid = match rest.get(..5) {
        Some(word) if word.eq_ignore_ascii_case(b"solid") => &rest[5..],
        _ => return Err(ConvertError::MissingSolid),
    };
    let line_end = after_solid
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(after_solid.len());
    let header_line = &after_solid[..line_end];
    let header = sanitize_header(header_line.strip_prefix(b" ").unwrap_or(header_line));

    let mut words = Words {
        words: after_solid[line_end..]
            .split(|b| b.is_ascii_whitespace())
            .filter(|w| !w.is_empty()),
        facet: 0,
    };
    let mut facets = Vec::with_capacity(bytes.len() / 256);
    loop {
        words.facet = facets.len();
        let word = words.next_word()?;
        if word.eq_ignore_ascii_case(b"endsolid") {
            break;
        }
        if !word.eq_ignore_ascii_case(b"facet") {
            return Err(ConvertError::MissingKeyword {
                expected: "facet normal",
                facet: facets.len(),
            });
        }
        words.expect("normal", "facet normal")?;
        let normal = words.vec3()?;
        words.expect("outer", "outer loop")?;
        words.expect("loop", "outer loop")?;
        let mut vertices = [Point3::origin(); 3];
        for v in &mut vertices {
            words.expect("vertex", "vertex")?;
            *v = Point3::from(words.vec3()?);
        }
        words.expect("endloop", "endloop")?;
        words.expect("endfacet", "endfacet")?;
        facets.push(Facet::new(normal, vertices));
    }

    Ok(StlFile { header, facets })
}

/// Save the welded mesh as a binary STL file with recomputed normals.
pub fn save_binary<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = mesh
        .triangle_ids()
        .map(|t| {
            let n = mesh.triangle(t).normal;
            let [p0, p1, p2] = mesh.triangle_positions(t);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x, n.y, n.z]),
                vertices: [
                    stl_io::Vertex::new([p0.x, p0.y, p0.z]),
                    stl_io::Vertex::new([p1.x, p1.y, p1.z]),
                    stl_io::Vertex::new([p2.x, p2.y, p2.z]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| ConvertError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;

    Ok(())
}

/// Save the welded mesh as an ASCII STL file with recomputed normals.
pub fn save_ascii<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ascii(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the welded mesh as ASCII STL.
pub fn write_ascii<W: Write>(mesh: &Mesh, mut writer: W) -> Result<()> {
    let header: String = mesh
        .header()
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '_' })
        .collect();

    writeln!(writer, "solid {}", header)?;
    for t in mesh.triangle_ids() {
        let n = mesh.triangle(t).normal;
        write!(writer, "  facet normal")?;
        write_point(&mut writer, &n.into())?;
        write!(writer, "\n    outer loop")?;
        for p in mesh.triangle_positions(t) {
            write!(writer, "\n      vertex")?;
            write_point(&mut writer, &p)?;
        }
        writeln!(writer, "\n    endloop\n  endfacet")?;
    }
    writeln!(writer, "endsolid {}", header)?;
    Ok(())
}

fn write_point<W: Write>(writer: &mut W, p: &Point3<f32>) -> std::io::Result<()> {
    write!(
        writer,
        " {} {} {}",
        G(f64::from(p.x)),
        G(f64::from(p.y)),
        G(f64::from(p.z))
    )
}
