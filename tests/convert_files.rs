//! End-to-end conversions over files on disk.
//!
//! Inputs are written into a temporary directory, converted through the
//! public file API, and the LDraw output is read back as text.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use stl2ldraw::io::stl;
use stl2ldraw::prelude::*;
use tempfile::tempdir;

const CUBE_POINTS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

const CUBE_FACES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

/// Write the cube as binary STL with zero normals.
fn write_binary_cube(path: &Path) {
    let triangles: Vec<stl_io::Triangle> = CUBE_FACES
        .iter()
        .map(|f| stl_io::Triangle {
            normal: stl_io::Normal::new([0.0, 0.0, 0.0]),
            vertices: f.map(|i| stl_io::Vertex::new(CUBE_POINTS[i])),
        })
        .collect();
    let mut writer = BufWriter::new(File::create(path).unwrap());
    stl_io::write_stl(&mut writer, triangles.iter()).unwrap();
}

fn ascii_cube() -> String {
    let mut text = String::from("solid cube\n");
    for f in CUBE_FACES {
        text.push_str("  facet normal 0 0 0\n    outer loop\n");
        for i in f {
            let [x, y, z] = CUBE_POINTS[i];
            text.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid cube\n");
    text
}

fn count_lines(text: &str, line_type: &str) -> usize {
    text.lines()
        .filter(|l| l.split_whitespace().next() == Some(line_type))
        .count()
}

#[test]
fn test_binary_cube() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cube.stl");
    let output = dir.path().join("cube.dat");
    write_binary_cube(&input);

    let mesh = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
    assert_eq!(mesh.num_points(), 8);
    assert_eq!(mesh.num_edges(), 18);
    assert!(mesh.report().is_closed_manifold());
    assert_eq!(mesh.report().fixed_normals, 12);

    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("0 "));
    assert_eq!(lines.next(), Some("0 BFC CERTIFY CCW"));
    assert_eq!(count_lines(&text, "4"), 6);
    assert_eq!(count_lines(&text, "3"), 0);
    assert_eq!(count_lines(&text, "2"), 12);
    assert_eq!(count_lines(&text, "5"), 0);
}

#[test]
fn test_ascii_cube_matches_binary() {
    let dir = tempdir().unwrap();
    let binary_in = dir.path().join("bin.stl");
    let ascii_in = dir.path().join("ascii.stl");
    let binary_out = dir.path().join("bin.dat");
    let ascii_out = dir.path().join("ascii.dat");
    write_binary_cube(&binary_in);
    std::fs::write(&ascii_in, ascii_cube()).unwrap();

    let options = ConvertOptions::default();
    convert_file(&binary_in, &binary_out, &options).unwrap();
    convert_file(&ascii_in, &ascii_out, &options).unwrap();

    let binary_text = std::fs::read_to_string(&binary_out).unwrap();
    let ascii_text = std::fs::read_to_string(&ascii_out).unwrap();
    assert!(ascii_text.starts_with("0 cube\n"));

    // Geometry is identical; only the header comment differs.
    let body = |t: &str| t.lines().skip(1).map(str::to_owned).collect::<Vec<_>>();
    assert_eq!(body(&binary_text), body(&ascii_text));
}

#[test]
fn test_coordinates_remapped() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cube.stl");
    let output = dir.path().join("cube.dat");
    write_binary_cube(&input);
    convert_file(&input, &output, &ConvertOptions::default()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    for line in text.lines().skip(2) {
        let numbers: Vec<f64> = line
            .split_whitespace()
            .skip(2)
            .map(|w| w.parse().unwrap())
            .collect();
        assert_eq!(numbers.len() % 3, 0);
        for xyz in numbers.chunks(3) {
            // (x, y, z) -> (2.5x, -2.5z, 2.5y) over the unit cube.
            assert!(xyz[0] == 0.0 || xyz[0] == 2.5, "{}", line);
            assert!(xyz[1] == 0.0 || xyz[1] == -2.5, "{}", line);
            assert!(xyz[2] == 0.0 || xyz[2] == 2.5, "{}", line);
        }
    }
}

#[test]
fn test_missing_triangle_reports_hole() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("open.stl");
    let output = dir.path().join("open.dat");
    let text = ascii_cube();
    // Drop the third facet (the first top triangle).
    let mut facets: Vec<&str> = text.split_inclusive("endfacet\n").collect();
    facets.remove(2);
    std::fs::write(&input, facets.concat()).unwrap();

    let mesh = convert_file(&input, &output, &ConvertOptions::default()).unwrap();
    assert_eq!(mesh.num_triangles(), 11);
    assert_eq!(mesh.report().open_edges, 3);
    assert_eq!(mesh.report().non_manifold_edges, 0);
}

#[test]
fn test_dump_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cube.stl");
    write_binary_cube(&input);

    let file = stl::load(&input).unwrap();
    let mesh = build_mesh(&file, &ConvertOptions::default()).unwrap();

    let binary = dir.path().join("dump.stl");
    stl::save_binary(&mesh, &binary).unwrap();
    let mut reader = File::open(&binary).unwrap();
    let indexed = stl_io::read_stl(&mut reader).unwrap();
    assert_eq!(indexed.faces.len(), 12);
    assert_eq!(indexed.vertices.len(), 8);

    // Dumped normals are the recomputed ones, so nothing is fixed again.
    let reloaded = build_mesh(&stl::load(&binary).unwrap(), &ConvertOptions::default()).unwrap();
    assert_eq!(reloaded.report().fixed_normals, 0);

    let ascii = dir.path().join("dump_ascii.stl");
    stl::save_ascii(&mesh, &ascii).unwrap();
    let reparsed = stl::load(&ascii).unwrap();
    assert_eq!(reparsed.facets.len(), 12);
    let mesh = build_mesh(&reparsed, &ConvertOptions::default()).unwrap();
    assert!(mesh.report().is_closed_manifold());
}

#[test]
fn test_no_output_on_fatal_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.stl");
    let output = dir.path().join("broken.dat");
    std::fs::write(&input, "solid broken\n  facet normal 0 0 1\n    outer loop\n").unwrap();

    let err = convert_file(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::UnexpectedEof { .. }));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    let dir = tempdir().unwrap();
    let err = convert_file(
        dir.path().join("nope.stl"),
        dir.path().join("nope.dat"),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::FileNotFound { .. }));
}
