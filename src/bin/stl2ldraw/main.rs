//! stl2ldraw CLI - convert an STL mesh into an LDraw part.
//!
//! Usage: stl2ldraw [OPTIONS] <INPUT> <OUTPUT>
//!
//! Geometric anomalies are reported on stderr through `env_logger`; set
//! `RUST_LOG=info` or `RUST_LOG=debug` for more detail.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use stl2ldraw::io::{ldraw, stl};
use stl2ldraw::mesh::Mesh;
use stl2ldraw::ConvertOptions;

#[derive(Parser)]
#[command(name = "stl2ldraw")]
#[command(author, version, about = "Convert STL meshes to LDraw parts", long_about = None)]
struct Cli {
    /// Input STL file (binary or ASCII)
    input: PathBuf,

    /// Output LDraw file
    output: PathBuf,

    /// Uniform scale applied to every point
    #[arg(short, long, default_value = "2.5")]
    scale: f64,

    /// Fold angle in degrees from which an edge line is drawn
    #[arg(long, default_value = "25")]
    hard_edge_angle: f32,

    /// Distance under which vertices are welded
    #[arg(short, long, default_value = "0.0001")]
    weld_tolerance: f32,

    /// Emit every triangle on its own instead of merging coplanar pairs
    #[arg(long)]
    no_quads: bool,

    /// Also write the welded mesh with fixed normals as STL
    #[arg(long, value_name = "PATH")]
    dump_stl: Option<PathBuf>,

    /// Write the STL dump as ASCII instead of binary
    #[arg(long, requires = "dump_stl")]
    ascii: bool,

    /// Print mesh statistics after converting
    #[arg(long)]
    stats: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = ConvertOptions::default()
        .with_scale(cli.scale)
        .with_hard_edge_angle(cli.hard_edge_angle)
        .with_weld_tolerance(cli.weld_tolerance)
        .with_merge_quads(!cli.no_quads);

    let start = Instant::now();
    let file = stl::load(&cli.input)?;
    let (mesh, document) = stl2ldraw::convert(&file, &options)?;

    if let Some(path) = &cli.dump_stl {
        if cli.ascii {
            stl::save_ascii(&mesh, path)?;
        } else {
            stl::save_binary(&mesh, path)?;
        }
    }

    ldraw::save(&document, &cli.output)?;
    let elapsed = start.elapsed();

    if cli.stats {
        print_stats(&mesh, &document, elapsed);
    }

    Ok(())
}

fn print_stats(mesh: &Mesh, document: &ldraw::Document, elapsed: std::time::Duration) {
    let report = mesh.report();
    println!("Triangles: {}", mesh.num_triangles());
    println!("Points: {}", mesh.num_points());
    println!("Edges: {}", mesh.num_edges());
    println!("Degenerate triangles: {}", report.degenerate_triangles);
    println!("Fixed normals: {}", report.fixed_normals);
    println!("Open edges: {}", report.open_edges);
    println!("Non-manifold edges: {}", report.non_manifold_edges);
    println!(
        "Output: {} triangles, {} quads, {} lines, {} optional lines ({:.2?})",
        document.count(3),
        document.count(4),
        document.count(2),
        document.count(5),
        elapsed
    );
}
