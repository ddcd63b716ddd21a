/// Example: Parse a mesh file and report what one frame would draw
///
/// Usage: cargo run --example inspect_mesh -- path/to/file.obj

use objview_core::{Camera, FrameComposer, MeshParser, TransformState};
use std::env;
use std::io;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <mesh-file>", args[0]);
        return Ok(());
    }

    let mesh = MeshParser::default()
        .load_file(&args[1])
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))?;

    println!("Lines read:  {}", mesh.lines_read);
    println!("Vertices:    {}", mesh.geometry.vertex_count());
    println!("Triangles:   {}", mesh.geometry.triangle_count());
    println!("Indices:     {}", mesh.geometry.index_count());
    if let Some((min, max)) = mesh.geometry.bounds() {
        println!("Bounds:      {:?} .. {:?}", min, max);
    }

    for diagnostic in &mesh.diagnostics {
        println!("skipped: {}", diagnostic);
    }

    let camera = Camera::default();
    let frame = FrameComposer::new().compose(
        &camera.projection_matrix(),
        &camera.view_matrix(),
        &TransformState::default(),
        &mesh.geometry,
    );

    println!("Frame draws {} triangles", frame.triangles.len());
    if let Some(issue) = frame.issue {
        println!("Frame issue: {}", issue);
    }

    Ok(())
}
