/// objview - interactive terminal mesh viewer
///
/// Usage: objview [mesh.obj] [--config viewer.toml]
///
/// Controls:
///   - Arrows / WASD: Move the model
///   - Q/E: Scale up/down
///   - R/F: Rotate about Z
///   - ESC: Quit

use objview_core::{GeometryStore, MeshParser, ViewerConfig};
use objview_terminal::{logging, TerminalApp};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Default)]
struct Args {
    mesh: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> io::Result<Args> {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "--config needs a file path")
                })?;
                args.config = Some(PathBuf::from(path));
            }
            _ if args.mesh.is_none() => args.mesh = Some(PathBuf::from(&arg)),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unexpected argument '{}'", arg),
                ))
            }
        }
    }

    Ok(args)
}

fn load_config(args: &Args) -> objview_core::Result<ViewerConfig> {
    match &args.config {
        Some(path) => Ok(ViewerConfig::from_file(path)?),
        None => Ok(ViewerConfig::default()),
    }
}

fn load_geometry(args: &Args, config: &ViewerConfig) -> GeometryStore {
    let Some(path) = &args.mesh else {
        println!("No mesh file given, showing the default pyramid");
        return GeometryStore::pyramid();
    };

    println!("Loading mesh file: {}", path.display());
    match MeshParser::new(config.parser).load_file(path) {
        Ok(mesh) => {
            println!(
                "Loaded {} vertices and {} triangles ({} indices)",
                mesh.geometry.vertex_count(),
                mesh.geometry.triangle_count(),
                mesh.geometry.index_count()
            );
            for diagnostic in &mesh.diagnostics {
                eprintln!("{}", diagnostic);
            }
            mesh.geometry
        }
        Err(e) => {
            // Keep running with nothing to draw
            warn!("{}", e);
            eprintln!("{}", e);
            GeometryStore::new()
        }
    }
}

fn main() -> io::Result<()> {
    let args = parse_args()?;

    let config = load_config(&args)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    logging::init_logger(&config.logging);

    let geometry = load_geometry(&args, &config);

    println!("Starting terminal viewer (press ESC to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(geometry, &config)?;
    app.run()?;

    Ok(())
}
