//! cleat CLI
//!
//! Reads a scene file (TOML), builds and solves the layout, and prints
//! the solved frame of every named view. Diagnostics from degraded pin
//! calls go to stderr via `RUST_LOG`-controlled tracing output.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cleat::{frame_report, LayoutDirection, Scene};

#[derive(Parser)]
#[command(name = "cleat")]
#[command(about = "Solve a pin-based layout scene and print the resulting frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Override the scene's layout direction: "ltr" or "rtl"
    #[arg(short, long)]
    direction: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_str(&source) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(direction) = &cli.direction {
        let direction = match direction.as_str() {
            "ltr" => LayoutDirection::LeftToRight,
            "rtl" => LayoutDirection::RightToLeft,
            other => {
                eprintln!("Error: invalid direction '{}' (expected \"ltr\" or \"rtl\")", other);
                std::process::exit(1);
            }
        };
        scene = scene.with_direction(direction);
    }

    let (mut engine, names) = match scene.build() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = engine.layout() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    print!("{}", frame_report(&engine, &names));
}
