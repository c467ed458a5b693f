use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use iris_art::{csv_reader, render_art, ArtConfig, RenderMode};

#[derive(Parser, Debug)]
#[command(name = "iris-art")]
#[command(about = "Generate deterministic abstract art from Iris measurement data", long_about = None)]
struct Args {
    /// Input CSV path; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PNG path; writes stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rendering strategy
    #[arg(short, long, value_enum, default_value = "scatter")]
    mode: RenderMode,

    /// JSON config file overriding canvas/palette defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat the input as a JSON array of records instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let raw = match &args.input {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read input {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read records from stdin")?;
            buf
        }
    };

    let records = if args.json {
        csv_reader::read_json(raw.as_slice()).context("Failed to parse JSON input")?
    } else {
        csv_reader::read_csv(raw.as_slice()).context("Failed to parse CSV input")?
    };

    let config = match &args.config {
        Some(path) => ArtConfig::from_json_file(path)?,
        None => ArtConfig::default(),
    };

    eprintln!(
        "Rendering {} records at {}x{} ({:?} mode)",
        records.len(),
        config.width,
        config.height,
        args.mode
    );

    let png_bytes = render_art(records, &config, args.mode).context("Failed to render image")?;

    match &args.output {
        Some(path) => fs::write(path, &png_bytes)
            .with_context(|| format!("Failed to write output {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&png_bytes)
                .context("Failed to write PNG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
