use clap::{Parser, Subcommand, ValueEnum};
use pictor::{Canvas, ColorSpec, Region, Registry, RustBackend, WriteStrategy};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that write an image back out.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output file. The format is picked from its extension
    /// (.jpg/.jpeg, .png, .gif); a missing or foreign extension keeps the
    /// source format and the canonical extension is appended.
    #[arg(short, long)]
    output: PathBuf,

    /// Encoder quality: 0-100 for JPEG, compression level 0-9 for PNG.
    /// GIF takes no quality setting.
    #[arg(short, long)]
    quality: Option<u8>,
}

#[derive(Parser)]
#[command(name = "pictor")]
#[command(about = "Resize, rotate, flip and filter raster images")]
#[command(long_about = "\
Resize, rotate, flip and filter raster images

Reads JPEG, PNG or GIF, applies one transformation, and writes the result.
The output format follows the output file's extension; without a recognized
extension the source format is kept and the right extension appended.

Resize modes:

  crop    fill the target exactly, trimming overflow from the center
  fit     shrink by an integer ratio until the image fits inside the target
  cache   letterbox: scale to fit, then pad to the exact target size
  scale   proportional shrink to fit inside the target (never upscales)

Examples:

  pictor resize photo.jpg -o thumb.jpg --mode crop --width 200 --height 200
  pictor rotate photo.png -o turned.png --degrees 90
  pictor filter photo.jpg -o grey.jpg --name greyscale
  pictor crop photo.jpg -o detail.jpg -x 40 -y 40 --width 300 --height 200")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlipDirection {
    Vertical,
    Horizontal,
    Both,
}

#[derive(Subcommand)]
enum Command {
    /// Resize through one of the registered modes
    Resize {
        /// Input image
        input: PathBuf,
        /// Resize mode (crop, fit, cache, scale, or a registered name)
        #[arg(short, long, default_value = "scale")]
        mode: String,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Rotate counter-clockwise by an arbitrary angle
    Rotate {
        input: PathBuf,
        /// Degrees counter-clockwise; negative values turn clockwise
        #[arg(short, long)]
        degrees: f64,
        /// Corner fill color for non-quarter angles, e.g. "#ffffff".
        /// Defaults to transparent.
        #[arg(long)]
        background: Option<String>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Mirror along an axis
    Flip {
        input: PathBuf,
        #[arg(short, long, value_enum)]
        direction: FlipDirection,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Apply a per-pixel color filter
    Filter {
        input: PathBuf,
        /// Filter name (greyscale, or a registered name)
        #[arg(short, long, default_value = "greyscale")]
        name: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Clip a rectangle out of the image at 1:1 scale
    Crop {
        input: PathBuf,
        #[arg(short)]
        x: u32,
        #[arg(short)]
        y: u32,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print image dimensions and format
    Info { input: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let backend = RustBackend::new();
    let registry = Registry::new();

    match cli.command {
        Command::Resize {
            input,
            mode,
            width,
            height,
            out,
        } => {
            let canvas = Canvas::open(&backend, &input)?;
            let strategy = registry.resize_strategy(&mode)?;
            let resized = canvas.resize(&backend, strategy.as_ref(), width, height)?;
            write_out(&backend, &registry, &resized, &out)?;
        }
        Command::Rotate {
            input,
            degrees,
            background,
            out,
        } => {
            let canvas = Canvas::open(&backend, &input)?;
            let background = background.map(ColorSpec::from);
            let rotated = canvas.rotate(&backend, degrees, background)?;
            write_out(&backend, &registry, &rotated, &out)?;
        }
        Command::Flip {
            input,
            direction,
            out,
        } => {
            let canvas = Canvas::open(&backend, &input)?;
            let flipped = match direction {
                FlipDirection::Vertical => canvas.flip_vertical(&backend)?,
                FlipDirection::Horizontal => canvas.flip_horizontal(&backend)?,
                FlipDirection::Both => canvas.flip_both(&backend)?,
            };
            write_out(&backend, &registry, &flipped, &out)?;
        }
        Command::Filter { input, name, out } => {
            let canvas = Canvas::open(&backend, &input)?;
            let filter = registry.filter_strategy(&name)?;
            let filtered = canvas.filter(filter.as_ref())?;
            write_out(&backend, &registry, &filtered, &out)?;
        }
        Command::Crop {
            input,
            x,
            y,
            width,
            height,
            out,
        } => {
            let canvas = Canvas::open(&backend, &input)?;
            let cropped = canvas.crop(&backend, Region::new(x, y, width, height))?;
            write_out(&backend, &registry, &cropped, &out)?;
        }
        Command::Info { input } => {
            let canvas = Canvas::open(&backend, &input)?;
            let format = canvas
                .source_kind()
                .map(|k| k.extension())
                .unwrap_or("unknown");
            println!(
                "{}: {}x{} ({})",
                input.display(),
                canvas.width(),
                canvas.height(),
                format
            );
        }
    }

    Ok(())
}

/// Resolve a write strategy from the output extension (source format as
/// fallback), apply the quality flag, encode, and report the final path.
fn write_out(
    backend: &RustBackend,
    registry: &Registry,
    canvas: &Canvas,
    out: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = resolve_writer(registry, canvas, &out.output)?;
    if let Some(quality) = out.quality {
        writer.set_quality(quality)?;
    }
    let written = canvas.write_to_file(backend, writer.as_ref(), &out.output)?;
    println!("{}", written.display());
    Ok(())
}

fn resolve_writer(
    registry: &Registry,
    canvas: &Canvas,
    output: &Path,
) -> Result<Box<dyn WriteStrategy>, pictor::Error> {
    if let Some(ext) = output.extension().and_then(|e| e.to_str())
        && let Ok(writer) = registry.write_strategy(ext)
    {
        return Ok(writer);
    }
    let kind = canvas.source_kind().unwrap_or(pictor::ImageKind::Png);
    registry.write_strategy(kind.extension())
}
