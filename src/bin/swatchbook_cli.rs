//! CLI tool for swatchbook - color conversion and palettes from the terminal
//!
//! Usage:
//!   swatchbook_cli convert '#3b82f6'                 # Hex, RGB, HSL and label color
//!   swatchbook_cli generate '#3b82f6' -r triadic -s 6
//!   swatchbook_cli generate -f json -o palette.json  # Base color from config
//!   swatchbook_cli pick 180 50                        # Gradient position to color
//!   swatchbook_cli contrast '#ffd700'
//!
//! Set `RUST_LOG=swatchbook=debug` for diagnostics on stderr.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swatchbook::color::{self, Rgb};
use swatchbook::palette::{generate_palette_for_tag, validate_palette_size, Palette};
use swatchbook::PickerConfig;

#[derive(Parser)]
#[command(name = "swatchbook_cli")]
#[command(about = "Convert colors and generate harmony palettes")]
#[command(version)]
struct Cli {
    /// JSON picker configuration (default color, rule and size)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a color as hex, RGB and HSL
    Convert {
        /// Hex color, `#rgb` or `#rrggbb`
        color: String,
    },
    /// Generate a palette from a base color
    Generate {
        /// Base hex color (defaults to the configured color)
        color: Option<String>,

        /// complementary, analogous, triadic or monochromatic
        #[arg(short, long)]
        rule: Option<String>,

        /// Number of colors (2-10)
        #[arg(short, long)]
        size: Option<i64>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Color at a position on the picker gradient
    #[command(allow_negative_numbers = true)]
    Pick {
        x: f64,
        y: f64,

        #[arg(long, default_value_t = 360.0)]
        width: f64,

        #[arg(long, default_value_t = 100.0)]
        height: f64,
    },
    /// Readable label color for a background
    Contrast {
        /// Background hex color
        color: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One hex color per line
    Text,
    /// JSON array of hex colors
    Json,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PickerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PickerConfig::default(),
    };

    match cli.command {
        Commands::Convert { color } => convert(&color),
        Commands::Generate {
            color,
            rule,
            size,
            format,
            output,
        } => {
            let base = color.unwrap_or_else(|| config.default_color.clone());
            let rule = rule.unwrap_or_else(|| config.default_rule.to_string());
            let size = match size {
                Some(size) => validate_palette_size(size)?,
                None => config.default_size,
            };
            let palette = generate_palette_for_tag(&base, &rule, size)
                .with_context(|| format!("Cannot generate a palette from {base}"))?;
            write_palette(&palette, format, output.as_ref())
        }
        Commands::Pick {
            x,
            y,
            width,
            height,
        } => {
            let hsl = color::gradient_position_to_hsl(x, y, width, height);
            let rgb = hsl.to_rgb();
            println!("{}", rgb.to_hex_upper());
            println!("{rgb}");
            println!("{hsl}");
            Ok(())
        }
        Commands::Contrast { color } => {
            let rgb: Rgb = color.parse()?;
            println!("{}", color::contrasting_text_color(rgb));
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swatchbook=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn convert(hex: &str) -> Result<()> {
    let rgb: Rgb = hex.parse()?;
    let hsl = rgb.to_hsl();
    println!("{}", rgb.to_hex_upper());
    println!("{rgb}");
    println!("{hsl}");
    println!("luminance: {:.4}", color::relative_luminance(rgb));
    println!("label: {}", color::contrasting_text_color(rgb));
    Ok(())
}

fn write_palette(palette: &Palette, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let text = match format {
        OutputFormat::Text => palette.export_text(),
        OutputFormat::Json => serde_json::to_string_pretty(palette)?,
    };

    match output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Error writing {}", path.display()))?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
