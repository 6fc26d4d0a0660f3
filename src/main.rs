use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greytocolor::models::{ColorizeConfig, MethodSetting};
use greytocolor::services::ColorizeService;

#[derive(Parser)]
#[command(name = "greytocolor")]
#[command(about = "Colorize greyscale images from a color source image")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Colorize a greyscale PNG with the colors of a source PNG
    Colorize {
        /// Greyscale image to colorize
        #[arg(short, long)]
        target: PathBuf,

        /// Color image to take chroma from
        #[arg(short, long)]
        source: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Colorization method
        #[arg(short, long, value_enum)]
        method: Option<MethodSetting>,

        /// Random source samples per matched pixel
        #[arg(short, long)]
        attempts: Option<usize>,
    },
    /// Print luminance statistics of a PNG
    Inspect {
        /// Image to inspect
        #[arg(short, long)]
        image: PathBuf,

        /// Facets per side for the luminance passport
        #[arg(long, default_value_t = 4)]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Colorize {
            target,
            source,
            output,
            config,
            seed,
            method,
            attempts,
        }) => {
            init_tracing();
            run_colorize_command(
                &target,
                &source,
                &output,
                config.as_deref(),
                seed,
                method,
                attempts,
            )
        }
        Some(Commands::Inspect { image, samples }) => {
            init_tracing();
            run_inspect_command(&image, samples)
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greytocolor=info,colorize_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Colorize a target PNG and write the result
fn run_colorize_command(
    target: &Path,
    source: &Path,
    output: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    method: Option<MethodSetting>,
    attempts: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = config_path
        .map(ColorizeConfig::load)
        .unwrap_or_default();

    // Command line wins over the config file
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(method) = method {
        config.method = method;
    }
    if let Some(attempts) = attempts {
        config.attempts = attempts;
    }

    let service = ColorizeService::new(config);
    let report = service.colorize_files(target, source, output)?;

    println!("Colorized {} -> {}", target.display(), output.display());
    println!(
        "  scale {:.3}, {} matched, {} propagated, {} skipped, {} unmatched, {:.2?}",
        report.scale_factor,
        report.matched,
        report.propagated,
        report.skipped,
        report.no_match,
        report.elapsed
    );

    Ok(())
}

/// Print luminance range, modal luminance and passport of an image
fn run_inspect_command(image: &Path, samples: usize) -> anyhow::Result<()> {
    let service = ColorizeService::new(ColorizeConfig::default());
    let inspection = service.inspect_file(image, samples)?;

    println!("{} ({}x{})", image.display(), inspection.width, inspection.height);
    println!(
        "  Luminance: {:.4} .. {:.4}",
        inspection.min_luminance, inspection.max_luminance
    );
    println!("  Modal:     {:.4}", inspection.modal_luminance);
    println!("\nPassport ({samples}x{samples}, columns outer):");
    for column in inspection.passport.chunks(samples.max(1)) {
        let row: Vec<String> = column.iter().map(|v| format!("{v:.3}")).collect();
        println!("  {}", row.join(" "));
    }

    Ok(())
}

/// Display version and usage information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("GreyToColor v{VERSION}");
    println!("Colorize greyscale images from a color source image\n");

    println!("Environment Variables:");
    println!(
        "  RUST_LOG = {}",
        std::env::var("RUST_LOG")
            .ok()
            .as_deref()
            .unwrap_or("greytocolor=info,colorize_engine=warn (default)")
    );

    println!("\nCommands:");
    println!("  greytocolor colorize   Colorize a target PNG from a source PNG");
    println!("  greytocolor inspect    Print luminance statistics of a PNG");
    println!("\nRun 'greytocolor --help' for more details.");
}
