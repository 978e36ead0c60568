mod swatch;

use anyhow::{Context, Result};
use clap::Parser;
use cover_accent::{AccentPipeline, AccentReport, ParallelAccentPipeline, PixelAccess};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "accent_tester", about = "Extracts the accent color of cover images")]
struct Cli {
    /// Cover images to analyze.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Run the strategies on tokio's blocking pool.
    #[arg(long)]
    parallel: bool,

    /// Write a PNG swatch of each accent into this directory.
    #[arg(long, value_name = "DIR")]
    swatch: Option<PathBuf>,

    /// Log pipeline decisions (same as RUST_LOG=debug).
    #[arg(short, long)]
    verbose: bool,
}

fn load_cover(path: &Path) -> Result<PixelAccess> {
    let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    PixelAccess::from_dynamic(&image)
        .with_context(|| format!("reading pixels of {}", path.display()))
}

fn print_report(path: &Path, report: &AccentReport) {
    let accent = report.accent;
    println!(
        "{}  {}  h={:.3} s={:.3} b={:.3}  {}",
        path.display(),
        accent.hex(),
        accent.hue,
        accent.saturation,
        accent.brightness,
        report.origin
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(dir) = &cli.swatch {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let covers = cli
        .images
        .iter()
        .map(|path| load_cover(path))
        .collect::<Result<Vec<_>>>()?;

    let reports = if cli.parallel {
        ParallelAccentPipeline::default().extract_many(covers).await
    } else {
        let pipeline = AccentPipeline::default();
        covers.iter().map(|cover| pipeline.generate_report(cover)).collect()
    };

    for (index, (path, report)) in cli.images.iter().zip(&reports).enumerate() {
        print_report(path, report);

        if let Some(dir) = &cli.swatch {
            let target = dir.join(swatch::file_name(index, path));
            swatch::save(&target, report.accent)?;
            info!(path = %target.display(), "swatch written");
        }
    }

    Ok(())
}
