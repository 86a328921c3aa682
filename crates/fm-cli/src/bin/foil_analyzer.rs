use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fm_classify::{ClassifyConfig, Classifier};
use fm_cli::{FoilConfig, LogProgress, derived_output, load_rgb, save_rgb};
use fm_core::{FoilGeometry, MM_PER_INCH};
use fm_report::{GaussianFit, Histogram, Summary, load_diameters, save_diameters};
use fm_scan::{DiameterScanner, ScanConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "foil_analyzer")]
#[command(about = "Classify scans of perforated foil and measure hole diameters")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reduce a color scan to surface / outer-hole / inner-hole colors.
    #[command(name = "analyze")]
    Analyze(AnalyzeArgs),
    /// Measure inner-hole diameters on a classified image.
    #[command(name = "measure")]
    Measure(MeasureArgs),
    /// Bin a diameter list and fit a Gaussian.
    #[command(name = "histogram")]
    Histogram(HistogramArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    input: PathBuf,
    /// Defaults to `<input stem>_labels.png` next to the input.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Classify rows on the calling thread only.
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug, Clone)]
struct MeasureArgs {
    #[arg(long)]
    input: PathBuf,
    /// Defaults to `<input stem>_diameters.csv` next to the input.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    sequential: bool,
    #[command(flatten)]
    geometry: GeometryOverrides,
}

#[derive(Args, Debug, Clone)]
struct HistogramArgs {
    #[arg(long)]
    input: PathBuf,
    /// Scan resolution; one pixel is the narrowest bin.
    #[arg(long, default_value_t = 3600.0)]
    dpi: f64,
    /// Optional JSON report.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
struct GeometryOverrides {
    #[arg(long, value_name = "MM")]
    inner_diameter: Option<f64>,
    #[arg(long, value_name = "MM")]
    outer_diameter: Option<f64>,
    #[arg(long, value_name = "MM")]
    pitch: Option<f64>,
    #[arg(long)]
    dpi: Option<f64>,
    #[arg(long, value_name = "MM")]
    first_center: Option<f64>,
}

impl GeometryOverrides {
    fn apply(&self, geometry: &mut FoilGeometry) {
        let pairs = [
            (&mut geometry.inner_diameter_mm, self.inner_diameter),
            (&mut geometry.outer_diameter_mm, self.outer_diameter),
            (&mut geometry.pitch_mm, self.pitch),
            (&mut geometry.dpi, self.dpi),
            (&mut geometry.first_center_mm, self.first_center),
        ];
        for (field, value) in pairs {
            if let Some(v) = value {
                *field = v;
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct HistogramReport {
    source: PathBuf,
    summary: Summary,
    histogram: Histogram,
    fit: Option<GaussianFit>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Analyze(args) => run_analyze(args),
        Command::Measure(args) => run_measure(args),
        Command::Histogram(args) => run_histogram(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let cfg = FoilConfig::load_or_default(args.config.as_deref())?;
    let out = args
        .out
        .unwrap_or_else(|| derived_output(&args.input, "_labels.png"));

    let mut img = load_rgb(&args.input)?;
    tracing::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        img.width(),
        img.height()
    );

    let classifier = Classifier::new(
        cfg.palettes(),
        ClassifyConfig {
            parallel: !args.sequential,
        },
    );
    classifier
        .classify_in_place(&mut img.as_view_mut(), &LogProgress::new("classify"))
        .context("classifying image")?;

    save_rgb(&out, &img)?;
    tracing::info!("wrote {}", out.display());
    Ok(())
}

fn run_measure(args: MeasureArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let mut cfg = FoilConfig::load_or_default(args.config.as_deref())?;
    args.geometry.apply(&mut cfg.geometry);
    let out = args
        .out
        .unwrap_or_else(|| derived_output(&args.input, "_diameters.csv"));

    let labels = load_rgb(&args.input)?;
    let scanner = DiameterScanner::new(
        cfg.geometry,
        ScanConfig {
            parallel: !args.sequential,
        },
    )
    .context("invalid foil geometry")?;
    tracing::info!(
        "detection threshold {} px at {} dpi",
        scanner.threshold_px(),
        cfg.geometry.dpi
    );

    let scan = scanner
        .scan(&labels.as_view(), &LogProgress::new("measure"))
        .with_context(|| format!("scanning {}", args.input.display()))?;

    let diameters = scan.flatten();
    if let Ok(summary) = Summary::from_values(&diameters) {
        tracing::info!(
            "mean diameter {:.4} mm, std dev {:.4} mm",
            summary.mean,
            summary.std_dev
        );
    }
    save_diameters(&out, &diameters)?;
    tracing::info!("wrote {}", out.display());
    Ok(())
}

fn run_histogram(args: HistogramArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    if !(args.dpi.is_finite() && args.dpi > 0.0) {
        bail!("dpi must be finite and positive, got {}", args.dpi);
    }

    let values = load_diameters(&args.input)?;
    let summary = Summary::from_values(&values)
        .with_context(|| format!("summarizing {}", args.input.display()))?;
    let histogram = Histogram::auto(&values, MM_PER_INCH / args.dpi)?;
    let fit = GaussianFit::fit(&histogram);

    tracing::info!(
        "{} values in [{:.4}, {:.4}] mm, {} bins",
        summary.count,
        summary.min,
        summary.max,
        histogram.bin_count()
    );
    tracing::info!(
        "sample mean {:.4} mm, std dev {:.4} mm",
        summary.mean,
        summary.std_dev
    );
    if let Some(fit) = &fit {
        tracing::info!(
            "gaussian fit: mean {:.4} mm, sigma {:.4} mm ({:?})",
            fit.mean,
            fit.sigma,
            fit.method
        );
    }

    if let Some(out) = args.out {
        let report = HistogramReport {
            source: args.input,
            summary,
            histogram,
            fit,
        };
        write_json(&out, &report)?;
        tracing::info!("wrote {}", out.display());
    }
    Ok(())
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    std::fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
