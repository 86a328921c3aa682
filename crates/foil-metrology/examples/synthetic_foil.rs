//! Example: full pipeline on a generated foil scan.
//!
//! Draws a hexagonally perforated foil with the reference palette colors,
//! classifies it, measures the inner-hole diameters and prints the histogram
//! fit as JSON.
//!
//! Run from the workspace root:
//!   cargo run -p foil-metrology --example synthetic_foil -- --help
//!   cargo run --release -p foil-metrology --example synthetic_foil -- --dpi 3600

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use foil_metrology::synth::{FoilColors, perforated_foil};
use foil_metrology::{
    Classifier, DiameterScanner, FoilGeometry, GaussianFit, Histogram, NoProgress, ScanConfig,
    Summary,
};

#[derive(Parser, Debug)]
#[command(about = "Classify and measure a synthetic perforated foil")]
struct Args {
    #[arg(long, default_value_t = 1200.0)]
    dpi: f64,

    /// Number of hole columns to draw
    #[arg(long, default_value_t = 24)]
    columns: usize,

    /// Image height in millimetres
    #[arg(long, default_value_t = 20.0)]
    height_mm: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let geometry = FoilGeometry {
        dpi: args.dpi,
        ..FoilGeometry::default()
    };
    geometry.validate().context("invalid geometry")?;

    let height = geometry.mm_to_px(args.height_mm).round() as usize;
    let foil = perforated_foil(&geometry, args.columns, height, FoilColors::default());
    println!(
        "image {}x{}, {} holes drawn",
        foil.image.width(),
        foil.image.height(),
        foil.centers.len()
    );

    let t0 = Instant::now();
    let labels = Classifier::default().classify(&foil.image.as_view(), &NoProgress)?;
    let classify_ms = t0.elapsed().as_secs_f64() * 1e3;

    let t1 = Instant::now();
    let scan = DiameterScanner::new(geometry, ScanConfig::default())?
        .scan(&labels.as_view(), &NoProgress)?;
    let scan_ms = t1.elapsed().as_secs_f64() * 1e3;
    println!(
        "classify {classify_ms:.1} ms, scan {scan_ms:.1} ms, {} holes measured",
        scan.hole_count()
    );

    let values = scan.flatten();
    let summary = Summary::from_values(&values)?;
    let hist = Histogram::auto(&values, geometry.mm_per_px())?;
    let fit = GaussianFit::fit(&hist);

    let report = serde_json::json!({
        "expected_diameter_mm": 2.0 * foil.inner_radius_px * geometry.mm_per_px(),
        "summary": summary,
        "histogram": hist,
        "fit": fit,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
