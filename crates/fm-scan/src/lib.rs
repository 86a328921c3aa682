//! Hole diameter measurement on tri-tone labeled foil images.
//!
//! The image is cut into vertical [`ColumnWindow`]s, one per expected hole
//! column: centers start at the configured first center and advance by half a
//! pitch, each window is half a pitch wide, and generation stops at the first
//! window that would cross the right image border.
//!
//! Inside a window every pixel column is scanned top to bottom by a
//! [`RunTracker`]. A vertical inner-hole run becomes a hole once it reaches
//! the detection threshold (half the expected inner diameter). The `k`-th
//! hole of a window records the longest `k`-th run seen over its pixel
//! columns, so a window reports one length per hole it crosses.
//!
//! Windows are independent and are scanned in parallel when the `rayon`
//! feature is enabled (default). Pixels are visited row by row so the
//! row-major buffer is read contiguously.

mod run;
mod scanner;
mod windows;

pub use run::{RunState, RunTracker, RunUpdate};
pub use scanner::{ColumnMeasurement, DiameterScan, DiameterScanner, ScanConfig};
pub use windows::{ColumnWindow, column_windows};
