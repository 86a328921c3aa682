//! Tri-tone material classification of scanned foil photographs.
//!
//! Every pixel is assigned to the [`MaterialClass`] whose [`Palette`] holds
//! the reference color nearest to it (Euclidean distance in RGB). Exact ties
//! go to the earlier class in [`MaterialClass::ALL`]: surface, then outer
//! hole, then inner hole.
//!
//! Pixels are independent, so rows are classified in parallel when the
//! `rayon` feature is enabled (default).

mod classifier;
mod palette;

pub use classifier::{ClassifyConfig, Classifier};
pub use palette::{MaterialClass, Palette, PaletteSet};
