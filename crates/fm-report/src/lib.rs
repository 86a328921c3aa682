//! Reporting helpers for measured hole diameters.
//!
//! - [`write_diameters`] / [`read_diameters`]: flat list, one value per line,
//!   no header. Blank lines are skipped on read, which also accepts files
//!   with the legacy leading empty line.
//! - [`Histogram::auto`]: `min(sqrt(N) + 1, range / resolution)` bins over
//!   `[min, max]`; the maximum lands in the last bin.
//! - [`GaussianFit::fit`]: weighted least-squares parabola on log counts,
//!   with a moment estimate as fallback.

mod diameters;
mod error;
mod fit;
mod histogram;

pub use diameters::{load_diameters, read_diameters, save_diameters, write_diameters};
pub use error::ReportError;
pub use fit::{FitMethod, GaussianFit};
pub use histogram::{Histogram, Summary};
