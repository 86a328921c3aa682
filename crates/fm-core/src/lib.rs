//! Foundational primitives for foil hole metrology.
//!
//! ## Image Views and Stride
//! Images are row-major. Views use element stride (not byte stride): `stride`
//! is the distance, in elements, between adjacent row starts and may be
//! greater than `width`, so views can borrow padded buffers.
//!
//! ## Physical Units
//! All geometry is given in millimetres and converted to pixels through the
//! scan resolution in dots per inch (`px_per_mm = dpi / 25.4`).
//!
//! ## Progress
//! Long-running stages report fractional completion through a
//! [`ProgressObserver`]. Workers bump a shared atomic counter once per unit of
//! work and the observer is called at a bounded rate.

mod color;
mod error;
mod geometry;
mod image;
mod progress;

pub use color::Rgb;
pub use error::{Error, ErrorKind};
pub use geometry::{FoilGeometry, MM_PER_INCH};
pub use image::{Image, ImageView, ImageViewMut};
pub use progress::{NoProgress, ProgressObserver, ProgressReport, ProgressTracker};
