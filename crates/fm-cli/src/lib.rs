//! Support code for the `foil_analyzer` binary: JSON configuration, image
//! file conversion and progress logging.

pub mod config;
pub mod io;
pub mod progress;

pub use config::FoilConfig;
pub use io::{derived_output, load_rgb, save_rgb};
pub use progress::LogProgress;
