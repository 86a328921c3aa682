use std::ops::Range;

use fm_core::{Error, FoilGeometry};
use serde::Serialize;

/// Vertical strip of the image centered on an expected hole column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnWindow {
    pub index: usize,
    pub center_px: f64,
    /// First pixel column, `floor(center - half_width)`.
    pub x_start: usize,
    /// One past the last pixel column, `floor(center + half_width)`.
    pub x_end: usize,
}

impl ColumnWindow {
    pub fn width(&self) -> usize {
        self.x_end - self.x_start
    }

    pub fn x_range(&self) -> Range<usize> {
        self.x_start..self.x_end
    }
}

/// Generates the scan windows for an image `image_width` pixels wide.
///
/// Centers are `first_center + i * pitch / 2`; every window has half-width
/// `pitch / 4` and must end at or before `image_width`.
pub fn column_windows(
    geometry: &FoilGeometry,
    image_width: usize,
) -> Result<Vec<ColumnWindow>, Error> {
    geometry.validate()?;

    let first = geometry.first_center_px();
    let step = geometry.center_step_px();
    let half = geometry.window_half_width_px();
    let limit = image_width as f64;

    if first - half < 0.0 {
        return Err(Error::WindowOutOfBounds {
            start_px: first - half,
        });
    }

    let mut windows = Vec::new();
    loop {
        let index = windows.len();
        let center_px = first + index as f64 * step;
        if center_px + half > limit {
            break;
        }
        windows.push(ColumnWindow {
            index,
            center_px,
            x_start: (center_px - half).floor() as usize,
            x_end: (center_px + half).floor() as usize,
        });
    }

    if windows.is_empty() {
        return Err(Error::NoColumnWindows {
            image_width,
            first_window_end_px: first + half,
        });
    }

    tracing::debug!(
        "{} column windows, step {step:.3} px, half-width {half:.3} px",
        windows.len()
    );
    Ok(windows)
}
