//! Synthetic scans of a hexagonally perforated foil.
//!
//! Hole columns sit on the scan window centers. Within a column holes repeat
//! every `pitch * sqrt(3)` and odd columns are shifted by half of that, so
//! diagonal neighbours are one pitch apart.

use fm_core::{FoilGeometry, Image, Rgb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoilColors {
    pub surface: Rgb,
    pub outer_hole: Rgb,
    pub inner_hole: Rgb,
}

impl Default for FoilColors {
    /// Samples taken from the reference palettes.
    fn default() -> Self {
        Self {
            surface: Rgb::new(99, 52, 8),
            outer_hole: Rgb::new(144, 144, 111),
            inner_hole: Rgb::new(175, 163, 120),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticFoil {
    pub image: Image<Rgb>,
    /// Hole centers in pixels, column by column, top to bottom.
    pub centers: Vec<(f64, f64)>,
    /// Inner radius used for drawing, in pixels.
    pub inner_radius_px: f64,
}

impl SyntheticFoil {
    /// Number of holes in hole column `column`.
    pub fn holes_in_column(&self, column: usize, geometry: &FoilGeometry) -> usize {
        let x = geometry.first_center_px() + column as f64 * geometry.center_step_px();
        self.centers
            .iter()
            .filter(|(cx, _)| (cx - x).abs() < 0.5)
            .count()
    }
}

/// Draws `columns` hole columns into an image `height` pixels tall.
///
/// The image is just wide enough to hold the last window, so the scanner
/// finds exactly `columns` windows. Holes are only placed where the outer
/// ring fits completely.
pub fn perforated_foil(
    geometry: &FoilGeometry,
    columns: usize,
    height: usize,
    colors: FoilColors,
) -> SyntheticFoil {
    let first = geometry.first_center_px();
    let step = geometry.center_step_px();
    let half = geometry.window_half_width_px();
    let last_end = first + columns.saturating_sub(1) as f64 * step + half;
    let width = (last_end.ceil() as usize + 1).max(1);

    let r_in = geometry.inner_diameter_px() / 2.0;
    let r_out = geometry.mm_to_px(geometry.outer_diameter_mm) / 2.0;
    let row_pitch = geometry.mm_to_px(geometry.pitch_mm) * 3f64.sqrt();

    let mut centers = Vec::new();
    for c in 0..columns {
        let cx = first + c as f64 * step;
        let mut cy = if c % 2 == 0 { r_out } else { r_out + row_pitch / 2.0 };
        while cy + r_out <= height as f64 {
            centers.push((cx, cy));
            cy += row_pitch;
        }
    }

    let image = Image::from_fn(width, height, |x, y| {
        let px = x as f64 + 0.5;
        let py = y as f64 + 0.5;
        let mut color = colors.surface;
        for &(cx, cy) in &centers {
            let d2 = (px - cx).powi(2) + (py - cy).powi(2);
            if d2 <= r_in * r_in {
                return colors.inner_hole;
            }
            if d2 <= r_out * r_out {
                color = colors.outer_hole;
            }
        }
        color
    });

    SyntheticFoil {
        image,
        centers,
        inner_radius_px: r_in,
    }
}
