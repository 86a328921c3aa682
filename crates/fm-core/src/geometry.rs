use serde::{Deserialize, Serialize};

use crate::Error;

pub const MM_PER_INCH: f64 = 25.4;

/// Expected foil layout and scan resolution.
///
/// Lengths are in millimetres, `dpi` in dots per inch. Pixel quantities are
/// derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoilGeometry {
    /// Expected inner (bore) diameter; sets the detection threshold.
    pub inner_diameter_mm: f64,
    /// Expected outer (annulus) diameter. Validated but not used by the scan.
    pub outer_diameter_mm: f64,
    /// Center-to-center hole spacing; sets window spacing and width.
    pub pitch_mm: f64,
    pub dpi: f64,
    /// Approximate x position of the first hole column.
    pub first_center_mm: f64,
}

impl Default for FoilGeometry {
    fn default() -> Self {
        Self {
            inner_diameter_mm: 0.3,
            outer_diameter_mm: 0.5,
            pitch_mm: 1.55,
            dpi: 3600.0,
            first_center_mm: 2.75,
        }
    }
}

impl FoilGeometry {
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("inner_diameter_mm", self.inner_diameter_mm),
            ("outer_diameter_mm", self.outer_diameter_mm),
            ("pitch_mm", self.pitch_mm),
            ("dpi", self.dpi),
            ("first_center_mm", self.first_center_mm),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidGeometry { name, value });
            }
        }
        Ok(())
    }

    pub fn px_per_mm(&self) -> f64 {
        self.dpi / MM_PER_INCH
    }

    pub fn mm_per_px(&self) -> f64 {
        MM_PER_INCH / self.dpi
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.dpi / MM_PER_INCH
    }

    pub fn px_to_mm(&self, px: f64) -> f64 {
        px * MM_PER_INCH / self.dpi
    }

    pub fn first_center_px(&self) -> f64 {
        self.mm_to_px(self.first_center_mm)
    }

    /// Distance between adjacent column window centers: half a pitch.
    pub fn center_step_px(&self) -> f64 {
        self.mm_to_px(self.pitch_mm) / 2.0
    }

    /// Half-width of a column window: a quarter pitch.
    pub fn window_half_width_px(&self) -> f64 {
        self.center_step_px() / 2.0
    }

    pub fn inner_diameter_px(&self) -> f64 {
        self.mm_to_px(self.inner_diameter_mm)
    }

    /// Minimum vertical run, in whole pixels, counted as a hole: half the
    /// expected inner diameter, truncated.
    pub fn detection_threshold_px(&self) -> Result<usize, Error> {
        let inner_diameter_px = self.inner_diameter_px();
        let threshold = (inner_diameter_px / 2.0).floor();
        if !threshold.is_finite() || threshold < 1.0 {
            return Err(Error::ThresholdTooSmall { inner_diameter_px });
        }
        Ok(threshold as usize)
    }
}
