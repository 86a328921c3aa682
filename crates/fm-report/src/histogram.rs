use serde::Serialize;

use crate::ReportError;

/// Fixed-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` with `min(sqrt(N) + 1, (max - min) / resolution)` bins,
    /// truncated and never fewer than one.
    ///
    /// `resolution` is the smallest meaningful bin width, usually one pixel
    /// in millimetres.
    pub fn auto(values: &[f64], resolution: f64) -> Result<Self, ReportError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ReportError::InvalidResolution(resolution));
        }
        let (min, max) = finite_range(values)?;
        let by_count = (values.len() as f64).sqrt() + 1.0;
        let by_resolution = (max - min) / resolution;
        let bins = (by_count.min(by_resolution) as usize).max(1);
        Ok(Self::with_bins(values, min, max, bins))
    }

    /// Bins `values` into `bins` equal bins over `[min, max]`. Values outside
    /// the range are dropped; `max` itself lands in the last bin.
    pub fn with_bins(values: &[f64], min: f64, max: f64, bins: usize) -> Self {
        let bins = bins.max(1);
        let bin_width = (max - min) / bins as f64;
        let mut hist = Self {
            min,
            max,
            bin_width,
            counts: vec![0; bins],
        };
        for &v in values {
            if let Some(i) = hist.bin_index(v) {
                hist.counts[i] += 1;
            }
        }
        hist
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bin_index(&self, v: f64) -> Option<usize> {
        if !(v >= self.min && v <= self.max) {
            return None;
        }
        if self.bin_width <= 0.0 {
            return Some(0);
        }
        let i = ((v - self.min) / self.bin_width) as usize;
        Some(i.min(self.counts.len() - 1))
    }

    pub fn center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.bin_width
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.counts.len()).map(|i| self.center(i))
    }
}

/// Plain sample statistics of a diameter list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1`); zero for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Result<Self, ReportError> {
        let (min, max) = finite_range(values)?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = if values.len() > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Ok(Self {
            count: values.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}

fn finite_range(values: &[f64]) -> Result<(f64, f64), ReportError> {
    if values.is_empty() {
        return Err(ReportError::Empty);
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (index, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ReportError::NonFinite { index });
        }
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}
