use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::Histogram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMethod {
    /// Weighted least-squares parabola through `ln(count)`.
    LogParabola,
    /// Count-weighted mean and standard deviation of the bin centers.
    Moments,
}

/// `amplitude * exp(-(x - mean)^2 / (2 sigma^2))` fitted to a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianFit {
    pub amplitude: f64,
    pub mean: f64,
    pub sigma: f64,
    pub method: FitMethod,
}

impl GaussianFit {
    /// Fits non-empty bins of `hist`.
    ///
    /// Uses the log-parabola when at least three bins are populated and the
    /// fitted parabola opens downward, otherwise falls back to moments.
    /// Returns `None` for an empty histogram.
    pub fn fit(hist: &Histogram) -> Option<Self> {
        if hist.total() == 0 {
            return None;
        }
        let fit = log_parabola(hist).unwrap_or_else(|| moments(hist));
        tracing::debug!(
            "gaussian fit ({:?}): mean {:.6}, sigma {:.6}",
            fit.method,
            fit.mean,
            fit.sigma
        );
        Some(fit)
    }

    pub fn eval(&self, x: f64) -> f64 {
        if self.sigma <= 0.0 {
            return if x == self.mean { self.amplitude } else { 0.0 };
        }
        let z = (x - self.mean) / self.sigma;
        self.amplitude * (-0.5 * z * z).exp()
    }
}

fn log_parabola(hist: &Histogram) -> Option<GaussianFit> {
    let populated = hist.counts.iter().filter(|&&c| c > 0).count();
    if populated < 3 {
        return None;
    }

    // Centered abscissa keeps the normal equations well conditioned.
    let x0 = 0.5 * (hist.min + hist.max);
    let mut ata = Matrix3::<f64>::zeros();
    let mut atb = Vector3::<f64>::zeros();
    for (x, &c) in hist.centers().zip(&hist.counts) {
        if c == 0 {
            continue;
        }
        let y = c as f64;
        // Poisson noise on ln(y) has variance ~1/y.
        let w = y;
        let dx = x - x0;
        let row = Vector3::new(1.0, dx, dx * dx);
        ata += w * row * row.transpose();
        atb += w * y.ln() * row;
    }

    let p = ata.lu().solve(&atb)?;
    let (a, b, c) = (p[0], p[1], p[2]);
    if !(c < 0.0) {
        return None;
    }
    let sigma = (-0.5 / c).sqrt();
    let mean = x0 - b / (2.0 * c);
    let amplitude = (a - b * b / (4.0 * c)).exp();
    if !(sigma.is_finite() && mean.is_finite() && amplitude.is_finite()) {
        return None;
    }
    Some(GaussianFit {
        amplitude,
        mean,
        sigma,
        method: FitMethod::LogParabola,
    })
}

fn moments(hist: &Histogram) -> GaussianFit {
    let total = hist.total() as f64;
    let mean = hist
        .centers()
        .zip(&hist.counts)
        .map(|(x, &c)| x * c as f64)
        .sum::<f64>()
        / total;
    let var = hist
        .centers()
        .zip(&hist.counts)
        .map(|(x, &c)| (x - mean) * (x - mean) * c as f64)
        .sum::<f64>()
        / total;
    let amplitude = hist.counts.iter().copied().max().unwrap_or(0) as f64;
    GaussianFit {
        amplitude,
        mean,
        sigma: var.sqrt(),
        method: FitMethod::Moments,
    }
}
