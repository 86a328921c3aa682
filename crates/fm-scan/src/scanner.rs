use std::time::Instant;

use fm_classify::MaterialClass;
use fm_core::{Error, FoilGeometry, ImageView, ProgressObserver, ProgressTracker, Rgb};
use serde::Serialize;

use crate::run::{RunTracker, RunUpdate};
use crate::windows::{ColumnWindow, column_windows};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Scan windows on the rayon pool. Ignored without the `rayon` feature.
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "rayon"),
        }
    }
}

/// Holes found in one column window, top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeasurement {
    pub window: ColumnWindow,
    pub lengths_px: Vec<usize>,
    pub diameters_mm: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiameterScan {
    pub geometry: FoilGeometry,
    pub threshold_px: usize,
    pub columns: Vec<ColumnMeasurement>,
}

impl DiameterScan {
    pub fn hole_count(&self) -> usize {
        self.columns.iter().map(|c| c.diameters_mm.len()).sum()
    }

    pub fn diameters(&self) -> impl Iterator<Item = f64> + '_ {
        self.columns
            .iter()
            .flat_map(|c| c.diameters_mm.iter().copied())
    }

    /// All diameters in window order, then encounter order within a window.
    pub fn flatten(&self) -> Vec<f64> {
        self.diameters().collect()
    }
}

#[derive(Debug, Clone)]
pub struct DiameterScanner {
    geometry: FoilGeometry,
    threshold_px: usize,
    cfg: ScanConfig,
}

impl DiameterScanner {
    pub fn new(geometry: FoilGeometry, cfg: ScanConfig) -> Result<Self, Error> {
        geometry.validate()?;
        let threshold_px = geometry.detection_threshold_px()?;
        tracing::debug!(
            "detection threshold {threshold_px} px ({:.3} px/mm)",
            geometry.px_per_mm()
        );
        Ok(Self {
            geometry,
            threshold_px,
            cfg,
        })
    }

    pub fn geometry(&self) -> &FoilGeometry {
        &self.geometry
    }

    pub fn threshold_px(&self) -> usize {
        self.threshold_px
    }

    /// Measures holes in a tri-tone image; only the canonical inner-hole
    /// color counts as hole.
    pub fn scan<O>(&self, labels: &ImageView<'_, Rgb>, progress: &O) -> Result<DiameterScan, Error>
    where
        O: ProgressObserver + ?Sized,
    {
        let hole = MaterialClass::InnerHole.canonical_color();
        self.scan_with(labels, |px| *px == hole, progress)
    }

    /// Measures holes in an image of class labels.
    pub fn scan_labels<O>(
        &self,
        labels: &ImageView<'_, MaterialClass>,
        progress: &O,
    ) -> Result<DiameterScan, Error>
    where
        O: ProgressObserver + ?Sized,
    {
        self.scan_with(labels, |c| *c == MaterialClass::InnerHole, progress)
    }

    pub fn scan_with<T, P, O>(
        &self,
        img: &ImageView<'_, T>,
        is_hole: P,
        progress: &O,
    ) -> Result<DiameterScan, Error>
    where
        T: Sync,
        P: Fn(&T) -> bool + Sync,
        O: ProgressObserver + ?Sized,
    {
        if img.is_empty() {
            return Err(Error::EmptyImage);
        }
        let windows = column_windows(&self.geometry, img.width())?;
        let t0 = Instant::now();

        let total_cols: usize = windows.iter().map(ColumnWindow::width).sum();
        let tracker = ProgressTracker::new(progress, total_cols);
        let threshold = self.threshold_px;
        let measure = |window: &ColumnWindow| {
            let lengths = scan_window(img, window, threshold, &is_hole);
            tracker.advance(window.width());
            lengths
        };

        let lengths: Vec<Vec<usize>> = if self.cfg.parallel {
            scan_windows_parallel(&windows, measure)
        } else {
            windows.iter().map(measure).collect()
        };

        let mm_per_px = self.geometry.mm_per_px();
        let columns: Vec<ColumnMeasurement> = windows
            .into_iter()
            .zip(lengths)
            .map(|(window, lengths_px)| ColumnMeasurement {
                window,
                diameters_mm: lengths_px.iter().map(|&l| l as f64 * mm_per_px).collect(),
                lengths_px,
            })
            .collect();

        let scan = DiameterScan {
            geometry: self.geometry,
            threshold_px: threshold,
            columns,
        };
        tracing::info!(
            "measured {} holes in {} column windows in {:.3}s",
            scan.hole_count(),
            scan.columns.len(),
            t0.elapsed().as_secs_f64()
        );
        Ok(scan)
    }
}

#[cfg(feature = "rayon")]
fn scan_windows_parallel<F>(windows: &[ColumnWindow], measure: F) -> Vec<Vec<usize>>
where
    F: Fn(&ColumnWindow) -> Vec<usize> + Sync + Send,
{
    use rayon::prelude::*;

    windows.par_iter().map(measure).collect()
}

#[cfg(not(feature = "rayon"))]
fn scan_windows_parallel<F>(windows: &[ColumnWindow], measure: F) -> Vec<Vec<usize>>
where
    F: Fn(&ColumnWindow) -> Vec<usize>,
{
    windows.iter().map(measure).collect()
}

/// Returns, for each hole index, the longest run over the window's columns.
fn scan_window<T, P>(
    img: &ImageView<'_, T>,
    window: &ColumnWindow,
    threshold: usize,
    is_hole: &P,
) -> Vec<usize>
where
    P: Fn(&T) -> bool,
{
    let mut trackers = vec![RunTracker::new(threshold); window.width()];
    let mut records: Vec<usize> = Vec::new();

    for row in img.rows() {
        let cols = &row[window.x_range()];
        for (tracker, px) in trackers.iter_mut().zip(cols) {
            if let Some(RunUpdate { hole, run }) = tracker.push(is_hole(px)) {
                if hole == records.len() {
                    records.push(0);
                }
                records[hole] = records[hole].max(run);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use fm_classify::MaterialClass;
    use fm_core::{Error, FoilGeometry, Image, ImageView, NoProgress, Rgb};

    use super::{DiameterScanner, ScanConfig};

    const HOLE: Rgb = Rgb::WHITE;
    const SURFACE: Rgb = Rgb::BLACK;

    /// 1 px per mm, one window covering pixel column 0 of a 1 px wide image,
    /// detection threshold 5 px.
    fn single_column_geometry() -> FoilGeometry {
        FoilGeometry {
            inner_diameter_mm: 10.0,
            outer_diameter_mm: 12.0,
            pitch_mm: 2.0,
            dpi: 25.4,
            first_center_mm: 0.5,
        }
    }

    fn sequential() -> ScanConfig {
        ScanConfig { parallel: false }
    }

    fn column_image(pattern: &str) -> Image<Rgb> {
        let px: Vec<Rgb> = pattern
            .bytes()
            .map(|b| if b == b'#' { HOLE } else { SURFACE })
            .collect();
        Image::from_vec(1, px.len(), px).expect("valid column")
    }

    fn scan_column(pattern: &str) -> Vec<usize> {
        let scanner =
            DiameterScanner::new(single_column_geometry(), sequential()).expect("scanner");
        assert_eq!(scanner.threshold_px(), 5);
        let scan = scanner
            .scan(&column_image(pattern).as_view(), &NoProgress)
            .expect("scan");
        assert_eq!(scan.columns.len(), 1);
        scan.columns[0].lengths_px.clone()
    }

    #[test]
    fn run_one_below_threshold_is_ignored() {
        assert!(scan_column("..####..").is_empty());
    }

    #[test]
    fn run_at_threshold_is_one_hole() {
        let scanner =
            DiameterScanner::new(single_column_geometry(), sequential()).expect("scanner");
        let scan = scanner
            .scan(&column_image("..#####..").as_view(), &NoProgress)
            .expect("scan");
        assert_eq!(scan.columns[0].lengths_px, vec![5]);
        assert_eq!(scan.flatten(), vec![5.0]);
    }

    #[test]
    fn separated_runs_are_reported_in_encounter_order() {
        assert_eq!(scan_column(".######.########."), vec![6, 8]);
        assert_eq!(scan_column("########.######"), vec![8, 6]);
    }

    #[test]
    fn run_open_at_last_row_is_reported() {
        assert_eq!(scan_column("...#######"), vec![7]);
    }

    #[test]
    fn window_keeps_longest_run_per_hole_index() {
        // 1 px per mm, center 2, half-width 1: window covers columns 1 and 2.
        let g = FoilGeometry {
            inner_diameter_mm: 4.0,
            outer_diameter_mm: 6.0,
            pitch_mm: 4.0,
            dpi: 25.4,
            first_center_mm: 2.0,
        };
        let scanner = DiameterScanner::new(g, sequential()).expect("scanner");
        assert_eq!(scanner.threshold_px(), 2);

        // Column 0 is outside the window and must be ignored.
        let cols = [
            "##########",
            "###.##....",
            ".####.....",
        ];
        let height = cols[0].len();
        let img = Image::from_fn(3, height, |x, y| {
            if cols[x].as_bytes()[y] == b'#' { HOLE } else { SURFACE }
        });

        let scan = scanner.scan(&img.as_view(), &NoProgress).expect("scan");
        assert_eq!(scan.columns.len(), 1);
        assert_eq!(scan.columns[0].window.x_range(), 1..3);
        assert_eq!(scan.columns[0].lengths_px, vec![4, 2]);
    }

    #[test]
    fn reference_geometry_single_run_in_mm() {
        let g = FoilGeometry::default();
        let scanner = DiameterScanner::new(g, sequential()).expect("scanner");

        let run = 42..84;
        let img = Image::from_fn(445, 200, |x, y| {
            if x == 390 && run.contains(&y) { HOLE } else { SURFACE }
        });

        let scan = scanner.scan(&img.as_view(), &NoProgress).expect("scan");
        assert_eq!(scan.columns.len(), 1);
        let diameters = scan.flatten();
        assert_eq!(diameters.len(), 1);
        assert!((diameters[0] - 42.0 * 25.4 / 3600.0).abs() < 1e-9);
    }

    #[test]
    fn gray_annulus_is_not_counted() {
        let ring = MaterialClass::OuterHole.canonical_color();
        let px = [ring, ring, ring, ring, ring, ring, HOLE, HOLE];
        let img = Image::from_vec(1, px.len(), px.to_vec()).expect("valid column");

        let scanner =
            DiameterScanner::new(single_column_geometry(), sequential()).expect("scanner");
        let scan = scanner.scan(&img.as_view(), &NoProgress).expect("scan");
        assert_eq!(scan.hole_count(), 0);
    }

    #[test]
    fn padded_view_ignores_padding() {
        // Padding is white but lies outside the 1 px wide view.
        let mut data = Vec::new();
        for y in 0..12 {
            data.push(if (2..9).contains(&y) { HOLE } else { SURFACE });
            data.push(HOLE);
        }
        let view = ImageView::from_slice(1, 12, 2, &data).expect("valid view");

        let scanner =
            DiameterScanner::new(single_column_geometry(), sequential()).expect("scanner");
        let scan = scanner.scan(&view, &NoProgress).expect("scan");
        assert_eq!(scan.columns[0].lengths_px, vec![7]);
    }

    #[test]
    fn class_labels_scan_like_colors() {
        let g = FoilGeometry::default();
        let labels = Image::from_fn(1200, 300, |x, y| {
            let in_bore = (x % 110) < 30 && ((y + x / 110 * 17) % 90) < 40;
            if in_bore { MaterialClass::InnerHole } else { MaterialClass::Surface }
        });
        let colors = labels.as_view().map(|c| c.canonical_color());

        let scanner = DiameterScanner::new(g, sequential()).expect("scanner");
        let a = scanner
            .scan_labels(&labels.as_view(), &NoProgress)
            .expect("labels");
        let b = scanner.scan(&colors.as_view(), &NoProgress).expect("colors");
        assert_eq!(a, b);
        assert!(a.hole_count() > 0);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let g = FoilGeometry::default();
        let img = Image::from_fn(2000, 400, |x, y| {
            let dx = (x % 110) as i64 - 55;
            let dy = (y % 80) as i64 - 40;
            if dx * dx + dy * dy < 21 * 21 { HOLE } else { SURFACE }
        });

        let seq = DiameterScanner::new(g, sequential())
            .expect("scanner")
            .scan(&img.as_view(), &NoProgress)
            .expect("sequential");
        let par = DiameterScanner::new(g, ScanConfig { parallel: true })
            .expect("scanner")
            .scan(&img.as_view(), &NoProgress)
            .expect("parallel");
        assert_eq!(seq, par);
        assert!(seq.hole_count() > 0);
    }

    #[test]
    fn parallel_progress_counts_pixel_columns_and_completes_once() {
        use std::sync::Mutex;

        use fm_core::ProgressReport;

        let seen = Mutex::new(Vec::new());
        let observer = |r: ProgressReport| seen.lock().expect("lock").push(r.fraction);

        let img = Image::new_fill(3000, 200, SURFACE);
        let scan = DiameterScanner::new(FoilGeometry::default(), ScanConfig { parallel: true })
            .expect("scanner")
            .scan(&img.as_view(), &observer)
            .expect("scan");

        // Every window spans more pixel columns than one report step.
        let windows = scan.columns.len();
        let seen = seen.into_inner().expect("lock");
        assert_eq!(windows, 24);
        assert!(seen.len() >= windows && seen.len() <= 101, "{} reports", seen.len());
        assert_eq!(seen.iter().filter(|&&f| f == 1.0).count(), 1);
        assert!(seen.iter().all(|&f| f > 0.0 && f <= 1.0));
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        let scanner = DiameterScanner::new(FoilGeometry::default(), sequential()).expect("scanner");

        let narrow = Image::new_fill(300, 10, SURFACE);
        assert!(matches!(
            scanner.scan(&narrow.as_view(), &NoProgress),
            Err(Error::NoColumnWindows { .. })
        ));

        let empty: Image<Rgb> = Image::from_vec(500, 0, Vec::new()).expect("empty");
        assert_eq!(
            scanner.scan(&empty.as_view(), &NoProgress).unwrap_err(),
            Error::EmptyImage
        );

        let tiny = FoilGeometry {
            inner_diameter_mm: 0.005,
            ..FoilGeometry::default()
        };
        assert!(matches!(
            DiameterScanner::new(tiny, sequential()),
            Err(Error::ThresholdTooSmall { .. })
        ));

        let negative = FoilGeometry {
            pitch_mm: -1.55,
            ..FoilGeometry::default()
        };
        assert!(matches!(
            DiameterScanner::new(negative, sequential()),
            Err(Error::InvalidGeometry { name: "pitch_mm", .. })
        ));
    }
}
