use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fm_core::{FoilGeometry, Image, NoProgress, Rgb};
use fm_scan::{DiameterScanner, ScanConfig};

/// Hexagonal hole pattern at the reference geometry: bores of 0.3 mm on a
/// 1.55 mm pitch at 3600 dpi.
fn synthetic_labels(width: usize, height: usize) -> Image<Rgb> {
    let g = FoilGeometry::default();
    let pitch = g.mm_to_px(g.pitch_mm);
    let radius = g.inner_diameter_px() / 2.0;
    let row_step = pitch * 3f64.sqrt() / 2.0;

    Image::from_fn(width, height, |x, y| {
        let row = (y as f64 / row_step).round();
        let offset = if row as i64 % 2 == 0 { 0.0 } else { pitch / 2.0 };
        let cy = row * row_step;
        let cx = ((x as f64 - offset) / pitch).round() * pitch + offset;
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        if dx * dx + dy * dy <= radius * radius {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    })
}

fn bench_scan(c: &mut Criterion) {
    let img = synthetic_labels(4096, 2048);
    let view = img.as_view();

    let seq = DiameterScanner::new(FoilGeometry::default(), ScanConfig { parallel: false })
        .expect("valid geometry");
    c.bench_function("scan_sequential_4096x2048", |b| {
        b.iter(|| {
            let scan = seq.scan(black_box(&view), &NoProgress).expect("scan");
            black_box(scan.hole_count());
        });
    });

    let par = DiameterScanner::new(FoilGeometry::default(), ScanConfig::default())
        .expect("valid geometry");
    c.bench_function("scan_parallel_4096x2048", |b| {
        b.iter(|| {
            let scan = par.scan(black_box(&view), &NoProgress).expect("scan");
            black_box(scan.hole_count());
        });
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
