use foil_metrology::synth::{FoilColors, perforated_foil};
use foil_metrology::{
    ClassifyConfig, Classifier, DiameterScanner, FoilGeometry, GaussianFit, Histogram,
    MaterialClass, NoProgress, PaletteSet, Rgb, ScanConfig, read_diameters, write_diameters,
};

fn geometry_1200() -> FoilGeometry {
    FoilGeometry {
        dpi: 1200.0,
        ..FoilGeometry::default()
    }
}

#[test]
fn synthetic_scan_measures_every_hole() {
    let g = geometry_1200();
    let foil = perforated_foil(&g, 8, 600, FoilColors::default());

    let classifier = Classifier::new(PaletteSet::reference(), ClassifyConfig::default());
    let labels = classifier
        .classify(&foil.image.as_view(), &NoProgress)
        .expect("classify");

    let scanner = DiameterScanner::new(g, ScanConfig::default()).expect("scanner");
    let scan = scanner.scan(&labels.as_view(), &NoProgress).expect("scan");

    assert_eq!(scan.columns.len(), 8);
    for (i, col) in scan.columns.iter().enumerate() {
        assert_eq!(col.diameters_mm.len(), foil.holes_in_column(i, &g), "column {i}");
    }
    assert_eq!(scan.hole_count(), foil.centers.len());

    let expected = 2.0 * foil.inner_radius_px * g.mm_per_px();
    for d in scan.flatten() {
        assert!(
            (d - expected).abs() <= 1.5 * g.mm_per_px(),
            "diameter {d} vs {expected}"
        );
    }
}

#[test]
fn labels_and_tri_tone_scans_agree() {
    let g = geometry_1200();
    let foil = perforated_foil(&g, 4, 400, FoilColors::default());
    let classifier = Classifier::new(PaletteSet::reference(), ClassifyConfig::default());
    let scanner = DiameterScanner::new(g, ScanConfig::default()).expect("scanner");

    let colors = classifier
        .classify(&foil.image.as_view(), &NoProgress)
        .expect("classify");
    let classes = classifier
        .classify_labels(&foil.image.as_view(), &NoProgress)
        .expect("labels");

    assert_eq!(
        classes.as_view().get(0, 0).copied(),
        Some(MaterialClass::Surface)
    );
    assert_eq!(colors.as_view().get(0, 0).copied(), Some(Rgb::BLACK));

    let a = scanner.scan(&colors.as_view(), &NoProgress).expect("scan");
    let b = scanner
        .scan_labels(&classes.as_view(), &NoProgress)
        .expect("scan labels");
    assert_eq!(a.flatten(), b.flatten());
}

#[test]
fn diameter_list_feeds_the_histogram() {
    let g = geometry_1200();
    let foil = perforated_foil(&g, 10, 800, FoilColors::default());
    let classifier = Classifier::default();
    let labels = classifier
        .classify(&foil.image.as_view(), &NoProgress)
        .expect("classify");
    let scan = DiameterScanner::new(g, ScanConfig::default())
        .expect("scanner")
        .scan(&labels.as_view(), &NoProgress)
        .expect("scan");

    let mut csv = Vec::new();
    write_diameters(&mut csv, &scan.flatten()).expect("write");
    let values = read_diameters(csv.as_slice()).expect("read");
    assert_eq!(values, scan.flatten());

    let hist = Histogram::auto(&values, g.mm_per_px()).expect("histogram");
    assert_eq!(hist.total(), values.len());
    let fit = GaussianFit::fit(&hist).expect("fit");
    assert!(fit.mean >= hist.min - g.mm_per_px() && fit.mean <= hist.max + g.mm_per_px());
}
