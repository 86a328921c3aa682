use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fm_classify::PaletteSet;
use fm_core::FoilGeometry;
use serde::{Deserialize, Serialize};

/// Settings file accepted by `--config`.
///
/// ```json
/// { "geometry": { "dpi": 2400.0 }, "palettes": { "surface": [[0, 0, 0]], ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoilConfig {
    pub geometry: FoilGeometry,
    /// Replaces the built-in reference palettes when present.
    pub palettes: Option<PaletteSet>,
}

impl FoilConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn palettes(&self) -> PaletteSet {
        self.palettes.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use fm_classify::{MaterialClass, PaletteSet};
    use fm_core::{FoilGeometry, Rgb};

    use super::FoilConfig;

    #[test]
    fn empty_object_is_the_reference_setup() {
        let cfg: FoilConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg.geometry, FoilGeometry::default());
        assert_eq!(cfg.palettes(), PaletteSet::reference());
    }

    #[test]
    fn partial_geometry_keeps_other_defaults() {
        let cfg: FoilConfig =
            serde_json::from_str(r#"{ "geometry": { "dpi": 2400.0 } }"#).expect("parse");
        assert_eq!(cfg.geometry.dpi, 2400.0);
        assert_eq!(cfg.geometry.pitch_mm, FoilGeometry::default().pitch_mm);
    }

    #[test]
    fn custom_palettes_replace_reference() {
        let json = r#"{
            "palettes": {
                "surface": [[0, 0, 0]],
                "outer_hole": [[189, 189, 189]],
                "inner_hole": [[255, 255, 255], [250, 250, 250]]
            }
        }"#;
        let cfg: FoilConfig = serde_json::from_str(json).expect("parse");
        let palettes = cfg.palettes();
        assert_eq!(palettes.sample_count(), 4);
        assert_eq!(palettes.classify(Rgb::WHITE), MaterialClass::InnerHole);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let json = r#"{ "palettes": { "surface": [], "outer_hole": [[1, 1, 1]], "inner_hole": [[2, 2, 2]] } }"#;
        assert!(serde_json::from_str::<FoilConfig>(json).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<FoilConfig>(r#"{ "geometri": {} }"#).is_err());
    }

    #[test]
    fn misspelled_geometry_key_is_rejected() {
        let json = r#"{ "geometry": { "inner_diameter": 0.25, "pitch": 2.0 } }"#;
        let err = serde_json::from_str::<FoilConfig>(json).unwrap_err();
        assert!(err.to_string().contains("inner_diameter"), "{err}");
    }
}
