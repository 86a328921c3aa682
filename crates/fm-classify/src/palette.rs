use fm_core::{Error, Rgb};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    /// Conductive copper surface.
    Surface,
    /// Annulus around the bore where the copper was etched away.
    OuterHole,
    /// Through-hole bore.
    InnerHole,
}

impl MaterialClass {
    /// All classes in tie-breaking priority order.
    pub const ALL: [Self; 3] = [Self::Surface, Self::OuterHole, Self::InnerHole];

    pub const fn index(self) -> usize {
        match self {
            Self::Surface => 0,
            Self::OuterHole => 1,
            Self::InnerHole => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::OuterHole => "outer_hole",
            Self::InnerHole => "inner_hole",
        }
    }

    /// Color written for this class in labeled images.
    pub const fn canonical_color(self) -> Rgb {
        match self {
            Self::Surface => Rgb::BLACK,
            Self::OuterHole => Rgb::gray(189),
            Self::InnerHole => Rgb::WHITE,
        }
    }

    pub fn from_canonical(color: Rgb) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.canonical_color() == color)
    }
}

/// Reference color samples for one material class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    samples: Vec<Rgb>,
}

impl Palette {
    pub fn new(class: MaterialClass, samples: Vec<Rgb>) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::EmptyPalette { class: class.name() });
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Rgb] {
        &self.samples
    }

    #[inline]
    pub fn min_distance_sq(&self, color: Rgb) -> u32 {
        self.samples
            .iter()
            .map(|s| s.distance_sq(color))
            .min()
            .unwrap_or(u32::MAX)
    }
}

/// One palette per [`MaterialClass`], indexed by [`MaterialClass::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaletteSamples", into = "PaletteSamples")]
pub struct PaletteSet {
    palettes: [Palette; 3],
}

impl PaletteSet {
    pub fn new(surface: Palette, outer_hole: Palette, inner_hole: Palette) -> Self {
        Self {
            palettes: [surface, outer_hole, inner_hole],
        }
    }

    pub fn from_samples(
        surface: Vec<Rgb>,
        outer_hole: Vec<Rgb>,
        inner_hole: Vec<Rgb>,
    ) -> Result<Self, Error> {
        Ok(Self::new(
            Palette::new(MaterialClass::Surface, surface)?,
            Palette::new(MaterialClass::OuterHole, outer_hole)?,
            Palette::new(MaterialClass::InnerHole, inner_hole)?,
        ))
    }

    /// Palettes sampled from a 3600 dpi scan of a copper-clad perforated
    /// foil.
    pub fn reference() -> Self {
        Self {
            palettes: [
                Palette {
                    samples: REFERENCE_SURFACE.to_vec(),
                },
                Palette {
                    samples: REFERENCE_OUTER_HOLE.to_vec(),
                },
                Palette {
                    samples: REFERENCE_INNER_HOLE.to_vec(),
                },
            ],
        }
    }

    pub fn get(&self, class: MaterialClass) -> &Palette {
        &self.palettes[class.index()]
    }

    pub fn sample_count(&self) -> usize {
        self.palettes.iter().map(|p| p.samples.len()).sum()
    }

    /// Class whose palette holds the nearest sample. Ties keep the earlier
    /// class.
    #[inline]
    pub fn classify(&self, color: Rgb) -> MaterialClass {
        let mut best = MaterialClass::Surface;
        let mut best_d = u32::MAX;
        for class in MaterialClass::ALL {
            let d = self.palettes[class.index()].min_distance_sq(color);
            if d < best_d {
                best_d = d;
                best = class;
            }
        }
        best
    }
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self::reference()
    }
}

#[derive(Serialize, Deserialize)]
struct PaletteSamples {
    surface: Vec<Rgb>,
    outer_hole: Vec<Rgb>,
    inner_hole: Vec<Rgb>,
}

impl TryFrom<PaletteSamples> for PaletteSet {
    type Error = Error;

    fn try_from(value: PaletteSamples) -> Result<Self, Self::Error> {
        Self::from_samples(value.surface, value.outer_hole, value.inner_hole)
    }
}

impl From<PaletteSet> for PaletteSamples {
    fn from(value: PaletteSet) -> Self {
        let [surface, outer_hole, inner_hole] = value.palettes;
        Self {
            surface: surface.samples,
            outer_hole: outer_hole.samples,
            inner_hole: inner_hole.samples,
        }
    }
}

const REFERENCE_SURFACE: [Rgb; 12] = [
    Rgb::new(0, 0, 0),
    Rgb::new(99, 52, 8),
    Rgb::new(64, 32, 2),
    Rgb::new(63, 21, 0),
    Rgb::new(180, 119, 60),
    Rgb::new(119, 76, 15),
    Rgb::new(135, 90, 44),
    Rgb::new(255, 254, 187),
    Rgb::new(110, 71, 30),
    Rgb::new(50, 10, 0),
    Rgb::new(184, 126, 75),
    Rgb::new(172, 127, 86),
];

const REFERENCE_OUTER_HOLE: [Rgb; 12] = [
    Rgb::new(120, 115, 72),
    Rgb::new(115, 147, 124),
    Rgb::new(126, 123, 78),
    Rgb::new(158, 156, 124),
    Rgb::new(116, 113, 64),
    Rgb::new(119, 112, 66),
    Rgb::new(156, 146, 111),
    Rgb::new(129, 119, 81),
    Rgb::new(144, 144, 111),
    Rgb::new(121, 117, 80),
    Rgb::new(99, 96, 60),
    Rgb::new(144, 136, 103),
];

const REFERENCE_INNER_HOLE: [Rgb; 15] = [
    Rgb::new(116, 110, 54),
    Rgb::new(126, 118, 65),
    Rgb::new(98, 89, 32),
    Rgb::new(149, 138, 98),
    Rgb::new(150, 137, 91),
    Rgb::new(118, 111, 63),
    Rgb::new(107, 103, 52),
    Rgb::new(115, 98, 48),
    Rgb::new(123, 99, 43),
    Rgb::new(118, 100, 47),
    Rgb::new(43, 34, 2),
    Rgb::new(87, 80, 36),
    Rgb::new(58, 50, 1),
    Rgb::new(89, 86, 33),
    Rgb::new(175, 163, 120),
];
