use serde::{Deserialize, Serialize};

/// 8-bit RGB color. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Squared Euclidean distance in RGB space.
    ///
    /// Exact in integers, and orders colors the same way as the Euclidean
    /// distance, so comparisons (including ties) need no square root.
    #[inline]
    pub fn distance_sq(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }

    pub fn distance(self, other: Self) -> f64 {
        f64::from(self.distance_sq(other)).sqrt()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}
