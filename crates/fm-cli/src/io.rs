use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fm_core::{Image, Rgb};
use image::RgbImage;

/// Decodes any supported image file into 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<Image<Rgb>> {
    let rgb = image::open(path)
        .with_context(|| format!("opening input image {}", path.display()))?
        .into_rgb8();
    let (w, h) = rgb.dimensions();
    let data = rgb
        .into_raw()
        .chunks_exact(3)
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .collect();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing image from {}", path.display()))
}

/// Writes `img` in the format implied by the file extension.
pub fn save_rgb(path: &Path, img: &Image<Rgb>) -> Result<()> {
    let raw: Vec<u8> = img.data().iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let out = RgbImage::from_raw(img.width() as u32, img.height() as u32, raw)
        .context("constructing RgbImage from raw bytes")?;
    out.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

/// `dir/photo.jpg` with suffix `_labels.png` gives `dir/photo_labels.png`.
pub fn derived_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_owned());
    input.with_file_name(format!("{stem}{suffix}"))
}
