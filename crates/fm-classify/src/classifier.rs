use std::time::Instant;

use fm_core::{Error, Image, ImageView, ImageViewMut, ProgressObserver, ProgressTracker, Rgb};

use crate::palette::{MaterialClass, PaletteSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyConfig {
    /// Classify rows on the rayon pool. Ignored without the `rayon` feature.
    pub parallel: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "rayon"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    palettes: PaletteSet,
    cfg: ClassifyConfig,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PaletteSet::reference(), ClassifyConfig::default())
    }
}

impl Classifier {
    pub fn new(palettes: PaletteSet, cfg: ClassifyConfig) -> Self {
        Self { palettes, cfg }
    }

    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    pub fn config(&self) -> &ClassifyConfig {
        &self.cfg
    }

    #[inline]
    pub fn classify_pixel(&self, color: Rgb) -> MaterialClass {
        self.palettes.classify(color)
    }

    /// Returns a tri-tone copy of `src` holding only canonical class colors.
    pub fn classify<O>(&self, src: &ImageView<'_, Rgb>, progress: &O) -> Result<Image<Rgb>, Error>
    where
        O: ProgressObserver + ?Sized,
    {
        ensure_not_empty(src.width(), src.height())?;
        let mut out = src.to_image();
        self.classify_in_place(&mut out.as_view_mut(), progress)?;
        Ok(out)
    }

    /// Overwrites every pixel of `img` with its canonical class color.
    pub fn classify_in_place<O>(
        &self,
        img: &mut ImageViewMut<'_, Rgb>,
        progress: &O,
    ) -> Result<(), Error>
    where
        O: ProgressObserver + ?Sized,
    {
        ensure_not_empty(img.width(), img.height())?;
        let (width, height) = (img.width(), img.height());
        let t0 = Instant::now();

        let tracker = ProgressTracker::new(progress, height);
        self.for_each_row(img, &tracker, |_, row| {
            for px in row.iter_mut() {
                *px = self.palettes.classify(*px).canonical_color();
            }
        });

        tracing::info!(
            "classified {width}x{height} px against {} reference colors in {:.3}s",
            self.palettes.sample_count(),
            t0.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Returns the class of every pixel of `src`.
    pub fn classify_labels<O>(
        &self,
        src: &ImageView<'_, Rgb>,
        progress: &O,
    ) -> Result<Image<MaterialClass>, Error>
    where
        O: ProgressObserver + ?Sized,
    {
        ensure_not_empty(src.width(), src.height())?;
        let mut out = Image::new_fill(src.width(), src.height(), MaterialClass::Surface);

        let tracker = ProgressTracker::new(progress, src.height());
        self.for_each_row(&mut out.as_view_mut(), &tracker, |y, row| {
            for (dst, &px) in row.iter_mut().zip(src.row(y)) {
                *dst = self.palettes.classify(px);
            }
        });

        Ok(out)
    }

    fn for_each_row<T, O, F>(
        &self,
        img: &mut ImageViewMut<'_, T>,
        tracker: &ProgressTracker<'_, O>,
        f: F,
    ) where
        T: Send,
        O: ProgressObserver + ?Sized,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            use rayon::prelude::*;

            img.par_rows_mut().for_each(|(y, row)| {
                f(y, row);
                tracker.advance(1);
            });
            return;
        }

        for (y, row) in img.rows_mut() {
            f(y, row);
            tracker.advance(1);
        }
    }
}

fn ensure_not_empty(width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage);
    }
    Ok(())
}
