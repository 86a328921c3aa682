use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &mut self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.stride + x;
        self.data.get(idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + use<'a, T> {
        let (data, width, stride) = (self.data, self.width, self.stride);
        (0..self.height).map(move |y| &data[y * stride..y * stride + width])
    }

    /// Builds a new contiguous image by applying `f` to every pixel.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Image<U> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(&mut f));
        }

        Image {
            width: self.width,
            height: self.height,
            data: out,
        }
    }
}

impl<T: Clone> ImageView<'_, T> {
    pub fn to_image(&self) -> Image<T> {
        self.map(T::clone)
    }
}

#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<'a, T> ImageViewMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterates over `(y, row)` pairs, each row trimmed to `width`.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [T])> {
        let width = self.width;
        let stride = self.stride.max(1);
        self.valid_data_mut()
            .chunks_mut(stride)
            .map(move |row| &mut row[..width])
            .enumerate()
    }

    /// Parallel counterpart of [`ImageViewMut::rows_mut`]. Rows are disjoint,
    /// so workers never share an output element.
    #[cfg(feature = "rayon")]
    pub fn par_rows_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = (usize, &mut [T])>
    where
        T: Send,
    {
        use rayon::prelude::*;

        let width = self.width;
        let stride = self.stride.max(1);
        self.valid_data_mut()
            .par_chunks_mut(stride)
            .map(move |row| &mut row[..width])
            .enumerate()
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: self.data,
        }
    }

    fn valid_data_mut(&mut self) -> &mut [T] {
        let len = if self.width == 0 {
            0
        } else {
            min_required_len(self.width, self.height, self.stride)
                .expect("view invariants guarantee a representable length")
        };
        &mut self.data[..len]
    }
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}
