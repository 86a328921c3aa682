use core::fmt;

/// Coarse classification of [`Error`] values for callers that only need to
/// decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed image, empty palette, bad geometry or an unfittable layout.
    InvalidInput,
    /// An image or output path could not be read or written.
    ResourceUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    SizeMismatch { expected: usize, actual: usize },
    InvalidStride,
    EmptyImage,
    EmptyPalette { class: &'static str },
    InvalidGeometry { name: &'static str, value: f64 },
    ThresholdTooSmall { inner_diameter_px: f64 },
    WindowOutOfBounds { start_px: f64 },
    NoColumnWindows { image_width: usize, first_window_end_px: f64 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidStride => write!(f, "invalid stride"),
            Self::EmptyImage => write!(f, "image has no pixels"),
            Self::EmptyPalette { class } => write!(f, "palette for {class} has no samples"),
            Self::InvalidGeometry { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::ThresholdTooSmall { inner_diameter_px } => write!(
                f,
                "inner diameter of {inner_diameter_px:.3} px gives a zero-pixel detection threshold"
            ),
            Self::WindowOutOfBounds { start_px } => {
                write!(f, "first column window starts outside the image at x={start_px:.3}")
            }
            Self::NoColumnWindows {
                image_width,
                first_window_end_px,
            } => write!(
                f,
                "no column window fits: first window ends at x={first_window_end_px:.3}, image width is {image_width}"
            ),
        }
    }
}

impl std::error::Error for Error {}
