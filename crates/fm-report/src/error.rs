use core::fmt;
use std::io;
use std::path::PathBuf;

use fm_core::ErrorKind;

#[derive(Debug)]
pub enum ReportError {
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },
    Parse {
        line: usize,
        text: String,
    },
    NonFinite {
        index: usize,
    },
    Empty,
    InvalidResolution(f64),
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::ResourceUnavailable,
            _ => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            path: Some(path),
            source,
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(source: io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "i/o error on {}: {source}", path.display()),
            Self::Io { path: None, source } => write!(f, "i/o error: {source}"),
            Self::Parse { line, text } => {
                write!(f, "line {line}: cannot parse {text:?} as a diameter")
            }
            Self::NonFinite { index } => write!(f, "value #{index} is not finite"),
            Self::Empty => write!(f, "no diameter values"),
            Self::InvalidResolution(v) => {
                write!(f, "bin resolution must be finite and positive, got {v}")
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
