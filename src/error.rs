use std::fmt;

#[derive(Debug)]
pub enum QstError {
    FormatMismatch { offset: usize },
    TruncatedInput { expected: usize, got: usize },
    ChecksumMismatch { method: usize },
    UnknownFormat,
    InvalidMethod(usize),
    /// Section table of a decoded payload runs past its end.
    SectionOverrun {
        offset: usize,
        needed: usize,
        available: usize,
    },
    ContainerDecodeFailed(String),
    CantOpenFile(std::io::Error),
    CantOpenDestFile(std::io::Error),
    Io(std::io::Error),
}

/// Coarse classification of a [`QstError`], as reported to callers of the
/// decode entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Malformed,
    UnknownFormat,
    ContainerDecodeFailed,
    Usage,
    Io,
}

impl QstError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FormatMismatch { .. }
            | Self::TruncatedInput { .. }
            | Self::SectionOverrun { .. } => ErrorKind::Malformed,
            // A single pinned method that fails verification is still an
            // unrecognised file from the caller's point of view.
            Self::ChecksumMismatch { .. } | Self::UnknownFormat => ErrorKind::UnknownFormat,
            Self::ContainerDecodeFailed(_) => ErrorKind::ContainerDecodeFailed,
            Self::InvalidMethod(_) => ErrorKind::Usage,
            Self::CantOpenFile(_) | Self::CantOpenDestFile(_) | Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for QstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatMismatch { offset } => {
                write!(f, "not a quest file (preamble mismatch at byte {offset})")
            }
            Self::TruncatedInput { expected, got } => {
                write!(f, "truncated file: need at least {expected} bytes, got {got}")
            }
            Self::ChecksumMismatch { method } => {
                write!(f, "checksum mismatch for encoding method {method}")
            }
            Self::UnknownFormat => write!(f, "unknown quest format (no encoding method matched)"),
            Self::InvalidMethod(m) => write!(f, "invalid encoding method: {m}"),
            Self::SectionOverrun {
                offset,
                needed,
                available,
            } => write!(
                f,
                "corrupt section table: section at byte {offset} needs {needed} bytes, \
                 only {available} left in quest data"
            ),
            Self::ContainerDecodeFailed(s) => write!(f, "container decode failed: {s}"),
            Self::CantOpenFile(e) => write!(f, "can't open quest file: {e}"),
            Self::CantOpenDestFile(e) => write!(f, "can't open dest file: {e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QstError {}

impl From<std::io::Error> for QstError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type QstResult<T> = Result<T, QstError>;
