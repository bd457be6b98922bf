use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;
use rand_distr::NormalError;

/// The result type used in the entire evolution module.
pub type Result<T> = std::result::Result<T, EsErr>;

/// The evolution module's error type.
#[derive(Debug)]
pub enum EsErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    OutOfRange {
        start: usize,
        len: usize,
        size: usize,
    },
    InvalidArchitecture(String),
    InvalidDistribution(String),
    Shape(ShapeError),
}

impl Display for EsErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EsErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "size mismatch in {what}: got {got}, expected {expected}"),
            EsErr::OutOfRange { start, len, size } => write!(
                f,
                "noise range {start}..{} is out of bounds for a table of size {size}",
                start.saturating_add(*len)
            ),
            EsErr::InvalidArchitecture(msg) => write!(f, "invalid architecture: {msg}"),
            EsErr::InvalidDistribution(msg) => write!(f, "invalid distribution: {msg}"),
            EsErr::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl Error for EsErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EsErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for EsErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<NormalError> for EsErr {
    fn from(value: NormalError) -> Self {
        Self::InvalidDistribution(value.to_string())
    }
}
