use std::fmt;

use crate::config::{MAX_PRECISION, MIN_PRECISION};

/// Errors returned when a `Sketch` cannot be built from the supplied parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchError {
    /// Target standard error outside of the `(0, 1)` range.
    InvalidErrorRate(f64),
    /// Precision outside of the `[MIN_PRECISION, MAX_PRECISION]` range.
    InvalidPrecision(u32),
    /// Register buffer length does not match the precision it was paired with.
    InvalidRegisters { expected: usize, actual: usize },
    /// Register buffer for a valid precision does not fit in memory.
    AllocationFailed { registers: u64 },
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidErrorRate(rate) => {
                write!(f, "error_rate must be in (0, 1), got {}", rate)
            }
            SketchError::InvalidPrecision(p) => write!(
                f,
                "precision must be in [{}, {}], got {}",
                MIN_PRECISION, MAX_PRECISION, p
            ),
            SketchError::InvalidRegisters { expected, actual } => write!(
                f,
                "register buffer must hold {} words, got {}",
                expected, actual
            ),
            SketchError::AllocationFailed { registers } => {
                write!(f, "cannot allocate {} registers", registers)
            }
        }
    }
}

impl std::error::Error for SketchError {}
