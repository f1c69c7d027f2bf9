//! Sketch sizing.
//!
//! The standard error of a HyperLogLog sketch with `m` registers is roughly `1.04 / sqrt(m)`,
//! so a target error rate `ε` needs `(1.04 / ε)^2` registers. That figure is rounded up to the
//! next power of two so the top `p = log2(m)` bits of a hash can select a register directly.
//!
//! Resulting sizes for a few error rates:
//! - `ε = 0.05`: `m = 512`, `p = 9`
//! - `ε = 0.02`: `m = 4096`, `p = 12`
//! - `ε = 0.01`: `m = 16384`, `p = 14`

use crate::error::SketchError;

/// Error rate used by `Sketch::default`
pub const DEFAULT_ERROR_RATE: f64 = 0.02;
/// Precision matching `DEFAULT_ERROR_RATE`
pub const DEFAULT_PRECISION: u32 = 12;
/// Smallest supported precision
pub const MIN_PRECISION: u32 = 1;
/// Largest supported precision, leaving at least `REGISTER_WIDTH` bits of hash for the rank
pub const MAX_PRECISION: u32 = 58;

/// Number of registers needed to reach `error_rate` standard error, rounded up to a power of two.
pub fn register_count(error_rate: f64) -> Result<usize, SketchError> {
    // negated so NaN is rejected too
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(SketchError::InvalidErrorRate(error_rate));
    }
    let raw = (1.04 / error_rate).powi(2);
    let exponent = raw.log2().ceil();
    if exponent > f64::from(MAX_PRECISION) {
        return Err(SketchError::InvalidPrecision(exponent as u32));
    }
    let precision = exponent as u32;
    1usize
        .checked_shl(precision)
        .ok_or(SketchError::AllocationFailed {
            registers: 1 << precision,
        })
}

/// Number of hash bits used to address `m` registers.
#[inline]
pub fn precision(m: usize) -> u32 {
    debug_assert!(m.is_power_of_two());
    m.trailing_zeros()
}

/// Check that `p` is within the supported precision range.
#[inline]
pub(crate) fn validate_precision(p: u32) -> Result<u32, SketchError> {
    if (MIN_PRECISION..=MAX_PRECISION).contains(&p) {
        Ok(p)
    } else {
        Err(SketchError::InvalidPrecision(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.5 => 8; "half")]
    #[test_case(0.1 => 128; "ten percent")]
    #[test_case(0.05 => 512; "five percent")]
    #[test_case(0.02 => 4096; "two percent")]
    #[test_case(0.01 => 16384; "one percent")]
    #[test_case(0.99 => 2; "almost one")]
    fn test_register_count(error_rate: f64) -> usize {
        register_count(error_rate).unwrap()
    }

    #[test_case(0.0; "zero")]
    #[test_case(1.0; "one")]
    #[test_case(-0.02; "negative")]
    #[test_case(1.5; "above one")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinity")]
    fn test_register_count_rejects(error_rate: f64) {
        assert!(matches!(
            register_count(error_rate),
            Err(SketchError::InvalidErrorRate(_))
        ));
    }

    #[test]
    fn test_register_count_too_precise() {
        assert!(matches!(
            register_count(1e-12),
            Err(SketchError::InvalidPrecision(80))
        ));
    }

    #[test_case(2 => 1)]
    #[test_case(16 => 4)]
    #[test_case(4096 => 12)]
    #[test_case(1 << 20 => 20)]
    fn test_precision(m: usize) -> u32 {
        precision(m)
    }

    #[test]
    fn test_default_precision() {
        assert_eq!(
            precision(register_count(DEFAULT_ERROR_RATE).unwrap()),
            DEFAULT_PRECISION
        );
    }

    #[test]
    fn test_validate_precision() {
        assert_eq!(validate_precision(1), Ok(1));
        assert_eq!(validate_precision(58), Ok(58));
        assert_eq!(validate_precision(0), Err(SketchError::InvalidPrecision(0)));
        assert_eq!(
            validate_precision(59),
            Err(SketchError::InvalidPrecision(59))
        );
    }
}
