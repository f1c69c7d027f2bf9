//! `loglog-sketch` estimates the number of distinct elements in a stream or dataset using a
//! fixed amount of memory.
//!
//! It implements HyperLogLog with bit-packed 6-bit registers, sized from a target relative
//! standard error, and a three-range corrected estimator.
//!
//! ```
//! use loglog_sketch::Sketch;
//!
//! let mut sketch = Sketch::new(0.02).unwrap();
//! for i in 0..10_000 {
//!     sketch.insert(&i);
//! }
//! let estimate = sketch.estimate();
//! assert!((estimate - 10_000.0).abs() / 10_000.0 < 0.1);
//! ```
pub mod config;
pub mod correction;
mod error;
mod registers;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;

pub use config::{DEFAULT_ERROR_RATE, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION};
pub use correction::Regime;
pub use error::SketchError;
pub use registers::{MAX_RANK, REGISTER_WIDTH};
pub use sketch::Sketch;
