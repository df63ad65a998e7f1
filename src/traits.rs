//! Core traits for windowed estimators
//!
//! Estimators implement the base [`Sketch`] trait for sample ingestion and
//! bookkeeping, and [`PercentileSketch`] for the percentile query itself.

use core::fmt::Debug;

/// Error constructing an estimator from invalid parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Target percentile is NaN or outside (0, 1]
    InvalidPercentile(f64),
    /// Window capacity is zero
    InvalidWindow(usize),
    /// No percentiles were requested
    NoPercentiles,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidPercentile(p) => {
                write!(f, "percentile must be in (0, 1], got {}", p)
            }
            ConfigError::InvalidWindow(w) => {
                write!(f, "window must be positive, got {}", w)
            }
            ConfigError::NoPercentiles => write!(f, "at least one percentile is required"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Core trait for streaming estimators
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Estimators reporting a single, fixed percentile
pub trait PercentileSketch: Sketch<Item = f64> {
    /// Add a sample
    fn add(&mut self, value: f64);

    /// Current estimate of the target percentile, `None` before any sample
    fn value(&self) -> Option<f64>;

    /// Target percentile in (0, 1]
    fn percentile(&self) -> f64;
}
