//! Sliding-window percentile estimation
//!
//! This module provides estimators that report a percentile over the most
//! recent samples of a stream, with memory fixed at construction.
//!
//! # Estimators
//!
//! - [`PercentileWindow`]: one target percentile over the last `W` samples
//! - [`PercentileSet`]: several percentiles of the same stream
//!
//! # Example
//!
//! ```
//! use percentile_window::quantiles::PercentileWindow;
//!
//! let mut p50 = PercentileWindow::new(0.5);
//!
//! for value in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0] {
//!     p50.add(value);
//! }
//!
//! let median = p50.value();
//! println!("Median: {:?}", median);
//! ```

mod set;
mod window;

pub use set::PercentileSet;
pub use window::{PercentileWindow, WindowConfig, DEFAULT_WINDOW};
