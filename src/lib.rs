//! # percentile-window
//!
//! Memory-bounded percentile estimation for long-running services.
//!
//! A [`PercentileWindow`] remembers the most recent `W` samples of a
//! measurement (request latencies, queue depths, ...) in sorted order and
//! reports one configured percentile of that sliding window. Memory use is
//! fixed at construction no matter how many samples are fed.
//!
//! ## Quick Start
//!
//! ```rust
//! use percentile_window::prelude::*;
//!
//! // p90 over the last 128 request latencies
//! let mut p90 = PercentileWindow::with_window(0.9, 128);
//! for latency_ms in [12.0, 15.0, 11.0, 230.0, 14.0] {
//!     p90.add(latency_ms);
//! }
//! println!("p90: {:?}", p90.value());
//! ```
//!
//! ## Several Percentiles
//!
//! Each estimator tracks exactly one percentile. [`PercentileSet`] groups
//! several of them behind a single `add`:
//!
//! ```rust
//! use percentile_window::PercentileSet;
//!
//! let mut timings = PercentileSet::new(&[0.5, 0.9, 0.95]);
//! for i in 1..=100 {
//!     timings.add(i as f64);
//! }
//! assert_eq!(timings.value(0.5), Some(51.0));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `serde`: Serialize estimates, (de)serialize [`WindowConfig`]
//! - `tracing`: Emit `tracing` events on construction and when a window fills

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub(crate) mod math;

// Core traits always available
pub mod traits;

pub mod quantiles;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::quantiles::{PercentileSet, PercentileWindow, WindowConfig};
}

pub use quantiles::{PercentileSet, PercentileWindow, WindowConfig, DEFAULT_WINDOW};
pub use traits::ConfigError;
