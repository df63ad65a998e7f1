//! Several percentiles of one measurement
//!
//! A [`PercentileWindow`] answers exactly one percentile. Services usually
//! want a handful (p50/p90/p99) of the same timing, so [`PercentileSet`]
//! owns one window per percentile and feeds them all from a single `add`.

use super::window::{PercentileWindow, DEFAULT_WINDOW};
use crate::traits::{ConfigError, Sketch};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// One [`PercentileWindow`] per tracked percentile, all over the same window size
///
/// # Example
///
/// ```
/// use percentile_window::PercentileSet;
///
/// let mut latency = PercentileSet::with_window(&[0.5, 0.9], 128);
/// for ms in 1..=10 {
///     latency.add(ms as f64);
/// }
/// assert_eq!(latency.value(0.5), Some(6.0));
/// assert_eq!(latency.value(0.9), Some(10.0));
/// assert_eq!(latency.value(0.99), None); // not tracked
/// ```
#[derive(Clone, Debug)]
pub struct PercentileSet {
    windows: Vec<PercentileWindow>,
}

impl PercentileSet {
    /// Track `percentiles` over the last [`DEFAULT_WINDOW`] samples
    ///
    /// # Panics
    ///
    /// Panics if `percentiles` is empty or contains a value outside (0, 1].
    pub fn new(percentiles: &[f64]) -> Self {
        Self::with_window(percentiles, DEFAULT_WINDOW)
    }

    /// Track `percentiles` over the last `window` samples
    ///
    /// # Panics
    ///
    /// Panics if `percentiles` is empty, contains a value outside (0, 1],
    /// or if `window` is zero.
    pub fn with_window(percentiles: &[f64], window: usize) -> Self {
        assert!(!percentiles.is_empty(), "at least one percentile is required");
        Self {
            windows: percentiles
                .iter()
                .map(|&p| PercentileWindow::with_window(p, window))
                .collect(),
        }
    }

    /// Fallible version of [`with_window`](Self::with_window)
    pub fn try_with_window(percentiles: &[f64], window: usize) -> Result<Self, ConfigError> {
        if percentiles.is_empty() {
            return Err(ConfigError::NoPercentiles);
        }
        let windows = percentiles
            .iter()
            .map(|&p| PercentileWindow::try_with_window(p, window))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { windows })
    }

    /// Add a sample to every window
    pub fn add(&mut self, value: f64) {
        for window in &mut self.windows {
            window.add(value);
        }
    }

    /// Estimate for `percentile`
    ///
    /// Returns `None` if `percentile` is not tracked or no sample has been added.
    pub fn value(&self, percentile: f64) -> Option<f64> {
        self.windows
            .iter()
            .find(|w| w.percentile() == percentile)
            .and_then(|w| w.value())
    }

    /// `(percentile, estimate)` pairs in construction order
    pub fn values(&self) -> Vec<(f64, Option<f64>)> {
        self.windows
            .iter()
            .map(|w| (w.percentile(), w.value()))
            .collect()
    }

    /// Iterate over the underlying windows
    pub fn iter(&self) -> impl Iterator<Item = &PercentileWindow> {
        self.windows.iter()
    }

    /// Number of tracked percentiles
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Always false: a set tracks at least one percentile
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Sketch for PercentileSet {
    type Item = f64;

    fn update(&mut self, item: &f64) {
        self.add(*item);
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + self.windows.iter().map(|w| w.size_bytes()).sum::<usize>()
    }

    fn count(&self) -> u64 {
        // every window sees the same stream
        self.windows.first().map_or(0, |w| w.items_seen())
    }
}

/// Label used as the serialized key, e.g. `p50`, `p99.9`
#[cfg(feature = "serde")]
fn label(percentile: f64) -> impl core::fmt::Display {
    struct Label(f64);

    impl core::fmt::Display for Label {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            // strip float noise such as 0.95 * 100 = 94.99999999999999
            write!(f, "p{}", crate::math::round(self.0 * 1e6) / 1e4)
        }
    }

    Label(percentile)
}

/// Serializes as a map from percentile label to estimate:
/// `{"p50": 12.0, "p90": 31.5}`.
#[cfg(feature = "serde")]
impl serde::Serialize for PercentileSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.windows.len()))?;
        for window in &self.windows {
            map.serialize_entry(&Key(window.percentile()), window)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct Key(f64);

#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&label(self.0))
    }
}
