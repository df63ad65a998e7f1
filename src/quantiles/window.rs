//! Sliding-window percentile estimator
//!
//! Keeps the last `W` samples in a sorted array, with an insertion-order
//! ring alongside it to know which sample to evict next. Queries index the
//! sorted array directly, so they are O(1); insertion is an O(log W) search
//! plus at most O(W) element movement.
//!
//! # Thread Safety
//!
//! `PercentileWindow` has no internal synchronization. Mutation takes
//! `&mut self`; to share one window across producers wrap it in
//! `Arc<Mutex<_>>`, or give each worker its own window.

use crate::math;
use crate::traits::{ConfigError, PercentileSketch, Sketch};

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Window capacity used by [`PercentileWindow::new`]
pub const DEFAULT_WINDOW: usize = 256;

fn check_percentile(percentile: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons
    if percentile > 0.0 && percentile <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidPercentile(percentile))
    }
}

fn check_window(window: usize) -> Result<(), ConfigError> {
    if window == 0 {
        Err(ConfigError::InvalidWindow(window))
    } else {
        Ok(())
    }
}

/// Construction parameters for a [`PercentileWindow`]
///
/// Services that read their telemetry settings from a config file can
/// deserialize this (with the `serde` feature) and call [`build`](Self::build).
///
/// ```
/// use percentile_window::WindowConfig;
///
/// let config = WindowConfig { percentile: 0.99, window: 512 };
/// let p99 = config.build().unwrap();
/// assert_eq!(p99.capacity(), 512);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowConfig {
    /// Target percentile in (0, 1]
    pub percentile: f64,
    /// Number of most recent samples kept
    pub window: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            percentile: 0.5,
            window: DEFAULT_WINDOW,
        }
    }
}

impl WindowConfig {
    /// Check both parameters without building an estimator
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percentile(self.percentile)?;
        check_window(self.window)
    }

    /// Build an estimator from this configuration
    pub fn build(&self) -> Result<PercentileWindow, ConfigError> {
        PercentileWindow::try_with_window(self.percentile, self.window)
    }
}

/// Percentile estimator over the most recent samples of a stream
///
/// Tracks one target percentile over a sliding window of the last
/// `capacity` samples:
///
/// - **Filling**: until `capacity` samples have arrived, each sample is
///   inserted at its sorted position.
/// - **Steady state**: afterwards every sample evicts the oldest resident
///   sample (FIFO, regardless of its value) and takes its place in sorted
///   order, so the window size stays at `capacity`.
///
/// The estimate is `window[round(percentile * len)]`, clamped to the last
/// index. Before the first sample there is no estimate and
/// [`value`](Self::value) returns `None`.
///
/// NaN samples are ignored. Infinities are stored and ordered like any
/// other value.
///
/// # Example
///
/// ```
/// use percentile_window::PercentileWindow;
///
/// let mut median = PercentileWindow::with_window(0.5, 4);
/// assert_eq!(median.value(), None);
///
/// for v in [5.0, 1.0, 9.0, 3.0] {
///     median.add(v);
/// }
/// assert_eq!(median.window(), &[1.0, 3.0, 5.0, 9.0]);
///
/// // 5.0 is the oldest sample, so it is the one evicted
/// median.add(2.0);
/// assert_eq!(median.window(), &[1.0, 2.0, 3.0, 9.0]);
/// assert_eq!(median.value(), Some(3.0));
/// ```
#[derive(Clone, Debug)]
pub struct PercentileWindow {
    /// Target percentile in (0, 1]
    percentile: f64,
    /// Maximum number of resident samples
    capacity: usize,
    /// Resident samples, ascending by `f64::total_cmp`
    sorted: Vec<f64>,
    /// Resident samples in arrival order, used as a ring once full
    ring: Vec<f64>,
    /// Next ring slot to write; the oldest sample once the window is full
    head: usize,
    /// Number of samples accepted
    count: u64,
}

impl PercentileWindow {
    /// Create an estimator for `percentile` over the last [`DEFAULT_WINDOW`] samples
    ///
    /// # Panics
    ///
    /// Panics if `percentile` is NaN or outside (0, 1].
    pub fn new(percentile: f64) -> Self {
        Self::with_window(percentile, DEFAULT_WINDOW)
    }

    /// Create an estimator for `percentile` over the last `window` samples
    ///
    /// # Arguments
    ///
    /// * `percentile` - Target percentile in (0, 1], e.g. 0.9 for p90
    /// * `window` - Number of most recent samples to keep
    ///
    /// # Panics
    ///
    /// Panics if `percentile` is NaN or outside (0, 1], or if `window` is zero.
    pub fn with_window(percentile: f64, window: usize) -> Self {
        assert!(
            check_percentile(percentile).is_ok(),
            "percentile must be in (0, 1], got {}",
            percentile
        );
        assert!(window > 0, "window must be positive");

        Self::new_unchecked(percentile, window)
    }

    /// Fallible version of [`new`](Self::new)
    pub fn try_new(percentile: f64) -> Result<Self, ConfigError> {
        Self::try_with_window(percentile, DEFAULT_WINDOW)
    }

    /// Fallible version of [`with_window`](Self::with_window)
    pub fn try_with_window(percentile: f64, window: usize) -> Result<Self, ConfigError> {
        check_percentile(percentile)?;
        check_window(window)?;
        Ok(Self::new_unchecked(percentile, window))
    }

    fn new_unchecked(percentile: f64, capacity: usize) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(percentile, capacity, "percentile window created");

        Self {
            percentile,
            capacity,
            sorted: Vec::with_capacity(capacity),
            ring: Vec::with_capacity(capacity),
            head: 0,
            count: 0,
        }
    }

    /// Add a sample, evicting the oldest one if the window is full
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;

        if self.sorted.len() < self.capacity {
            let pos = self.insert_position(value);
            self.sorted.insert(pos, value);
            self.ring.push(value);
            self.head = (self.head + 1) % self.capacity;

            #[cfg(feature = "tracing")]
            {
                if self.sorted.len() == self.capacity {
                    tracing::debug!(
                        percentile = self.percentile,
                        capacity = self.capacity,
                        "percentile window full, evicting oldest samples from now on"
                    );
                }
            }
        } else {
            let oldest = core::mem::replace(&mut self.ring[self.head], value);
            self.head = (self.head + 1) % self.capacity;
            self.replace(oldest, value);
        }
    }

    /// Swap `oldest` for `value` in the sorted array with a single shift
    /// of the elements between their two positions.
    fn replace(&mut self, oldest: f64, value: f64) {
        // total_cmp equality is bit equality, so any match is the sample to drop
        let at = self.insert_position(oldest);
        debug_assert!(self.sorted[at].total_cmp(&oldest).is_eq());

        let pos = self.insert_position(value);
        if pos <= at {
            self.sorted.copy_within(pos..at, pos + 1);
            self.sorted[pos] = value;
        } else {
            self.sorted.copy_within(at + 1..pos, at);
            self.sorted[pos - 1] = value;
        }
    }

    /// First index whose element is not less than `value`
    #[inline]
    fn insert_position(&self, value: f64) -> usize {
        self.sorted.partition_point(|v| v.total_cmp(&value).is_lt())
    }

    /// Current estimate of the target percentile
    ///
    /// Returns `None` if no sample has been added yet.
    pub fn value(&self) -> Option<f64> {
        let len = self.sorted.len();
        if len == 0 {
            return None;
        }
        let rank = math::round(self.percentile * len as f64) as usize;
        Some(self.sorted[rank.min(len - 1)])
    }

    /// Target percentile
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Maximum number of samples kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Check if no sample has been added yet
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Check if the window has filled and now evicts on every add
    pub fn is_full(&self) -> bool {
        self.sorted.len() >= self.capacity
    }

    /// Number of samples accepted since construction
    pub fn items_seen(&self) -> u64 {
        self.count
    }

    /// Resident samples in ascending order
    pub fn window(&self) -> &[f64] {
        &self.sorted
    }

    /// Smallest resident sample
    pub fn min(&self) -> Option<f64> {
        self.sorted.first().copied()
    }

    /// Largest resident sample
    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }
}

impl Default for PercentileWindow {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Sketch for PercentileWindow {
    type Item = f64;

    fn update(&mut self, item: &f64) {
        PercentileWindow::add(self, *item);
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
            + (self.sorted.capacity() + self.ring.capacity()) * core::mem::size_of::<f64>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl PercentileSketch for PercentileWindow {
    fn add(&mut self, value: f64) {
        PercentileWindow::add(self, value);
    }

    fn value(&self) -> Option<f64> {
        PercentileWindow::value(self)
    }

    fn percentile(&self) -> f64 {
        self.percentile
    }
}

/// Serializes as the current estimate, `null` when empty.
#[cfg(feature = "serde")]
impl serde::Serialize for PercentileWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match PercentileWindow::value(self) {
            Some(v) => serializer.serialize_some(&v),
            None => serializer.serialize_none(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
