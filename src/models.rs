// src/models.rs

use std::collections::HashMap;

/// Snapshot of every known measurement name mapped to its average duration
/// in fractional milliseconds. Owned by the caller; later registry mutation
/// never shows up in it.
pub type StatsSnapshot = HashMap<String, f64>;

/// One row of the statistics report.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementStats {
    /// The caller-chosen measurement name.
    pub name: String,
    /// Mean of all samples, in fractional milliseconds.
    pub average_ms: f64,
    /// Number of samples recorded under `name`. Never zero.
    pub count: usize,
}

/// The samples recorded under a single name, in nanoseconds, oldest first.
///
/// Only ever constructed with a first sample, so a `Samples` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samples {
    nanos: Vec<u64>,
}

impl Samples {
    /// Starts a new sequence with its first sample.
    pub fn first(nanos: u64) -> Self {
        Self { nanos: vec![nanos] }
    }

    /// Appends a sample.
    pub fn push(&mut self, nanos: u64) {
        self.nanos.push(nanos);
    }

    /// Number of samples held. At least one.
    pub fn count(&self) -> usize {
        self.nanos.len()
    }

    /// Arithmetic mean in fractional milliseconds.
    ///
    /// The sum is accumulated in a `u128` and divided by the count once,
    /// then converted to milliseconds.
    pub fn average_ms(&self) -> f64 {
        let total: u128 = self.nanos.iter().map(|&n| u128::from(n)).sum();
        let mean_nanos = total as f64 / self.nanos.len() as f64;
        mean_nanos / crate::constants::NANOS_PER_MILLI as f64
    }
}
