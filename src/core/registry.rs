// src/core/registry.rs

use crate::{
    VerboseFlag,
    config::ProfilerConfig,
    core::{
        report,
        sink::{LogCrateSink, LogSink},
        timer::ScopedTimer,
    },
    models::{MeasurementStats, Samples, StatsSnapshot},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, atomic::Ordering},
    time::{Duration, Instant},
};

/// Aggregates named timing samples into running averages.
///
/// The sample map is guarded by a single mutex. The lock is only held for
/// the bookkeeping step of each call, never while a measured operation runs,
/// so timed blocks may nest and may run on several threads at once.
#[derive(Debug)]
pub struct Registry {
    samples: Mutex<HashMap<String, Samples>>,
    sink: Arc<dyn LogSink>,
    verbose: VerboseFlag,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Arc::new(LogCrateSink::default()), VerboseFlag::default())
    }
}

impl Registry {
    /// Creates an empty registry that writes to `sink` and consults `verbose`
    /// on every recorded sample.
    pub fn new(sink: Arc<dyn LogSink>, verbose: VerboseFlag) -> Self {
        Self {
            samples: Mutex::new(HashMap::new()),
            sink,
            verbose,
        }
    }

    /// Creates an empty registry from a loaded configuration, writing through
    /// the `log` facade.
    pub fn from_config(config: &ProfilerConfig) -> Self {
        let sink = LogCrateSink::new(config.log_target.clone(), config.log_level.into());
        Self::new(Arc::new(sink), config.verbose_flag())
    }

    /// The verbose flag this registry reads. Writes by the owner take effect
    /// from the next recorded sample.
    pub fn verbose_flag(&self) -> &VerboseFlag {
        &self.verbose
    }

    /// Runs `operation` once, records how long it took under `name`, and
    /// hands back its result untouched.
    ///
    /// A panic inside `operation` unwinds straight through this call and
    /// nothing is recorded for it.
    pub fn time<T, F>(&self, name: &str, operation: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = operation();
        let elapsed = start.elapsed();
        self.record(name, elapsed);
        result
    }

    /// Like [`Registry::time`], for operations that report failure through
    /// `Result`. Only `Ok` outcomes are recorded; an `Err` is returned as is.
    pub fn try_time<T, E, F>(&self, name: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let start = Instant::now();
        let value = operation()?;
        let elapsed = start.elapsed();
        self.record(name, elapsed);
        Ok(value)
    }

    /// Starts a guard that records under `name` when dropped.
    pub fn start(&self, name: impl Into<String>) -> ScopedTimer<'_> {
        ScopedTimer::new(self, name)
    }

    /// Appends a duration measured elsewhere, creating the name on first use.
    ///
    /// Emits the per-call line when the verbose flag is set.
    pub fn record(&self, name: &str, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        {
            let mut samples = self.lock();
            match samples.get_mut(name) {
                Some(existing) => existing.push(nanos),
                None => {
                    log::trace!("First sample for measurement '{}'", name);
                    samples.insert(name.to_string(), Samples::first(nanos));
                }
            }
        }

        if self.verbose.load(Ordering::Relaxed) {
            self.sink.debug(&report::format_timing_line(name, nanos));
        }
    }

    /// Average duration of `name` in fractional milliseconds, or `None` if
    /// nothing was ever recorded under it.
    pub fn average_time(&self, name: &str) -> Option<f64> {
        self.lock().get(name).map(Samples::average_ms)
    }

    /// Number of samples recorded under `name`, or `None` if unknown.
    pub fn sample_count(&self, name: &str) -> Option<usize> {
        self.lock().get(name).map(Samples::count)
    }

    /// Owned copy of every name's average duration.
    pub fn all_stats(&self) -> StatsSnapshot {
        self.lock()
            .iter()
            .map(|(name, samples)| (name.clone(), samples.average_ms()))
            .collect()
    }

    /// Every name with its average and sample count, in report order.
    ///
    /// Averages and counts are read under the same lock, so each row is
    /// internally consistent.
    pub fn stats(&self) -> Vec<MeasurementStats> {
        let mut rows: Vec<MeasurementStats> = self
            .lock()
            .iter()
            .map(|(name, samples)| MeasurementStats {
                name: name.clone(),
                average_ms: samples.average_ms(),
                count: samples.count(),
            })
            .collect();
        report::sort_for_report(&mut rows);
        rows
    }

    /// Names currently known, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of distinct names recorded.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when no sample has been recorded since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every name and its samples.
    pub fn clear(&self) {
        let mut samples = self.lock();
        log::trace!("Clearing {} measurement(s)", samples.len());
        samples.clear();
    }

    /// The lines [`Registry::print_stats`] would emit right now.
    pub fn report_lines(&self) -> Vec<String> {
        report::render(&self.stats())
    }

    /// Writes the statistics report to the sink, one line per call.
    pub fn print_stats(&self) {
        for line in self.report_lines() {
            self.sink.debug(&line);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Samples>> {
        // Every critical section leaves the map consistent, so a poisoned
        // lock still guards valid data.
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
