// src/core/timer.rs

use crate::core::registry::Registry;
use std::time::{Duration, Instant};

/// An RAII timer for profiling blocks of code that do not fit in a closure.
///
/// The timer starts when created. When it goes out of scope it records the
/// elapsed time into its registry, unless a panic started inside the timed
/// block, in which case the block is treated as failed and nothing is kept.
/// A timer created while the thread was already unwinding (for example in
/// another value's `Drop`) still records normally.
#[derive(Debug)]
#[must_use = "the timer records when dropped; binding it to `_` drops it immediately"]
pub struct ScopedTimer<'a> {
    registry: &'a Registry,
    name: String,
    start: Instant,
    panicking_at_start: bool,
}

impl<'a> ScopedTimer<'a> {
    /// Creates a new timer and starts it immediately.
    pub fn new(registry: &'a Registry, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
            start: Instant::now(),
            panicking_at_start: std::thread::panicking(),
        }
    }

    /// The measurement name this timer records under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time elapsed so far, without stopping the timer.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stops the timer now, records the sample and returns it.
    pub fn finish(mut self) -> Duration {
        let elapsed = self.start.elapsed();
        let registry = self.registry;
        let name = std::mem::take(&mut self.name);
        // Skip Drop so the sample is not recorded twice.
        std::mem::forget(self);
        registry.record(&name, elapsed);
        elapsed
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() && !self.panicking_at_start {
            log::trace!("Discarding sample for '{}' during unwind", self.name);
            return;
        }
        self.registry.record(&self.name, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VerboseFlag, core::sink::MemorySink};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;
    use std::thread;

    fn registry() -> Registry {
        Registry::new(Arc::new(MemorySink::new()), VerboseFlag::default())
    }

    #[test]
    fn test_scoped_timer_records_on_drop() {
        let registry = registry();
        {
            let _timer = registry.start("block");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(registry.sample_count("block"), Some(1));
        assert!(registry.average_time("block").unwrap() >= 5.0);
    }

    #[test]
    fn test_finish_records_exactly_once() {
        let registry = registry();
        let timer = ScopedTimer::new(&registry, "explicit");
        assert_eq!(timer.name(), "explicit");

        let recorded = timer.finish();

        assert_eq!(registry.sample_count("explicit"), Some(1));
        let avg = registry.average_time("explicit").unwrap();
        assert!((avg - recorded.as_nanos() as f64 / 1_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unwinding_discards_sample() {
        let registry = registry();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _timer = registry.start("doomed");
            panic!("failed mid-block");
        }));
        assert!(outcome.is_err());
        assert_eq!(registry.sample_count("doomed"), None);
    }

    #[test]
    fn test_timer_inside_unwinding_drop_still_records() {
        struct Cleanup<'a> {
            registry: &'a Registry,
        }

        impl Drop for Cleanup<'_> {
            fn drop(&mut self) {
                // Runs while the outer panic is unwinding; the block itself succeeds.
                let _timer = self.registry.start("cleanup");
            }
        }

        // --- Setup ---
        let registry = registry();

        // --- Execute ---
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _cleanup = Cleanup {
                registry: &registry,
            };
            panic!("outer failure");
        }));

        // --- Assert ---
        assert!(outcome.is_err());
        assert_eq!(registry.sample_count("cleanup"), Some(1));
    }
}
