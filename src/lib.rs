//! Named block timing with running averages.
//!
//! A [`Registry`] maps measurement names to the durations observed for them.
//! Wrap work in [`Registry::time`] (or the [`measure!`] macro) and query the
//! per-name averages or write a bordered report to a [`LogSink`].
//!
//! ```
//! use perfmeter::{MemorySink, Registry, VerboseFlag};
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let registry = Registry::new(Arc::new(sink.clone()), VerboseFlag::default());
//!
//! let answer = registry.time("answer", || 42);
//! assert_eq!(answer, 42);
//! assert!(registry.average_time("answer").is_some());
//! assert!(registry.average_time("unknown").is_none());
//!
//! registry.print_stats();
//! assert_eq!(sink.lines().first().map(String::as_str), Some("=== Performance Statistics ==="));
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared verbose switch read by a registry once per recorded sample.
pub type VerboseFlag = Arc<AtomicBool>;

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod global;
pub mod models;
pub mod system;

pub use crate::config::{ConfigError, LogLevel, ProfilerConfig};
pub use crate::core::registry::Registry;
pub use crate::core::sink::{LogCrateSink, LogSink, MemorySink};
pub use crate::core::timer::ScopedTimer;
pub use crate::global::global;
pub use crate::models::{MeasurementStats, StatsSnapshot};
