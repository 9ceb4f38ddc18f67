// src/global.rs

use crate::{config::ProfilerConfig, core::registry::Registry};
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Returns the process-wide registry, building it on first use.
///
/// It is configured from `PERFMETER_VERBOSE` only. An unparsable value is
/// logged and treated as "not verbose"; it never prevents measuring.
pub fn global() -> &'static Registry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let config = ProfilerConfig::from_env().unwrap_or_else(|e| {
            log::warn!("{}. Falling back to default profiler settings.", e);
            ProfilerConfig::default()
        });
        Registry::from_config(&config)
    })
}

/// Times an expression and yields its value.
///
/// `measure!(name, expr)` records on the process-wide registry;
/// `measure!(registry, name, expr)` records on the given one.
///
/// The expression runs inside a closure, so `return` and `?` apply to that
/// closure rather than the enclosing function.
///
/// ```
/// use perfmeter::{Registry, measure};
///
/// let registry = Registry::default();
/// let sum = measure!(registry, "sum", (1..=10).sum::<u32>());
/// assert_eq!(sum, 55);
/// assert_eq!(registry.sample_count("sum"), Some(1));
/// ```
#[macro_export]
macro_rules! measure {
    ($registry:expr, $name:expr, $body:expr) => {
        $registry.time($name, || $body)
    };
    ($name:expr, $body:expr) => {
        $crate::global::global().time($name, || $body)
    };
}
