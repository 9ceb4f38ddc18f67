// src/constants.rs

/// Opening border of the statistics report.
pub const REPORT_HEADER: &str = "=== Performance Statistics ===";

/// Closing border of the statistics report.
pub const REPORT_FOOTER: &str = "============================";

/// The single line emitted when a report is requested on an empty registry.
pub const NO_MEASUREMENTS_LINE: &str = "No performance measurements recorded";

/// Nanoseconds in one millisecond.
pub const NANOS_PER_MILLI: u64 = 1_000_000;

/// Environment variable that overrides the configured verbose flag.
pub const VERBOSE_ENV_VAR: &str = "PERFMETER_VERBOSE";

/// Default `log` target used by the log-crate sink.
pub const DEFAULT_LOG_TARGET: &str = "perfmeter";

/// Name of the configuration file the CLI looks for in the working directory.
pub const CONFIG_FILENAME: &str = "perfmeter.toml";
