//! # System Interaction Layer
//!
//! Boundary between the profiler and the operating system. Only the CLI uses it.
//!
//! - **`executor`**: spawns a shell-style command line and waits for it, so the
//!   command can be timed as a single measured operation.

pub mod executor;
