// src/core/mod.rs

pub mod registry;
pub mod report;
pub mod sink;
pub mod timer;
