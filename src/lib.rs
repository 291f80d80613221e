//! Planforge: AI planning assistant service
//!
//! Command-line entry point wiring configuration, logging and the HTTP
//! server around the orchestration layer in `planforge-core`.

pub mod cli;
