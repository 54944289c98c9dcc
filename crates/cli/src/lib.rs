//! The `rulesync` command-line application.
//!
//! Reads canonical rules and subagents from `.rulesync/`, projects them for
//! each requested target and writes the results under the output directory.

#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;

pub use app::run;
