//! Process execution infrastructure
//!
//! Implements the command runner port with real child processes,
//! capturing output and enforcing deadlines.

pub mod runner;

pub use runner::ProcessRunner;
