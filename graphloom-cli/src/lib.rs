//! Support library for the graphloom CLI binary.
//!
//! Re-exports the command pipeline and logging set-up so doctests and
//! integration tests can drive commands without forking a subprocess.

pub mod cli;
pub mod logging;
