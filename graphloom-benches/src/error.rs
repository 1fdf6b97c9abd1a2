//! Benchmark setup error type.
//!
//! Lets setup functions propagate graph construction failures with `?`
//! instead of using `.expect()`.

use graphloom_core::GraphError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A generator rejected its parameters.
    #[error("graph generation failed: {0}")]
    Graph(#[from] GraphError),
}
