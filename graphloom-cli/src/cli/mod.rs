//! Command-line interface for graphloom.
//!
//! Each invocation runs one command over one or more CSV edge files: generate
//! a graph, check connectivity or reachability, apply an edit, export the node
//! report, or summarise several graphs side by side. Loaded graphs live in a
//! [`Session`] for the duration of the command. The `session` command runs a
//! script of such steps against one shared [`Session`], so graphs can also be
//! renamed, removed and reordered between steps.

mod commands;
mod script;
mod session;

pub use commands::{
    CheckCommand, Cli, CliError, Command, CommandOutcome, Connectivity, DEFAULT_SEED,
    EditCommand, EditOperation, ExportCommand, GenerateCommand, GraphCategory, ReachCommand,
    SummaryCommand, render_outcome, run_cli,
};
pub use script::{SessionCommand, SessionStep};
pub use session::{GraphKey, NamedGraph, Session};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
