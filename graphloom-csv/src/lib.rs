//! CSV import and export for graphloom graphs.
//!
//! Edge files round-trip a [`Graph`](graphloom_core::Graph). Node and summary
//! reports are write-only tables derived from the core statistics. Every
//! writer is generic over [`std::io::Write`]; the file helpers wrap them.

mod edges;
mod error;
mod paths;
mod reports;

pub use crate::{
    edges::{read_edge_file, read_edges, write_edge_file, write_edges},
    error::{CsvError, CsvErrorCode, Result},
    paths::{unused_path, unused_paths},
    reports::{SummaryRow, write_node_report, write_summary_report},
};
