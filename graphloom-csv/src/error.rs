//! Errors raised while reading or writing graph CSV files.

use std::{fmt, io, path::PathBuf};

use graphloom_core::GraphError;
use thiserror::Error;

/// Error type for CSV import and export.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CsvError {
    /// Opening or creating a file failed.
    #[error("failed to access `{path}`: {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading an input line failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing output failed.
    #[error("failed to write CSV output: {0}")]
    Write(#[from] io::Error),
    /// The input had no header line.
    #[error("edge file is empty; expected a `nodeCount,edgeCount,isDirected` header")]
    MissingHeader,
    /// A line could not be parsed.
    #[error("line {line} is malformed: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
    /// The file ended before the declared number of edges was read.
    #[error("header declares {expected} edge(s) but only {found} were present")]
    MissingEdges {
        /// Edge count declared by the header.
        expected: usize,
        /// Edge lines actually read.
        found: usize,
    },
    /// An edge referenced a node outside the declared node count.
    #[error("line {line} was rejected by the graph: {source}")]
    Graph {
        /// 1-based line number.
        line: usize,
        /// Error reported by the graph.
        #[source]
        source: GraphError,
    },
}

/// Stable codes describing [`CsvError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CsvErrorCode {
    /// A file could not be opened or created.
    File,
    /// Reading an input line failed.
    Read,
    /// Writing output failed.
    Write,
    /// The input had no header line.
    MissingHeader,
    /// A line could not be parsed.
    Malformed,
    /// Fewer edge lines than declared.
    MissingEdges,
    /// An edge was rejected by the graph.
    Graph,
}

impl CsvErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "CSV_FILE",
            Self::Read => "CSV_READ",
            Self::Write => "CSV_WRITE",
            Self::MissingHeader => "CSV_MISSING_HEADER",
            Self::Malformed => "CSV_MALFORMED",
            Self::MissingEdges => "CSV_MISSING_EDGES",
            Self::Graph => "CSV_GRAPH_REJECTED",
        }
    }
}

impl fmt::Display for CsvErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CsvError {
    /// Retrieve the stable [`CsvErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> CsvErrorCode {
        match self {
            Self::File { .. } => CsvErrorCode::File,
            Self::Read { .. } => CsvErrorCode::Read,
            Self::Write(_) => CsvErrorCode::Write,
            Self::MissingHeader => CsvErrorCode::MissingHeader,
            Self::Malformed { .. } => CsvErrorCode::Malformed,
            Self::MissingEdges { .. } => CsvErrorCode::MissingEdges,
            Self::Graph { .. } => CsvErrorCode::Graph,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, CsvError>;
