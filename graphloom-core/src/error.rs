//! Error types for the graphloom core library.
//!
//! Defines the error taxonomy shared by graph mutation, traversal,
//! generation, and statistics, plus stable machine-readable codes so
//! collaborators can report failures without matching on message text.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by graph mutation, queries, generators, and stats.
///
/// A failed mutation never leaves a partially applied change behind on the
/// element it rejected; queries that fail have a neutral value available via
/// `unwrap_or_default()` on the returned result.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// A node index was beyond the current bounds of the graph.
    #[error("node index {index} is out of range for a graph with {node_count} node(s)")]
    OutOfRange {
        /// The offending node index.
        index: usize,
        /// Number of nodes in the graph when the request was made.
        node_count: usize,
    },
    /// The requested edge does not exist.
    #[error("edge ({origin}, {target}) does not exist")]
    EdgeNotFound {
        /// Origin of the missing edge.
        origin: usize,
        /// Destination of the missing edge.
        target: usize,
    },
    /// A traversal or path algorithm was invoked on a graph with no nodes.
    #[error("operation requires at least one node, but the graph is empty")]
    EmptyGraph,
    /// A generator or algorithm precondition was violated.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Human-readable explanation of the violated precondition.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A node index was beyond the current bounds of the graph.
        OutOfRange => OutOfRange { .. } => "GRAPH_OUT_OF_RANGE",
        /// The requested edge does not exist.
        EdgeNotFound => EdgeNotFound { .. } => "GRAPH_EDGE_NOT_FOUND",
        /// A traversal or path algorithm was invoked on an empty graph.
        EmptyGraph => EmptyGraph => "GRAPH_EMPTY",
        /// A generator or algorithm precondition was violated.
        InvalidParameter => InvalidParameter { .. } => "GRAPH_INVALID_PARAMETER",
    }
}

impl GraphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
