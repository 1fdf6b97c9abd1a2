//! The ordered, named list of graphs a command or session script works on.
//!
//! Graphs are addressed either by position or by name. Names default to the
//! stem of the file a graph was loaded from and need not be unique; lookups
//! by name return the first match.

use std::path::Path;

use graphloom_core::Graph;
use graphloom_csv::read_edge_file;
use tracing::{debug, instrument};

use super::commands::{CliError, derive_graph_name};

/// Selects a graph in a [`Session`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphKey<'a> {
    /// Zero-based position in the session.
    Index(usize),
    /// Display name.
    Name(&'a str),
}

impl<'a> GraphKey<'a> {
    /// Reads a script token: a decimal number selects by index, anything else
    /// by name.
    #[must_use]
    pub fn from_token(token: &'a str) -> Self {
        token.parse().map_or(Self::Name(token), Self::Index)
    }
}

impl<'a> From<&'a str> for GraphKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for GraphKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A graph paired with its display name.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedGraph {
    /// Display name.
    pub name: String,
    /// The graph itself.
    pub graph: Graph,
}

/// Ordered collection of named graphs.
#[derive(Clone, Debug, Default)]
pub struct Session {
    graphs: Vec<NamedGraph>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of graphs held.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.graphs.len() }

    /// Returns `true` when the session holds no graphs.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.graphs.is_empty() }

    /// Appends a graph and returns its index.
    pub fn push(&mut self, name: impl Into<String>, graph: Graph) -> usize {
        self.graphs.push(NamedGraph {
            name: name.into(),
            graph,
        });
        self.graphs.len() - 1
    }

    /// Imports an edge file and appends it, named after the file stem unless
    /// `name` overrides it.
    ///
    /// # Errors
    /// Returns [`CliError::Csv`] when the file cannot be read or parsed.
    #[instrument(name = "session.load", level = "debug", skip(self), fields(path = %path.display()))]
    pub fn load(&mut self, path: &Path, name: Option<&str>) -> Result<usize, CliError> {
        let graph = read_edge_file(path)?;
        let name = derive_graph_name(path, name);
        debug!(name = name.as_str(), nodes = graph.node_count(), "graph loaded");
        Ok(self.push(name, graph))
    }

    /// Returns the graph selected by `key`.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownGraph`] when nothing matches.
    pub fn get<'k>(&self, key: impl Into<GraphKey<'k>>) -> Result<&NamedGraph, CliError> {
        let position = self.position(key.into())?;
        self.graphs
            .get(position)
            .ok_or_else(|| CliError::unknown_graph(GraphKey::Index(position)))
    }

    /// Returns the graph selected by `key` for mutation.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownGraph`] when nothing matches.
    pub fn get_mut<'k>(&mut self, key: impl Into<GraphKey<'k>>) -> Result<&mut NamedGraph, CliError> {
        let position = self.position(key.into())?;
        self.graphs
            .get_mut(position)
            .ok_or_else(|| CliError::unknown_graph(GraphKey::Index(position)))
    }

    /// Gives the selected graph a new name.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownGraph`] when nothing matches.
    pub fn rename<'k>(
        &mut self,
        key: impl Into<GraphKey<'k>>,
        name: impl Into<String>,
    ) -> Result<(), CliError> {
        self.get_mut(key)?.name = name.into();
        Ok(())
    }

    /// Removes the selected graph, shifting later graphs down by one.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownGraph`] when nothing matches.
    pub fn remove<'k>(&mut self, key: impl Into<GraphKey<'k>>) -> Result<NamedGraph, CliError> {
        let position = self.position(key.into())?;
        Ok(self.graphs.remove(position))
    }

    /// Exchanges the positions of two graphs.
    ///
    /// # Errors
    /// Returns [`CliError::UnknownGraph`] when either key matches nothing;
    /// the order is then unchanged.
    pub fn swap<'a, 'b>(
        &mut self,
        first: impl Into<GraphKey<'a>>,
        second: impl Into<GraphKey<'b>>,
    ) -> Result<(), CliError> {
        let first = self.position(first.into())?;
        let second = self.position(second.into())?;
        self.graphs.swap(first, second);
        Ok(())
    }

    /// Iterates the graphs in order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedGraph> + '_ {
        self.graphs.iter()
    }

    fn position(&self, key: GraphKey<'_>) -> Result<usize, CliError> {
        let found = match key {
            GraphKey::Index(index) => (index < self.graphs.len()).then_some(index),
            GraphKey::Name(name) => self.graphs.iter().position(|entry| entry.name == name),
        };
        found.ok_or_else(|| CliError::unknown_graph(key))
    }
}
