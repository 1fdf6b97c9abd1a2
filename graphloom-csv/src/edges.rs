//! Edge-list files: a `nodeCount,edgeCount,isDirected` header followed by
//! one `source,target,weight` line per edge.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use graphloom_core::Graph;
use tracing::{debug, instrument, warn};

use crate::error::{CsvError, Result};

/// Parses an edge list into a graph.
///
/// The third header field enables directed storage when it reads `true` in
/// any letter case; any other value, or its absence, means undirected. Blank
/// lines are skipped and lines past the declared edge count are ignored.
///
/// # Errors
/// Returns [`CsvError::MissingHeader`] for empty input,
/// [`CsvError::Malformed`] for lines that do not parse,
/// [`CsvError::MissingEdges`] when the input ends early, and
/// [`CsvError::Graph`] when an edge names a node beyond the node count.
///
/// # Examples
/// ```
/// use graphloom_csv::read_edges;
///
/// let graph = read_edges("3,2,False\n0,1,1.5\n1,2,2\n".as_bytes()).expect("input is valid");
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edge_weight(1, 0), Some(1.5));
/// ```
pub fn read_edges(reader: impl BufRead) -> Result<Graph> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()));

    let (header_line, header) = lines.next().ok_or(CsvError::MissingHeader)?;
    let header = header.map_err(|source| CsvError::Read {
        line: header_line,
        source,
    })?;
    let (node_count, edge_count, directed) = parse_header(header_line, &header)?;

    let mut graph = Graph::new(node_count, directed);
    let mut found = 0;
    while found < edge_count {
        let Some((line, text)) = lines.next() else {
            return Err(CsvError::MissingEdges {
                expected: edge_count,
                found,
            });
        };
        let text = text.map_err(|source| CsvError::Read { line, source })?;
        let (source, target, weight) = parse_edge(line, &text)?;
        graph
            .add_edge(source, target, weight)
            .map_err(|error| CsvError::Graph {
                line,
                source: error,
            })?;
        found += 1;
    }
    if let Some((line, _)) = lines.next() {
        warn!(line, edge_count, "ignoring lines past the declared edge count");
    }
    Ok(graph)
}

/// Opens `path` and parses it with [`read_edges`].
///
/// # Errors
/// Returns [`CsvError::File`] when the file cannot be opened, otherwise any
/// error from [`read_edges`].
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn read_edge_file(path: &Path) -> Result<Graph> {
    let file = File::open(path).map_err(|source| CsvError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = read_edges(BufReader::new(file))?;
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge file imported"
    );
    Ok(graph)
}

/// Writes `graph` as an edge list. Undirected edges appear once, from the
/// smaller endpoint.
///
/// # Errors
/// Returns [`CsvError::Write`] when the writer fails.
///
/// # Examples
/// ```
/// use graphloom_core::Graph;
/// use graphloom_csv::write_edges;
///
/// let graph = Graph::from_edges(2, false, [(1, 0, 0.5)]).expect("edge is in range");
/// let mut buffer = Vec::new();
/// write_edges(&graph, &mut buffer).expect("writing to memory succeeds");
/// assert_eq!(String::from_utf8(buffer).expect("utf-8"), "2,1,False\n0,1,0.5\n");
/// ```
pub fn write_edges(graph: &Graph, mut writer: impl Write) -> Result<()> {
    writeln!(
        writer,
        "{},{},{}",
        graph.node_count(),
        graph.edge_count(),
        csv_bool(graph.is_directed())
    )?;
    for edge in graph.edges() {
        writeln!(writer, "{},{},{}", edge.source(), edge.target(), edge.weight())?;
    }
    Ok(())
}

/// Creates (or truncates) `path` and writes `graph` to it.
///
/// # Errors
/// Returns [`CsvError::File`] when the file cannot be created and
/// [`CsvError::Write`] when writing fails.
#[instrument(level = "debug", skip(graph), fields(path = %path.display()))]
pub fn write_edge_file(graph: &Graph, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| CsvError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_edges(graph, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub(crate) const fn csv_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn parse_header(line: usize, text: &str) -> Result<(usize, usize, bool)> {
    let mut fields = text.split(',').map(str::trim);
    let node_count = parse_field(line, fields.next(), "nodeCount")?;
    let edge_count = parse_field(line, fields.next(), "edgeCount")?;
    let directed = fields
        .next()
        .is_some_and(|flag| flag.eq_ignore_ascii_case("true"));
    Ok((node_count, edge_count, directed))
}

fn parse_edge(line: usize, text: &str) -> Result<(usize, usize, f64)> {
    let mut fields = text.split(',').map(str::trim);
    let source = parse_field(line, fields.next(), "source")?;
    let target = parse_field(line, fields.next(), "target")?;
    let weight: f64 = parse_field(line, fields.next(), "weight")?;
    if !weight.is_finite() {
        return Err(CsvError::malformed(line, format!("weight `{weight}` is not finite")));
    }
    if fields.next().is_some() {
        return Err(CsvError::malformed(line, "expected exactly three fields"));
    }
    Ok((source, target, weight))
}

fn parse_field<T>(line: usize, field: Option<&str>, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| CsvError::malformed(line, format!("missing `{name}` field")))?;
    raw.parse()
        .map_err(|error| CsvError::malformed(line, format!("invalid `{name}` value `{raw}`: {error}")))
}
