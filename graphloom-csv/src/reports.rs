//! Per-node and multi-graph CSV reports.

use std::{borrow::Cow, io::Write};

use graphloom_core::{
    DistanceMatrix, Graph, GraphSummary, REACHABLE_THRESHOLD, floyd_warshall, reach_counts,
    stats::degree_distribution,
};
use tracing::instrument;

use crate::{edges::csv_bool, error::Result};

const SUMMARY_HEADER: &str = "index,name,isDirect,nodeCount,edgeCount,averageDegree,varianceDegree,clusterCoefficient,minimumDistance,averageDistance,maximumDistance";

/// A named graph summary, one row of [`write_summary_report`].
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    /// Display name of the graph.
    pub name: String,
    /// Statistics collected for the graph.
    pub summary: GraphSummary,
}

impl SummaryRow {
    fn to_csv_row(&self, index: usize) -> String {
        let distances = self.summary.distances();
        format!(
            "{index},{},{},{},{},{},{},{},{},{},{}",
            quote_field(&self.name),
            csv_bool(self.summary.is_directed()),
            self.summary.node_count(),
            self.summary.edge_count(),
            self.summary.degree_mean(),
            self.summary.degree_variance(),
            self.summary.clustering(),
            distances.min(),
            distances.mean(),
            distances.max(),
        )
    }
}

/// Writes one row per node: its index, how many nodes it reaches, the
/// fraction of nodes whose degree equals the row index, and its shortest
/// distance to every node. Unreachable distances are written as `inf`.
///
/// # Errors
/// Returns [`CsvError::Write`](crate::CsvError::Write) when the writer fails.
///
/// # Examples
/// ```
/// use graphloom_core::Graph;
/// use graphloom_csv::write_node_report;
///
/// let graph = Graph::from_edges(2, true, [(0, 1, 2.0)]).expect("edge is in range");
/// let mut buffer = Vec::new();
/// write_node_report(&graph, &mut buffer).expect("writing to memory succeeds");
/// let text = String::from_utf8(buffer).expect("utf-8");
/// let lines: Vec<&str> = text.lines().collect();
/// assert_eq!(lines[0], "nodeIndex,reachNodeCount,degreeDistribution,distanceTo0thNode,distanceTo1thNode");
/// assert_eq!(lines[1], "0,1,0.5,0,2");
/// assert_eq!(lines[2], "1,0,0.5,inf,0");
/// ```
#[instrument(level = "debug", skip(graph, writer), fields(nodes = graph.node_count()))]
pub fn write_node_report(graph: &Graph, mut writer: impl Write) -> Result<()> {
    let node_count = graph.node_count();
    let mut header = String::from("nodeIndex,reachNodeCount,degreeDistribution");
    for node in 0..node_count {
        header.push_str(&format!(",distanceTo{node}thNode"));
    }
    writeln!(writer, "{header}")?;
    if node_count == 0 {
        return Ok(());
    }

    let reach = reach_counts(graph);
    let distribution = degree_distribution(graph);
    let matrix = floyd_warshall(graph).unwrap_or_default();
    for node in 0..node_count {
        let mut row = format!(
            "{node},{},{}",
            reach.get(node).copied().unwrap_or_default(),
            distribution.histogram().get(node).copied().unwrap_or_default(),
        );
        push_distances(&mut row, &matrix, node);
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

/// Writes the multi-graph summary table, numbering rows from zero.
///
/// Names containing a comma, quote or line break are written as quoted
/// fields.
///
/// # Errors
/// Returns [`CsvError::Write`](crate::CsvError::Write) when the writer fails.
pub fn write_summary_report(rows: &[SummaryRow], mut writer: impl Write) -> Result<()> {
    writeln!(writer, "{SUMMARY_HEADER}")?;
    for (index, row) in rows.iter().enumerate() {
        writeln!(writer, "{}", row.to_csv_row(index))?;
    }
    Ok(())
}

/// Quotes `field` when it holds a separator, quote or line break, doubling
/// any embedded quotes.
fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_distances(row: &mut String, matrix: &DistanceMatrix, node: usize) {
    for &distance in matrix.row(node).unwrap_or_default() {
        if distance > REACHABLE_THRESHOLD {
            row.push_str(",inf");
        } else {
            row.push_str(&format!(",{distance}"));
        }
    }
}
