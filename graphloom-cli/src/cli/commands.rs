//! Command implementations and argument parsing for the graphloom CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use graphloom_core::{
    Graph, GraphError, bfs_reachable, dfs_connected,
    generators::{
        DEFAULT_LATTICE_DIM, DEFAULT_ODD_DEGREE, DEFAULT_RING_DEGREE, barabasi_albert,
        erdos_renyi, full_connect, lattice, odd_regular, ring, watts_strogatz,
    },
    stats::summarize,
};
use graphloom_csv::{
    CsvError, SummaryRow, unused_path, unused_paths, write_edge_file, write_node_report,
    write_summary_report,
};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::{
    script::{SessionCommand, run_session},
    session::{GraphKey, NamedGraph, Session},
};

/// Seed used when `--seed` is not given, so repeated runs agree.
pub const DEFAULT_SEED: u64 = 0x5EED;

const DEFAULT_NODE_COUNT: usize = 10;
const DEFAULT_LATTICE_SIZE: usize = 3;
const DEFAULT_GENERATED_FILE: &str = "generated.csv";
pub(super) const DEFAULT_SUMMARY_FILE: &str = "output.csv";
const FALLBACK_GRAPH_NAME: &str = "graph";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "graphloom", about = "Generate, edit and summarise weighted graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a graph from one of the generator families and save it.
    Generate(GenerateCommand),
    /// Report whether each graph is connected.
    Check(CheckCommand),
    /// Report whether one node can reach another.
    Reach(ReachCommand),
    /// Apply a single mutation to a saved graph.
    Edit(EditCommand),
    /// Write the node report and edge list of a graph.
    Export(ExportCommand),
    /// Write one statistics row per graph.
    Summary(SummaryCommand),
    /// Run a script of steps against one shared list of named graphs.
    Session(SessionCommand),
}

/// Generator families available to `generate`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum GraphCategory {
    /// Every pair of distinct nodes connected.
    Full,
    /// Toroidal lattice of `size^dim` nodes.
    Lattice,
    /// Circulant ring with an even degree.
    Ring,
    /// Regular graph with an odd degree.
    OddRegular,
    /// Erdős–Rényi random graph.
    ErdosRenyi,
    /// Barabási–Albert scale-free graph.
    ScaleFree,
    /// Isolated nodes only.
    Empty,
}

impl GraphCategory {
    pub(super) const fn label(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Lattice => "lattice",
            Self::Ring => "ring",
            Self::OddRegular => "odd-regular",
            Self::ErdosRenyi => "erdos-renyi",
            Self::ScaleFree => "scale-free",
            Self::Empty => "empty",
        }
    }

    const fn default_degree(self) -> usize {
        match self {
            Self::OddRegular => DEFAULT_ODD_DEGREE,
            _ => DEFAULT_RING_DEGREE,
        }
    }
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Generator family.
    #[arg(value_enum)]
    pub category: GraphCategory,

    /// Number of nodes (ignored by `lattice`).
    #[arg(long = "node-count", default_value_t = DEFAULT_NODE_COUNT)]
    pub node_count: usize,

    /// Nodes per lattice axis.
    #[arg(long, default_value_t = DEFAULT_LATTICE_SIZE)]
    pub size: usize,

    /// Number of lattice axes.
    #[arg(long, default_value_t = DEFAULT_LATTICE_DIM)]
    pub dim: u32,

    /// Degree for `ring` and `odd-regular`, average degree for the random
    /// models. Defaults to 3 for `odd-regular` and 4 otherwise.
    #[arg(long)]
    pub degree: Option<usize>,

    /// Rewiring rate for regular Erdős–Rényi graphs, edge probability
    /// otherwise. Defaults to `degree / (node-count - 1)`.
    #[arg(long = "connect-rate")]
    pub connect_rate: Option<f64>,

    /// Build a regular Erdős–Rényi graph by degree-preserving rewiring.
    #[arg(long)]
    pub regular: bool,

    /// Make an `empty` graph directed.
    #[arg(long)]
    pub directed: bool,

    /// Apply the Watts–Strogatz transform with this rate after generating.
    #[arg(long = "small-world")]
    pub small_world: Option<f64>,

    /// Seed for the random source.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Name reported for the graph (defaults to the output file stem).
    #[arg(long)]
    pub name: Option<String>,

    /// Edge file to write. Without it a fresh `generated.csv` is chosen,
    /// except in a session script where the graph then stays in memory.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Options accepted by the `check` command.
#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    /// Edge files to check.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Options accepted by the `reach` command.
#[derive(Debug, Args, Clone)]
pub struct ReachCommand {
    /// Edge file to search.
    pub path: PathBuf,
    /// Node the search starts from.
    pub start: usize,
    /// Node being looked for.
    pub end: usize,
}

/// Options accepted by the `edit` command.
#[derive(Debug, Args, Clone)]
pub struct EditCommand {
    /// Edge file to edit.
    pub path: PathBuf,

    /// Where to write the result (defaults to overwriting the input).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Mutation to apply.
    #[command(subcommand)]
    pub operation: EditOperation,
}

/// Mutations available to `edit`.
#[derive(Debug, Subcommand, Clone)]
pub enum EditOperation {
    /// Append isolated nodes.
    AddNodes {
        /// Number of nodes to append.
        count: usize,
    },
    /// Insert an edge, adding to the weight of an existing one.
    #[command(allow_negative_numbers = true)]
    AddEdge {
        /// Origin node.
        source: usize,
        /// Destination node.
        target: usize,
        /// Edge weight.
        weight: f64,
    },
    /// Replace the weight of an existing edge.
    #[command(allow_negative_numbers = true)]
    UpdateEdge {
        /// Origin node.
        source: usize,
        /// Destination node.
        target: usize,
        /// New weight.
        weight: f64,
    },
    /// Delete an edge.
    RemoveEdge {
        /// Origin node.
        source: usize,
        /// Destination node.
        target: usize,
    },
    /// Delete nodes and renumber the rest.
    RemoveNodes {
        /// Indices to delete.
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Apply the Watts–Strogatz transform.
    SmallWorld {
        /// Probability of moving each edge.
        rate: f64,
        /// Seed for the random source.
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

impl EditOperation {
    pub(super) const fn label(&self) -> &'static str {
        match self {
            Self::AddNodes { .. } => "add-nodes",
            Self::AddEdge { .. } => "add-edge",
            Self::UpdateEdge { .. } => "update-edge",
            Self::RemoveEdge { .. } => "remove-edge",
            Self::RemoveNodes { .. } => "remove-nodes",
            Self::SmallWorld { .. } => "small-world",
        }
    }
}

/// Options accepted by the `export` command.
#[derive(Debug, Args, Clone)]
pub struct ExportCommand {
    /// Edge file to export.
    pub path: PathBuf,

    /// Name used in the output file names (defaults to the input stem).
    #[arg(long)]
    pub name: Option<String>,

    /// Directory receiving `nodes_<name>.csv` and `edges_<name>.csv`.
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

/// Options accepted by the `summary` command.
#[derive(Debug, Args, Clone)]
pub struct SummaryCommand {
    /// Edge files to summarise, one row each.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Summary file to write; a numeric suffix is added if it exists.
    #[arg(long, default_value = DEFAULT_SUMMARY_FILE)]
    pub output: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while writing an output file.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Read {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A session script line is not a valid step.
    #[error("line {line}: {message}")]
    InvalidStep {
        /// One-based line number in the script.
        line: usize,
        /// Parser diagnostic.
        message: String,
    },
    /// A session script step failed.
    #[error("line {line}: {source}")]
    Step {
        /// One-based line number in the script.
        line: usize,
        /// Failure raised by the step.
        #[source]
        source: Box<CliError>,
    },
    /// No graph in the session matched the requested key.
    #[error("no graph matches `{key}`")]
    UnknownGraph {
        /// The index or name that was looked up.
        key: String,
    },
    /// Reading or writing a CSV file failed.
    #[error(transparent)]
    Csv(#[from] CsvError),
    /// The graph rejected a request.
    #[error(transparent)]
    Core(#[from] GraphError),
}

impl CliError {
    /// Stable machine-readable code, taken from the wrapped error where there
    /// is one.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CLI_IO",
            Self::Read { .. } => "CLI_READ",
            Self::InvalidStep { .. } => "CLI_INVALID_STEP",
            Self::Step { source, .. } => source.code(),
            Self::UnknownGraph { .. } => "CLI_UNKNOWN_GRAPH",
            Self::Csv(csv) => csv.code().as_str(),
            Self::Core(core) => core.code().as_str(),
        }
    }

    pub(super) fn unknown_graph(key: GraphKey<'_>) -> Self {
        let key = match key {
            GraphKey::Index(index) => format!("#{index}"),
            GraphKey::Name(name) => name.to_owned(),
        };
        Self::UnknownGraph { key }
    }
}

/// Connectivity of one checked graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connectivity {
    /// Graph name.
    pub name: String,
    /// `false` also covers graphs without nodes.
    pub connected: bool,
}

/// Result of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Files written by the command, in order.
    Written(Vec<PathBuf>),
    /// One connectivity verdict per input graph.
    Connectivity(Vec<Connectivity>),
    /// Answer to a reachability query.
    Reachability {
        /// Graph name.
        name: String,
        /// Start node.
        start: usize,
        /// End node.
        end: usize,
        /// Whether `end` is reachable from `start`.
        reachable: bool,
    },
    /// The outcomes of a session script, one per reporting step.
    Steps(Vec<CommandOutcome>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, mutating, or writing a graph fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use graphloom_cli::cli::{Cli, Command, CommandOutcome, GenerateCommand, GraphCategory, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let output = dir.path().join("ring.csv");
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         category: GraphCategory::Ring,
///         node_count: 6,
///         size: 3,
///         dim: 2,
///         degree: Some(2),
///         connect_rate: None,
///         regular: false,
///         directed: false,
///         small_world: None,
///         seed: 1,
///         name: None,
///         output: Some(output.clone()),
///     }),
/// };
/// assert_eq!(run_cli(cli)?, CommandOutcome::Written(vec![output]));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<CommandOutcome, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command)
        }
        Command::Check(command) => {
            span.record("command", field::display("check"));
            run_check(&command)
        }
        Command::Reach(command) => {
            span.record("command", field::display("reach"));
            run_reach(&command)
        }
        Command::Edit(command) => {
            span.record("command", field::display("edit"));
            run_edit(command)
        }
        Command::Export(command) => {
            span.record("command", field::display("export"));
            run_export(&command)
        }
        Command::Summary(command) => {
            span.record("command", field::display("summary"));
            run_summary(&command)
        }
        Command::Session(command) => {
            span.record("command", field::display("session"));
            run_session(&command)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(category = command.category.label(), seed = command.seed, nodes = field::Empty),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<CommandOutcome, CliError> {
    let graph = generate_graph(&command)?;
    Span::current().record("nodes", graph.node_count());

    let path = command
        .output
        .unwrap_or_else(|| unused_path(Path::new(DEFAULT_GENERATED_FILE)));
    let name = derive_graph_name(&path, command.name.as_deref());
    write_edge_file(&graph, &path)?;
    info!(
        name = name.as_str(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        path = %path.display(),
        "graph generated"
    );
    Ok(CommandOutcome::Written(vec![path]))
}

/// Builds the requested graph and applies the optional small-world pass with
/// the same random source.
pub(super) fn generate_graph(command: &GenerateCommand) -> Result<Graph, GraphError> {
    let mut rng = SmallRng::seed_from_u64(command.seed);
    let mut graph = build_graph(command, &mut rng)?;
    if let Some(rate) = command.small_world {
        watts_strogatz(&mut graph, rate, &mut rng)?;
    }
    Ok(graph)
}

fn build_graph(command: &GenerateCommand, rng: &mut SmallRng) -> Result<Graph, GraphError> {
    let degree = command
        .degree
        .unwrap_or_else(|| command.category.default_degree());
    let node_count = command.node_count;
    match command.category {
        GraphCategory::Full => Ok(full_connect(node_count)),
        GraphCategory::Lattice => lattice(command.size, command.dim),
        GraphCategory::Ring => ring(node_count, degree),
        GraphCategory::OddRegular => odd_regular(node_count, degree),
        GraphCategory::ErdosRenyi => {
            let rate = command
                .connect_rate
                .unwrap_or_else(|| derive_connect_rate(node_count, degree));
            erdos_renyi(node_count, degree, rate, command.regular, rng)
        }
        GraphCategory::ScaleFree => barabasi_albert(node_count, degree, rng),
        GraphCategory::Empty => Ok(Graph::new(node_count, command.directed)),
    }
}

/// Edge probability giving an expected degree of `degree`, capped at `1`.
#[expect(
    clippy::cast_precision_loss,
    reason = "node counts and degrees stay far below 2^52"
)]
pub(super) fn derive_connect_rate(node_count: usize, degree: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    (degree as f64 / (node_count - 1) as f64).min(1.0)
}

#[instrument(name = "cli.check", err, skip(command), fields(graphs = command.paths.len()))]
pub(super) fn run_check(command: &CheckCommand) -> Result<CommandOutcome, CliError> {
    let session = load_session(&command.paths)?;
    Ok(CommandOutcome::Connectivity(
        session.iter().map(connectivity).collect(),
    ))
}

pub(super) fn connectivity(entry: &NamedGraph) -> Connectivity {
    Connectivity {
        name: entry.name.clone(),
        connected: dfs_connected(&entry.graph).unwrap_or_default(),
    }
}

#[instrument(
    name = "cli.reach",
    err,
    skip(command),
    fields(path = %command.path.display(), start = command.start, end = command.end),
)]
pub(super) fn run_reach(command: &ReachCommand) -> Result<CommandOutcome, CliError> {
    let mut session = Session::new();
    let index = session.load(&command.path, None)?;
    reachability(session.get(index)?, command.start, command.end)
}

pub(super) fn reachability(
    entry: &NamedGraph,
    start: usize,
    end: usize,
) -> Result<CommandOutcome, CliError> {
    let reachable = bfs_reachable(&entry.graph, start, end)?;
    Ok(CommandOutcome::Reachability {
        name: entry.name.clone(),
        start,
        end,
        reachable,
    })
}

#[instrument(
    name = "cli.edit",
    err,
    skip(command),
    fields(path = %command.path.display(), operation = command.operation.label()),
)]
pub(super) fn run_edit(command: EditCommand) -> Result<CommandOutcome, CliError> {
    let mut session = Session::new();
    let index = session.load(&command.path, None)?;
    let graph = &mut session.get_mut(index)?.graph;
    apply_edit(graph, &command.operation)?;

    let path = command.output.unwrap_or(command.path);
    write_edge_file(graph, &path)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        path = %path.display(),
        "graph edited"
    );
    Ok(CommandOutcome::Written(vec![path]))
}

pub(super) fn apply_edit(graph: &mut Graph, operation: &EditOperation) -> Result<(), GraphError> {
    match *operation {
        EditOperation::AddNodes { count } => graph.add_nodes(count),
        EditOperation::AddEdge {
            source,
            target,
            weight,
        } => {
            graph.add_edge(source, target, weight)?;
        }
        EditOperation::UpdateEdge {
            source,
            target,
            weight,
        } => graph.update_edge_weight(source, target, weight)?,
        EditOperation::RemoveEdge { source, target } => {
            graph.remove_edge(source, target)?;
        }
        EditOperation::RemoveNodes { ref indices } => graph.remove_nodes(indices)?,
        EditOperation::SmallWorld { rate, seed } => {
            let mut rng = SmallRng::seed_from_u64(seed);
            watts_strogatz(graph, rate, &mut rng)?;
        }
    }
    Ok(())
}

#[instrument(name = "cli.export", err, skip(command), fields(path = %command.path.display()))]
pub(super) fn run_export(command: &ExportCommand) -> Result<CommandOutcome, CliError> {
    let mut session = Session::new();
    let index = session.load(&command.path, command.name.as_deref())?;
    let paths = export_graph(session.get(index)?, &command.output_dir)?;
    Ok(CommandOutcome::Written(paths))
}

/// Writes `nodes_<name>.csv` and `edges_<name>.csv` under `output_dir`,
/// sharing one numeric suffix when either already exists.
pub(super) fn export_graph(entry: &NamedGraph, output_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let nodes = output_dir.join(format!("nodes_{}.csv", entry.name));
    let edges = output_dir.join(format!("edges_{}.csv", entry.name));
    let paths = unused_paths(&[nodes.as_path(), edges.as_path()]);
    let [nodes, edges] = paths.as_slice() else {
        return Ok(Vec::new());
    };

    let mut writer = create_output(nodes)?;
    write_node_report(&entry.graph, &mut writer)?;
    flush_output(writer, nodes)?;
    write_edge_file(&entry.graph, edges)?;
    info!(name = entry.name.as_str(), "graph exported");
    Ok(paths)
}

#[instrument(name = "cli.summary", err, skip(command), fields(graphs = command.paths.len()))]
pub(super) fn run_summary(command: &SummaryCommand) -> Result<CommandOutcome, CliError> {
    let session = load_session(&command.paths)?;
    let path = write_summary(&session, &command.output)?;
    Ok(CommandOutcome::Written(vec![path]))
}

/// Writes one summary row per session graph to a fresh variant of `output`.
pub(super) fn write_summary(session: &Session, output: &Path) -> Result<PathBuf, CliError> {
    let rows: Vec<SummaryRow> = session
        .iter()
        .map(|entry| SummaryRow {
            name: entry.name.clone(),
            summary: summarize(&entry.graph),
        })
        .collect();

    let path = unused_path(output);
    let mut writer = create_output(&path)?;
    write_summary_report(&rows, &mut writer)?;
    flush_output(writer, &path)?;
    info!(rows = rows.len(), path = %path.display(), "summary written");
    Ok(path)
}

fn load_session(paths: &[PathBuf]) -> Result<Session, CliError> {
    let mut session = Session::new();
    for path in paths {
        session.load(path, None)?;
    }
    Ok(session)
}

fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn flush_output(writer: BufWriter<File>, path: &Path) -> Result<(), CliError> {
    writer
        .into_inner()
        .map(drop)
        .map_err(|err| CliError::Io {
            path: path.to_path_buf(),
            source: err.into_error(),
        })
}

pub(super) fn derive_graph_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| FALLBACK_GRAPH_NAME.to_owned(), ToOwned::to_owned)
}

/// Renders `outcome` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use graphloom_cli::cli::{CommandOutcome, render_outcome};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let outcome = CommandOutcome::Reachability {
///     name: "demo".into(),
///     start: 0,
///     end: 3,
///     reachable: true,
/// };
/// let mut buffer = Vec::new();
/// render_outcome(&outcome, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "demo: 0 -> 3 reachable\n");
/// # Ok(())
/// # }
/// ```
pub fn render_outcome(outcome: &CommandOutcome, mut writer: impl Write) -> io::Result<()> {
    write_outcome(outcome, &mut writer)
}

fn write_outcome<W: Write + ?Sized>(outcome: &CommandOutcome, writer: &mut W) -> io::Result<()> {
    match outcome {
        CommandOutcome::Steps(outcomes) => {
            for step in outcomes {
                write_outcome(step, writer)?;
            }
        }
        CommandOutcome::Written(paths) => {
            for path in paths {
                writeln!(writer, "wrote {}", path.display())?;
            }
        }
        CommandOutcome::Connectivity(verdicts) => {
            for verdict in verdicts {
                let state = if verdict.connected {
                    "connected"
                } else {
                    "disconnected"
                };
                writeln!(writer, "{}: {state}", verdict.name)?;
            }
        }
        CommandOutcome::Reachability {
            name,
            start,
            end,
            reachable,
        } => {
            let state = if *reachable { "reachable" } else { "unreachable" };
            writeln!(writer, "{name}: {start} -> {end} {state}")?;
        }
    }
    Ok(())
}
