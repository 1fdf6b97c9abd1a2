//! Session scripts: several steps run in order against one [`Session`].
//!
//! A script holds one step per line, written like a subcommand line without
//! the binary name. Blank lines and lines starting with `#` are skipped and
//! tokens are split on whitespace. Graphs are selected with
//! [`GraphKey::from_token`]. Every line is parsed before the first step runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use graphloom_core::Graph;
use graphloom_csv::write_edge_file;
use tracing::{Span, debug, field, info, instrument};

use super::{
    commands::{
        CliError, CommandOutcome, DEFAULT_SUMMARY_FILE, EditOperation, GenerateCommand,
        apply_edit, connectivity, derive_graph_name, export_graph, generate_graph, reachability,
        write_summary,
    },
    session::{GraphKey, Session},
};

/// Options accepted by the `session` command.
#[derive(Debug, Args, Clone)]
pub struct SessionCommand {
    /// Script file with one step per line.
    pub script: PathBuf,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_subcommand = true)]
struct StepLine {
    #[command(subcommand)]
    step: SessionStep,
}

/// One line of a session script.
#[derive(Debug, Subcommand, Clone)]
pub enum SessionStep {
    /// Load an edge file.
    Import {
        /// Edge file to read.
        path: PathBuf,
        /// Name for the graph (defaults to the file stem).
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate a graph and append it. It is named by `--name`, then the
    /// `--output` stem, then the category.
    Generate(GenerateCommand),
    /// Apply one mutation to a graph in memory.
    Edit {
        /// Index or name of the graph.
        graph: String,
        /// Mutation to apply.
        #[command(subcommand)]
        operation: EditOperation,
    },
    /// Give a graph a new name.
    Rename {
        /// Index or name of the graph.
        graph: String,
        /// New name.
        name: String,
    },
    /// Drop a graph; later graphs move down one index.
    Remove {
        /// Index or name of the graph.
        graph: String,
    },
    /// Exchange the positions of two graphs.
    Swap {
        /// Index or name of the first graph.
        first: String,
        /// Index or name of the second graph.
        second: String,
    },
    /// Report the connectivity of the listed graphs, or of every graph.
    Check {
        /// Indices or names; empty means all graphs.
        graphs: Vec<String>,
    },
    /// Report whether one node of a graph reaches another.
    Reach {
        /// Index or name of the graph.
        graph: String,
        /// Node the search starts from.
        start: usize,
        /// Node being looked for.
        end: usize,
    },
    /// Write the node report and edge list of a graph.
    Export {
        /// Index or name of the graph.
        graph: String,
        /// Directory receiving `nodes_<name>.csv` and `edges_<name>.csv`.
        #[arg(long = "output-dir", default_value = ".")]
        output_dir: PathBuf,
    },
    /// Write one statistics row per graph, in session order.
    Summary {
        /// Summary file to write; a numeric suffix is added if it exists.
        #[arg(long, default_value = DEFAULT_SUMMARY_FILE)]
        output: PathBuf,
    },
}

impl SessionStep {
    const fn label(&self) -> &'static str {
        match self {
            Self::Import { .. } => "import",
            Self::Generate(_) => "generate",
            Self::Edit { operation, .. } => operation.label(),
            Self::Rename { .. } => "rename",
            Self::Remove { .. } => "remove",
            Self::Swap { .. } => "swap",
            Self::Check { .. } => "check",
            Self::Reach { .. } => "reach",
            Self::Export { .. } => "export",
            Self::Summary { .. } => "summary",
        }
    }
}

/// Parses every step of `text`, paired with its one-based line number.
pub(super) fn parse_script(text: &str) -> Result<Vec<(usize, SessionStep)>, CliError> {
    text.lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, raw)| !raw.is_empty() && !raw.starts_with('#'))
        .map(|(line, raw)| {
            StepLine::try_parse_from(raw.split_whitespace())
                .map(|parsed| (line, parsed.step))
                .map_err(|err| CliError::InvalidStep {
                    line,
                    message: first_line(&err.to_string()),
                })
        })
        .collect()
}

fn first_line(diagnostic: &str) -> String {
    diagnostic
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_owned()
}

#[instrument(
    name = "cli.session",
    err,
    skip(command),
    fields(script = %command.script.display(), steps = field::Empty),
)]
pub(super) fn run_session(command: &SessionCommand) -> Result<CommandOutcome, CliError> {
    let text = fs::read_to_string(&command.script).map_err(|source| CliError::Read {
        path: command.script.clone(),
        source,
    })?;
    let steps = parse_script(&text)?;
    Span::current().record("steps", steps.len());

    let mut session = Session::new();
    let mut outcomes = Vec::new();
    for (line, step) in steps {
        let outcome = run_step(&mut session, step).map_err(|source| CliError::Step {
            line,
            source: Box::new(source),
        })?;
        outcomes.extend(outcome);
    }
    info!(graphs = session.len(), "session finished");
    Ok(CommandOutcome::Steps(outcomes))
}

fn run_step(session: &mut Session, step: SessionStep) -> Result<Option<CommandOutcome>, CliError> {
    debug!(step = step.label(), graphs = session.len(), "running session step");
    match step {
        SessionStep::Import { path, name } => {
            session.load(&path, name.as_deref())?;
            Ok(None)
        }
        SessionStep::Generate(command) => generate_into(session, &command),
        SessionStep::Edit { graph, operation } => {
            let entry = session.get_mut(GraphKey::from_token(&graph))?;
            apply_edit(&mut entry.graph, &operation)?;
            Ok(None)
        }
        SessionStep::Rename { graph, name } => {
            session.rename(GraphKey::from_token(&graph), name)?;
            Ok(None)
        }
        SessionStep::Remove { graph } => {
            let removed = session.remove(GraphKey::from_token(&graph))?;
            debug!(name = removed.name.as_str(), "graph removed");
            Ok(None)
        }
        SessionStep::Swap { first, second } => {
            session.swap(GraphKey::from_token(&first), GraphKey::from_token(&second))?;
            Ok(None)
        }
        SessionStep::Check { graphs } => {
            let verdicts = if graphs.is_empty() {
                session.iter().map(connectivity).collect::<Vec<_>>()
            } else {
                graphs
                    .iter()
                    .map(|graph| session.get(GraphKey::from_token(graph)).map(connectivity))
                    .collect::<Result<Vec<_>, _>>()?
            };
            Ok(Some(CommandOutcome::Connectivity(verdicts)))
        }
        SessionStep::Reach { graph, start, end } => {
            let entry = session.get(GraphKey::from_token(&graph))?;
            reachability(entry, start, end).map(Some)
        }
        SessionStep::Export { graph, output_dir } => {
            let entry = session.get(GraphKey::from_token(&graph))?;
            let paths = export_graph(entry, &output_dir)?;
            Ok(Some(CommandOutcome::Written(paths)))
        }
        SessionStep::Summary { output } => {
            let path = write_summary(session, &output)?;
            Ok(Some(CommandOutcome::Written(vec![path])))
        }
    }
}

fn generate_into(
    session: &mut Session,
    command: &GenerateCommand,
) -> Result<Option<CommandOutcome>, CliError> {
    let graph = generate_graph(command)?;
    let name = match (command.name.as_deref(), command.output.as_deref()) {
        (Some(name), _) => name.to_owned(),
        (None, Some(path)) => derive_graph_name(path, None),
        (None, None) => command.category.label().to_owned(),
    };
    let written = command
        .output
        .as_deref()
        .map(|path| write_generated(&graph, path))
        .transpose()?;
    session.push(name, graph);
    Ok(written.map(|path| CommandOutcome::Written(vec![path])))
}

fn write_generated(graph: &Graph, path: &Path) -> Result<PathBuf, CliError> {
    write_edge_file(graph, path)?;
    Ok(path.to_path_buf())
}
