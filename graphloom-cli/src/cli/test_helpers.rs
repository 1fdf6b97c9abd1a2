//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use graphloom_core::Graph;
use graphloom_csv::read_edge_file;
use tempfile::TempDir;

use super::commands::GenerateCommand;
use super::{Cli, CliError, CommandOutcome, GraphCategory, run_cli};

pub(super) type TestResult = Result<(), Box<dyn std::error::Error>>;

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn generate_args(category: GraphCategory, output: &Path) -> GenerateCommand {
    GenerateCommand {
        category,
        node_count: 10,
        size: 3,
        dim: 2,
        degree: None,
        connect_rate: None,
        regular: false,
        directed: false,
        small_world: None,
        seed: 7,
        name: None,
        output: Some(output.to_path_buf()),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn written_paths(outcome: CommandOutcome) -> Vec<PathBuf> {
    match outcome {
        CommandOutcome::Written(paths) => paths,
        other => panic!("expected written files, got {other:?}"),
    }
}

pub(super) fn load(path: &Path) -> Graph {
    match read_edge_file(path) {
        Ok(graph) => graph,
        Err(err) => panic!("failed to read `{}`: {err}", path.display()),
    }
}
