//! Unit tests for the CLI commands and their file handling.

use super::commands::{apply_edit, derive_connect_rate, derive_graph_name};
use super::test_helpers::{
    TestResult, create_text_file, generate_args, load, run_cli_expecting_error, temp_dir,
    written_paths,
};
use super::{
    CheckCommand, Cli, CliError, Command, CommandOutcome, Connectivity, EditCommand,
    EditOperation, ExportCommand, GraphCategory, ReachCommand, SessionCommand, SummaryCommand,
    render_outcome, run_cli,
};

use std::fs;
use std::path::Path;

use clap::Parser;
use graphloom_core::{Graph, GraphError};
use graphloom_csv::CsvError;
use graphloom_test_support::tracing::capture;
use rstest::rstest;

const PATH_GRAPH: &str = "4,3,false\n0,1,1\n1,2,2\n2,3,3\n";
const SPLIT_GRAPH: &str = "4,2,false\n0,1,1\n2,3,1\n";

#[rstest]
#[case::override_name("/tmp/graph.csv", Some("override"), "override")]
#[case::stem_with_extension("/tmp/graph.csv", None, "graph")]
#[case::stem_without_extension("/tmp/lattice", None, "lattice")]
#[case::missing_stem("", None, "graph")]
fn derive_graph_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    let name = derive_graph_name(Path::new(raw_path), override_name);
    assert_eq!(name, expected);
}

#[rstest]
#[case::typical(10, 3, 1.0 / 3.0)]
#[case::capped(3, 5, 1.0)]
#[case::single_node(1, 4, 0.0)]
#[case::no_nodes(0, 4, 0.0)]
fn connect_rate_targets_the_average_degree(
    #[case] node_count: usize,
    #[case] degree: usize,
    #[case] expected: f64,
) {
    let rate = derive_connect_rate(node_count, degree);
    assert!((rate - expected).abs() < 1e-12, "got {rate}");
}

#[rstest]
#[case::full(GraphCategory::Full, 10, 45)]
#[case::lattice(GraphCategory::Lattice, 9, 18)]
#[case::ring(GraphCategory::Ring, 10, 20)]
#[case::odd_regular(GraphCategory::OddRegular, 10, 15)]
#[case::scale_free(GraphCategory::ScaleFree, 10, 20)]
#[case::empty(GraphCategory::Empty, 10, 0)]
fn generate_writes_each_category(
    #[case] category: GraphCategory,
    #[case] nodes: usize,
    #[case] edges: usize,
) -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("out.csv");
    let cli = Cli {
        command: Command::Generate(generate_args(category, &output)),
    };
    assert_eq!(written_paths(run_cli(cli)?), vec![output.clone()]);
    let graph = load(&output);
    assert_eq!(graph.node_count(), nodes);
    assert_eq!(graph.edge_count(), edges);
    Ok(())
}

#[rstest]
fn generate_regular_erdos_renyi_keeps_degrees() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("er.csv");
    let mut args = generate_args(GraphCategory::ErdosRenyi, &output);
    args.regular = true;
    args.node_count = 30;
    run_cli(Cli {
        command: Command::Generate(args),
    })?;
    let graph = load(&output);
    assert!((0..30).all(|node| graph.degree(node) == Ok(4)));
    Ok(())
}

#[rstest]
fn generate_is_reproducible_for_a_seed() -> TestResult {
    let dir = temp_dir();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    for output in [&first, &second] {
        let mut args = generate_args(GraphCategory::ErdosRenyi, output);
        args.node_count = 25;
        args.small_world = Some(0.3);
        run_cli(Cli {
            command: Command::Generate(args),
        })?;
    }
    assert_eq!(fs::read_to_string(&first)?, fs::read_to_string(&second)?);
    Ok(())
}

#[rstest]
fn generate_small_world_keeps_edge_count() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("ws.csv");
    let mut args = generate_args(GraphCategory::Ring, &output);
    args.small_world = Some(0.5);
    run_cli(Cli {
        command: Command::Generate(args),
    })?;
    assert_eq!(load(&output).edge_count(), 20);
    Ok(())
}

#[rstest]
fn generate_rejects_odd_ring_degree() {
    let dir = temp_dir();
    let mut args = generate_args(GraphCategory::Ring, &dir.path().join("bad.csv"));
    args.degree = Some(3);
    let err = run_cli_expecting_error(
        Cli {
            command: Command::Generate(args),
        },
        "odd ring degree must fail",
    );
    assert!(matches!(
        err,
        CliError::Core(GraphError::InvalidParameter { .. })
    ));
    assert_eq!(err.code(), "GRAPH_INVALID_PARAMETER");
    assert!(!dir.path().join("bad.csv").exists());
}

#[rstest]
fn generate_records_command_on_span() {
    let dir = temp_dir();
    let output = dir.path().join("traced.csv");
    let (result, layer) = capture(|| {
        run_cli(Cli {
            command: Command::Generate(generate_args(GraphCategory::Full, &output)),
        })
    });
    assert!(result.is_ok());
    let spans = layer.spans();
    let run_span = spans
        .iter()
        .find(|span| span.name == "cli.run")
        .expect("run span must exist");
    assert_eq!(run_span.fields.get("command"), Some(&"generate".to_owned()));
    let generate_span = spans
        .iter()
        .find(|span| span.name == "cli.generate")
        .expect("generate span must exist");
    assert_eq!(generate_span.fields.get("category"), Some(&"full".to_owned()));
    assert_eq!(generate_span.fields.get("nodes"), Some(&"10".to_owned()));
}

#[rstest]
fn check_reports_each_graph() -> TestResult {
    let dir = temp_dir();
    let connected = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let split = create_text_file(&dir, "split.csv", SPLIT_GRAPH)?;
    let empty = create_text_file(&dir, "empty.csv", "0,0,false\n")?;
    let outcome = run_cli(Cli {
        command: Command::Check(CheckCommand {
            paths: vec![connected, split, empty],
        }),
    })?;
    let verdict = |name: &str, connected| Connectivity {
        name: name.to_owned(),
        connected,
    };
    assert_eq!(
        outcome,
        CommandOutcome::Connectivity(vec![
            verdict("path", true),
            verdict("split", false),
            verdict("empty", false),
        ])
    );
    Ok(())
}

#[rstest]
fn check_reports_unreadable_files() {
    let dir = temp_dir();
    let err = run_cli_expecting_error(
        Cli {
            command: Command::Check(CheckCommand {
                paths: vec![dir.path().join("missing.csv")],
            }),
        },
        "missing file must fail",
    );
    assert!(matches!(err, CliError::Csv(CsvError::File { .. })));
    assert_eq!(err.code(), "CSV_FILE");
}

#[rstest]
#[case::along_path(0, 3, true)]
#[case::across_components(1, 2, false)]
fn reach_answers_queries(#[case] start: usize, #[case] end: usize, #[case] expected: bool) -> TestResult {
    let dir = temp_dir();
    let contents = if expected { PATH_GRAPH } else { SPLIT_GRAPH };
    let path = create_text_file(&dir, "query.csv", contents)?;
    let outcome = run_cli(Cli {
        command: Command::Reach(ReachCommand { path, start, end }),
    })?;
    assert_eq!(
        outcome,
        CommandOutcome::Reachability {
            name: "query".to_owned(),
            start,
            end,
            reachable: expected,
        }
    );
    Ok(())
}

#[rstest]
fn reach_rejects_unknown_nodes() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "query.csv", PATH_GRAPH)?;
    let err = run_cli_expecting_error(
        Cli {
            command: Command::Reach(ReachCommand {
                path,
                start: 0,
                end: 9,
            }),
        },
        "node 9 does not exist",
    );
    assert!(matches!(
        err,
        CliError::Core(GraphError::OutOfRange { index: 9, .. })
    ));
    Ok(())
}

#[rstest]
fn edit_overwrites_input_by_default() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let outcome = run_cli(Cli {
        command: Command::Edit(EditCommand {
            path: path.clone(),
            output: None,
            operation: EditOperation::AddEdge {
                source: 3,
                target: 0,
                weight: 4.0,
            },
        }),
    })?;
    assert_eq!(written_paths(outcome), vec![path.clone()]);
    let graph = load(&path);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.edge_weight(0, 3), Some(4.0));
    Ok(())
}

#[rstest]
fn edit_writes_to_output_and_leaves_input() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let output = dir.path().join("trimmed.csv");
    run_cli(Cli {
        command: Command::Edit(EditCommand {
            path: path.clone(),
            output: Some(output.clone()),
            operation: EditOperation::RemoveNodes {
                indices: vec![1, 1],
            },
        }),
    })?;
    assert_eq!(fs::read_to_string(&path)?, PATH_GRAPH);
    let graph = load(&output);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_weight(1, 2), Some(3.0));
    Ok(())
}

#[rstest]
fn failed_edit_leaves_file_untouched() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let err = run_cli_expecting_error(
        Cli {
            command: Command::Edit(EditCommand {
                path: path.clone(),
                output: None,
                operation: EditOperation::UpdateEdge {
                    source: 0,
                    target: 3,
                    weight: 1.0,
                },
            }),
        },
        "edge 0-3 does not exist",
    );
    assert!(matches!(
        err,
        CliError::Core(GraphError::EdgeNotFound { origin: 0, target: 3 })
    ));
    assert_eq!(fs::read_to_string(&path)?, PATH_GRAPH);
    Ok(())
}

#[rstest]
#[case::add_nodes(EditOperation::AddNodes { count: 2 }, 6, 3)]
#[case::remove_edge(EditOperation::RemoveEdge { source: 2, target: 1 }, 4, 2)]
#[case::small_world(EditOperation::SmallWorld { rate: 1.0, seed: 3 }, 4, 3)]
fn apply_edit_mutates_graph(
    #[case] operation: EditOperation,
    #[case] nodes: usize,
    #[case] edges: usize,
) {
    let mut graph = Graph::from_edges(4, false, [(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0)])
        .expect("edges are in range");
    apply_edit(&mut graph, &operation).expect("operation is valid");
    assert_eq!(graph.node_count(), nodes);
    assert_eq!(graph.edge_count(), edges);
}

#[rstest]
fn export_writes_node_and_edge_files() -> TestResult {
    let dir = temp_dir();
    let path = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let command = ExportCommand {
        path,
        name: None,
        output_dir: dir.path().to_path_buf(),
    };
    let first = written_paths(run_cli(Cli {
        command: Command::Export(command.clone()),
    })?);
    assert_eq!(
        first,
        vec![dir.path().join("nodes_path.csv"), dir.path().join("edges_path.csv")]
    );
    let nodes = fs::read_to_string(dir.path().join("nodes_path.csv"))?;
    assert_eq!(nodes.lines().count(), 5);
    assert!(nodes.starts_with("nodeIndex,reachNodeCount,degreeDistribution,distanceTo0thNode,"));
    assert_eq!(fs::read_to_string(dir.path().join("edges_path.csv"))?, "4,3,False\n0,1,1\n1,2,2\n2,3,3\n");

    let second = written_paths(run_cli(Cli {
        command: Command::Export(command),
    })?);
    assert_eq!(
        second,
        vec![dir.path().join("nodes_path0.csv"), dir.path().join("edges_path0.csv")]
    );
    Ok(())
}

#[rstest]
fn summary_writes_one_row_per_graph() -> TestResult {
    let dir = temp_dir();
    let first = create_text_file(&dir, "path.csv", PATH_GRAPH)?;
    let second = create_text_file(&dir, "split.csv", SPLIT_GRAPH)?;
    let output = dir.path().join("summary.csv");
    let command = SummaryCommand {
        paths: vec![first, second],
        output: output.clone(),
    };
    let written = written_paths(run_cli(Cli {
        command: Command::Summary(command.clone()),
    })?);
    assert_eq!(written, vec![output.clone()]);
    let text = fs::read_to_string(&output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("0,path,False,4,3,"));
    assert!(lines[2].starts_with("1,split,False,4,2,"));

    let again = written_paths(run_cli(Cli {
        command: Command::Summary(command),
    })?);
    assert_eq!(again, vec![dir.path().join("summary0.csv")]);
    Ok(())
}

#[rstest]
fn render_outcome_lists_verdicts() -> TestResult {
    let outcome = CommandOutcome::Connectivity(vec![
        Connectivity {
            name: "a".into(),
            connected: true,
        },
        Connectivity {
            name: "b".into(),
            connected: false,
        },
    ]);
    let mut buffer = Vec::new();
    render_outcome(&outcome, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, "a: connected\nb: disconnected\n");
    Ok(())
}

fn run_script(dir: &tempfile::TempDir, script: &str) -> Result<CommandOutcome, CliError> {
    let script = match create_text_file(dir, "steps.txt", script) {
        Ok(path) => path,
        Err(err) => panic!("failed to write script: {err}"),
    };
    run_cli(Cli {
        command: Command::Session(SessionCommand { script }),
    })
}

#[rstest]
fn session_scripts_share_one_graph_list() -> TestResult {
    let dir = temp_dir();
    let input = create_text_file(&dir, "path_file.csv", PATH_GRAPH)?;
    let out = dir.path();
    let script = format!(
        "# two generated graphs and one import\n\
         generate full --node-count 4 --name complete\n\
         generate empty --node-count 3 --name loose\n\
         import {input}\n\
         rename 2 path\n\
         swap complete loose\n\
         edit path add-edge 0 3 1.5\n\
         remove 1\n\
         check\n\
         reach path 0 3\n\
         export path --output-dir {out}\n\
         summary --output {summary}\n",
        input = input.display(),
        out = out.display(),
        summary = out.join("summary.csv").display(),
    );

    let outcome = run_script(&dir, &script)?;
    let nodes = out.join("nodes_path.csv");
    let edges = out.join("edges_path.csv");
    let summary = out.join("summary.csv");
    assert_eq!(
        outcome,
        CommandOutcome::Steps(vec![
            CommandOutcome::Connectivity(vec![
                Connectivity {
                    name: "loose".to_owned(),
                    connected: false,
                },
                Connectivity {
                    name: "path".to_owned(),
                    connected: true,
                },
            ]),
            CommandOutcome::Reachability {
                name: "path".to_owned(),
                start: 0,
                end: 3,
                reachable: true,
            },
            CommandOutcome::Written(vec![nodes.clone(), edges.clone()]),
            CommandOutcome::Written(vec![summary.clone()]),
        ])
    );

    let edited = load(&edges);
    assert_eq!(edited.edge_count(), 4);
    assert_eq!(edited.edge_weight(3, 0), Some(1.5));
    assert!(nodes.exists());
    let rows = fs::read_to_string(&summary)?;
    let rows: Vec<&str> = rows.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("0,loose,False,3,0,"));
    assert!(rows[2].starts_with("1,path,False,4,4,"));
    assert_eq!(fs::read_to_string(&input)?, PATH_GRAPH);
    Ok(())
}

#[rstest]
fn session_generate_with_output_writes_the_graph() -> TestResult {
    let dir = temp_dir();
    let output = dir.path().join("ring6.csv");
    let script = format!(
        "generate ring --node-count 6 --degree 2 --output {}\ncheck ring6\n",
        output.display()
    );
    let outcome = run_script(&dir, &script)?;
    assert_eq!(
        outcome,
        CommandOutcome::Steps(vec![
            CommandOutcome::Written(vec![output.clone()]),
            CommandOutcome::Connectivity(vec![Connectivity {
                name: "ring6".to_owned(),
                connected: true,
            }]),
        ])
    );
    assert_eq!(load(&output).edge_count(), 6);
    Ok(())
}

#[rstest]
fn session_parses_every_line_before_running() {
    let dir = temp_dir();
    let output = dir.path().join("never.csv");
    let script = format!(
        "generate full --output {}\nfrobnicate 3\n",
        output.display()
    );
    let err = run_script(&dir, &script).expect_err("unknown steps must fail");
    assert!(matches!(err, CliError::InvalidStep { line: 2, .. }));
    assert_eq!(err.code(), "CLI_INVALID_STEP");
    assert!(!output.exists());
}

#[rstest]
#[case::rename_unknown("generate empty --node-count 2 --name a\nrename b c\n", 2, "CLI_UNKNOWN_GRAPH")]
#[case::swap_past_end("generate empty --name a\n\nswap 0 1\n", 3, "CLI_UNKNOWN_GRAPH")]
#[case::removed_graph("generate full --name a\nremove a\ncheck a\n", 3, "CLI_UNKNOWN_GRAPH")]
#[case::bad_edit("generate empty --node-count 2 --name a\nedit a remove-edge 0 1\n", 2, "GRAPH_EDGE_NOT_FOUND")]
fn failing_steps_report_their_line(
    #[case] script: &str,
    #[case] expected_line: usize,
    #[case] expected_code: &str,
) {
    let dir = temp_dir();
    let err = run_script(&dir, script).expect_err("step must fail");
    assert!(matches!(err, CliError::Step { line, .. } if line == expected_line));
    assert_eq!(err.code(), expected_code);
    assert!(err.to_string().starts_with(&format!("line {expected_line}: ")));
}

#[rstest]
fn session_reports_unreadable_scripts() {
    let dir = temp_dir();
    let err = run_cli_expecting_error(
        Cli {
            command: Command::Session(SessionCommand {
                script: dir.path().join("missing.txt"),
            }),
        },
        "missing scripts must fail",
    );
    assert!(matches!(err, CliError::Read { .. }));
    assert_eq!(err.code(), "CLI_READ");
}

#[rstest]
fn render_outcome_flattens_session_steps() -> TestResult {
    let outcome = CommandOutcome::Steps(vec![
        CommandOutcome::Reachability {
            name: "g".into(),
            start: 1,
            end: 2,
            reachable: false,
        },
        CommandOutcome::Steps(vec![CommandOutcome::Written(vec!["out.csv".into()])]),
    ]);
    let mut buffer = Vec::new();
    render_outcome(&outcome, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, "g: 1 -> 2 unreachable\nwrote out.csv\n");
    Ok(())
}

#[rstest]
fn clap_parses_session_scripts() {
    let cli = Cli::try_parse_from(["graphloom", "session", "steps.txt"]).expect("session must parse");
    let Command::Session(session) = cli.command else {
        panic!("expected session command");
    };
    assert_eq!(session.script, Path::new("steps.txt"));
}

#[rstest]
fn clap_parses_negative_edge_weights() {
    let cli = Cli::try_parse_from(["graphloom", "edit", "g.csv", "add-edge", "0", "1", "-2.5"])
        .expect("negative weights must parse");
    let Command::Edit(edit) = cli.command else {
        panic!("expected edit command");
    };
    assert!(matches!(
        edit.operation,
        EditOperation::AddEdge {
            source: 0,
            target: 1,
            ..
        }
    ));
}

#[rstest]
fn clap_applies_generate_defaults() {
    let cli = Cli::try_parse_from(["graphloom", "generate", "odd-regular"])
        .expect("defaults must parse");
    let Command::Generate(args) = cli.command else {
        panic!("expected generate command");
    };
    assert_eq!(args.category, GraphCategory::OddRegular);
    assert_eq!(args.node_count, 10);
    assert_eq!(args.dim, 2);
    assert_eq!(args.degree, None);
    assert_eq!(args.seed, super::DEFAULT_SEED);
}

#[rstest]
#[case::unknown_category(&["graphloom", "generate", "hypercube"])]
#[case::check_without_files(&["graphloom", "check"])]
#[case::edit_without_operation(&["graphloom", "edit", "g.csv"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
