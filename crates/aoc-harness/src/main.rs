//! `aoc-runner`: runs the graphic object conformance scenario

use anyhow::Context;
use aoc_access::dump::render_tree;
use aoc_access::{AccessibilityProvider, Toolkit};
use aoc_harness::{
    run_with_check, EventBroadcasterCheck, FixtureBuilder, GraphicObjectCase, TestParameters,
};
use aoc_model::{Desktop, DocumentService};
use clap::builder::NonEmptyStringValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let common = [
        Arg::new("config")
            .long("config")
            .value_parser(value_parser!(PathBuf))
            .help("TOML file with test parameters"),
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Dump the accessible tree and log at debug level"),
    ];

    Command::new("aoc-runner")
        .version(aoc_harness::VERSION)
        .about("Accessible object conformance runner")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Run the graphic object scenario with the event broadcaster check")
                .args(common.clone())
                .arg(
                    Arg::new("sentinel")
                        .long("sentinel")
                        .value_parser(NonEmptyStringValueParser::new())
                        .help("Title written by the event producer"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the accessible tree of a freshly built fixture")
                .args(common),
        )
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_parameters(args: &ArgMatches) -> anyhow::Result<TestParameters> {
    let mut params = match args.get_one::<PathBuf>("config") {
        Some(path) => TestParameters::from_file(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => TestParameters::default(),
    };
    if args.get_flag("debug") {
        params = params.with_debug(true);
    }
    Ok(params)
}

fn run(args: &ArgMatches) -> anyhow::Result<bool> {
    let mut params = load_parameters(args)?;
    if let Some(sentinel) = args.get_one::<String>("sentinel") {
        params = params.with_sentinel_title(sentinel.clone());
    }

    let case = GraphicObjectCase::new(Desktop::new(), Toolkit::new()).with_parameters(params);
    let report = run_with_check(case, &EventBroadcasterCheck::new());

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.generate_text());
    }
    Ok(report.passed())
}

fn tree(args: &ArgMatches) -> anyhow::Result<()> {
    let params = load_parameters(args)?;
    let desktop = Desktop::new();
    let toolkit = Toolkit::new();

    let fixture = FixtureBuilder::from_parameters(&desktop, &params).build()?;
    let root = toolkit
        .current_window(fixture.document())
        .and_then(|window| toolkit.accessible_root(&window));
    let closed = desktop.close_document(fixture.document());
    toolkit.release(fixture.document());

    print!("{}", render_tree(&root?));
    closed?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let debug = matches
        .subcommand()
        .is_some_and(|(_, args)| args.get_flag("debug"));
    init_tracing(debug);

    let passed = match matches.subcommand() {
        Some(("run", args)) => run(args)?,
        Some(("tree", args)) => {
            tree(args)?;
            true
        }
        _ => unreachable!("subcommand is required"),
    };

    std::process::exit(if passed { 0 } else { 1 });
}
