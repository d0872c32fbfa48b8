use clap::Parser;
use slotgraph::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Evaluates a required-slots graph against a conversation state
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph definition JSON file
    graph_path: String,
    /// Optional path to a JSON object of slot values; defaults to an empty conversation
    state_path: Option<String>,

    /// Start the traversal at this node instead of the start node
    #[arg(short, long)]
    start: Option<String>,

    /// Print every edge considered during traversal to stderr
    #[arg(short, long)]
    explain: bool,

    /// Strictly validate the graph before evaluating it
    #[arg(long)]
    validate: bool,

    /// Disable the cycle guard (a cyclic graph will then recurse without bound)
    #[arg(long)]
    no_cycle_guard: bool,

    /// Log debug diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // --- 1. Loading ---
    let load_start = Instant::now();
    let definition = GraphDefinition::from_file(&cli.graph_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e), 1));
    let state = match &cli.state_path {
        Some(path) => ConversationState::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load conversation state: {}", e), 1)
        }),
        None => ConversationState::new(),
    };
    let load_duration = load_start.elapsed();

    // --- 2. Validation ---
    if cli.validate
        && let Err(findings) = RequiredSlotsGraph::validate(&definition)
    {
        for finding in &findings {
            eprintln!("invalid graph: {}", finding);
        }
        exit_with_error(&format!("{} validation finding(s)", findings.len()), 2);
    }

    // --- 3. Build ---
    let build_start = Instant::now();
    let graph = RequiredSlotsGraph::builder(&definition)
        .cycle_guard(!cli.no_cycle_guard)
        .build();
    let build_duration = build_start.elapsed();

    // --- 4. Evaluation ---
    let eval_start = Instant::now();
    let result = if cli.explain {
        let (result, trace) = match &cli.start {
            Some(start) => graph.explain_from(&state, start),
            None => graph.explain(&state),
        };
        eprintln!("{}", TraceFormatter::format(&trace, &result));
        result
    } else {
        match &cli.start {
            Some(start) => graph.required_slots_from(&state, start),
            None => graph.required_slots(&state),
        }
    };
    let eval_duration = eval_start.elapsed();

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize result: {}", e), 1),
    }

    tracing::debug!(
        ?load_duration,
        ?build_duration,
        ?eval_duration,
        nodes = graph.node_count(),
        slots = state.len(),
        "evaluation finished"
    );
}

fn exit_with_error(message: &str, code: i32) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(code);
}
