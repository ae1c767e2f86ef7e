//! ClaimGraph: signed belief propagation over fact-checking graphs.

use std::path::{Path, PathBuf};

use claimgraph_runtime::{ParameterGrid, Propagator};
use claimgraph_store::FactGraph;
use tokio_stream::StreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod validate;

fn usage(command: &str) -> ! {
    eprintln!("Usage: claimgraph {}", command);
    std::process::exit(1);
}

fn load_graph(path: &Path) -> anyhow::Result<FactGraph> {
    FactGraph::load_json(path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))
}

/// Value following `flag` in `args`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage("<command> [args]. Use 'claimgraph help' for usage.");
    }

    match args[1].as_str() {
        "--validate" | "validate" => {
            let Some(path) = args.get(2).map(PathBuf::from) else {
                usage("validate <graph.json>");
            };
            let report = validate::validate(&path);
            validate::print_report(&report);
            std::process::exit(if report.graph_valid { 0 } else { 1 });
        }
        "run" => {
            let Some(path) = args.get(2).map(PathBuf::from) else {
                usage("run <graph.json> [--out <graph.json>]");
            };
            let mut graph = load_graph(&path)?;
            let propagator = Propagator::from_env()?;
            let eval = propagator.evaluate(&mut graph)?;

            let summary = serde_json::json!({
                "params": eval.params,
                "before": eval.before,
                "after": eval.after,
                "subgraphs": eval.report.subgraphs.len(),
                "nonConvergent": eval.report.non_convergent(),
                "steps": eval.report.steps(),
                "durationMs": eval.report.duration_ms,
                "scores": graph.scores(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);

            if let Some(out) = flag_value(&args, "--out") {
                let json = serde_json::to_string_pretty(&graph.to_document())?;
                std::fs::write(out, json)?;
                info!("Wrote propagated graph to {}", out);
            }
        }
        "play" => {
            let Some(path) = args.get(2).map(PathBuf::from) else {
                usage("play <graph.json>");
            };
            let mut graph = load_graph(&path)?;
            let propagator = Propagator::from_env()?;
            let report = propagator.run(&mut graph)?;
            let playback = propagator.playback(&report);
            info!(
                "Playing {} frames, {:?} apart",
                playback.len(),
                playback.delay()
            );

            let mut frames = Box::pin(playback.stream());
            while let Some(frame) = frames.next().await {
                println!("{}", serde_json::to_string(&frame)?);
            }
        }
        "sweep" => {
            let Some(path) = args.get(2).map(PathBuf::from) else {
                usage("sweep <graph.json> [c-steps] [sign-steps]");
            };
            let defaults = ParameterGrid::default();
            let grid = ParameterGrid {
                c_steps: match args.get(3) {
                    Some(s) => s.parse()?,
                    None => defaults.c_steps,
                },
                sign_steps: match args.get(4) {
                    Some(s) => s.parse()?,
                    None => defaults.sign_steps,
                },
                ..defaults
            };
            let mut graph = load_graph(&path)?;
            info!("Sweeping {} parameter combinations", grid.len());

            let mut failed: Option<serde_json::Error> = None;
            claimgraph_runtime::sweep_each(&mut graph, &grid, |row| {
                if failed.is_some() {
                    return;
                }
                match serde_json::to_string(&row) {
                    Ok(line) => println!("{}", line),
                    Err(e) => failed = Some(e),
                }
            })?;
            if let Some(e) = failed {
                return Err(e.into());
            }
        }
        "--help" | "-h" | "help" => {
            println!("ClaimGraph: signed belief propagation for fact-checking graphs");
            println!();
            println!("Usage: claimgraph <command> [args]");
            println!();
            println!("Commands:");
            println!("  validate <graph.json>                     Check a graph document");
            println!("  run <graph.json> [--out <file>]           Propagate once and print verdicts and scores");
            println!("  play <graph.json>                         Print every propagation step as a JSON line");
            println!("  sweep <graph.json> [c-steps] [sign-steps] Print verdicts over a parameter grid");
            println!("  help                                      Show this help message");
            println!();
            println!("Environment:");
            println!("  CLAIMGRAPH_C, CLAIMGRAPH_THETA, CLAIMGRAPH_MU, CLAIMGRAPH_BETA, CLAIMGRAPH_GAMMA");
            println!("  CLAIMGRAPH_EPSILON, CLAIMGRAPH_MAX_ITERATIONS, CLAIMGRAPH_DELAY_SECS");
            println!("  RUST_LOG                                  Log filter (default: info)");
        }
        _ => {
            eprintln!("Unknown command: {}. Use 'claimgraph help' for usage.", args[1]);
            std::process::exit(1);
        }
    }

    Ok(())
}
