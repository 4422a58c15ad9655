use std::env;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use graphmine::{DatasetLoader, GraphLoader, MainGraph, MiningConfig, MiningWorkflow};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

struct Args {
    graph: String,
    config: MiningConfig,
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let Some(graph) = args.next() else {
        bail!("usage: graphmine <graph.json | dataset> [key=value ...]");
    };

    let mut config = MiningConfig::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .with_context(|| format!("Expected key=value, got {arg:?}"))?;
        config.set(key, value)?;
    }
    config.validate()?;
    Ok(Args { graph, config })
}

fn load_graph(source: &str) -> Result<MainGraph> {
    let path = Path::new(source);
    if path.is_file() {
        GraphLoader::from_path(path)
    } else {
        DatasetLoader::default().load(source)
    }
}

fn main() -> Result<()> {
    init_logging();
    let Args { graph, config } = parse_args()?;

    let host = load_graph(&graph)?;
    info!(
        "Host graph {}: vertices {}, edges {}",
        graph,
        host.node_count(),
        host.edge_count()
    );

    let workflow = MiningWorkflow::new(config.clone())?;
    let summary = workflow.execute(&host)?;

    for (idx, (pattern, value)) in summary.aggregation.sorted().into_iter().enumerate() {
        info!("P#{}: {}: {}", idx, pattern, value);
    }
    info!(
        "Visited {}, reported {}, restarts {} in {:?}",
        summary.stats.visited,
        summary.stats.reported,
        summary.stats.walks.restarts,
        summary.duration
    );

    let report = summary.report(&config);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize mining report")?
    );
    Ok(())
}
