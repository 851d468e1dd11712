use std::path::PathBuf;

use anyhow::{bail, Result};

use sgsearch::graph::{EdgeDir, StringGraph};
use sgsearch::mmap::load_graph;
use sgsearch::parser::GFAParsingConfig;
use sgsearch::search::{
    count_spanning_coverage, find_collapsed_walks, find_variant_walks,
    SearchConfig, SearchOutcome,
};
use sgsearch::stats::GraphStats;

#[cfg(feature = "serde1")]
fn load_config(path: Option<&String>) -> Result<SearchConfig> {
    match path {
        Some(path) => Ok(SearchConfig::load_json(path)?),
        None => Ok(SearchConfig::default()),
    }
}

#[cfg(not(feature = "serde1"))]
fn load_config(path: Option<&String>) -> Result<SearchConfig> {
    if path.is_some() {
        log::warn!("built without serde1, ignoring search config file");
    }
    Ok(SearchConfig::default())
}

fn report_bubbles(graph: &StringGraph, config: &SearchConfig) {
    let mut found = 0;
    let mut aborted = 0;

    for vertex in graph.vertices() {
        for &dir in EdgeDir::BOTH.iter() {
            if vertex.degree(dir) < 2 {
                continue;
            }
            match find_variant_walks(
                graph,
                vertex.id(),
                dir,
                config.max_distance,
                config.max_walks,
            ) {
                SearchOutcome::Found(walks) => {
                    found += 1;
                    log::debug!(
                        "bubble at {} {}: {} walks",
                        vertex.name(),
                        dir,
                        walks.len()
                    );
                }
                SearchOutcome::Aborted => aborted += 1,
                SearchOutcome::NotFound => (),
            }
        }
    }

    println!("# bubbles: {}", found);
    println!("# bubble searches aborted: {}", aborted);
}

/// Convergence sites regardless of whether the bubble is isolated
fn report_collapsed(graph: &StringGraph, config: &SearchConfig) {
    let mut found = 0;
    let mut aborted = 0;

    for vertex in graph.vertices() {
        for &dir in EdgeDir::BOTH.iter() {
            if vertex.degree(dir) < 2 {
                continue;
            }
            match find_collapsed_walks(
                graph,
                vertex.id(),
                dir,
                config.max_distance,
                config.max_nodes,
            ) {
                SearchOutcome::Found(_) => found += 1,
                SearchOutcome::Aborted => aborted += 1,
                SearchOutcome::NotFound => (),
            }
        }
    }

    println!("# converging branches: {}", found);
    println!("# convergence searches aborted: {}", aborted);
}

fn report_coverage(graph: &StringGraph, config: &SearchConfig) {
    let mut min = None;
    let mut max = None;
    let mut aborted = 0;

    for edge in graph.edge_ids() {
        if graph.edge(edge).is_containment() {
            continue;
        }
        match count_spanning_coverage(graph, edge, config.max_queue) {
            Some(cov) => {
                min = Some(min.map_or(cov, |m: usize| m.min(cov)));
                max = Some(max.map_or(cov, |m: usize| m.max(cov)));
            }
            None => aborted += 1,
        }
    }

    match (min, max) {
        (Some(min), Some(max)) => {
            println!("# spanning coverage: min {} max {}", min, max)
        }
        _ => println!("# spanning coverage: none"),
    }
    println!("# coverage searches aborted: {}", aborted);
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        bail!("usage: {} <graph.gfa> [search.json]", args[0]);
    }
    let path = PathBuf::from(&args[1]);
    let config = load_config(args.get(2))?;

    let graph = load_graph(&path, GFAParsingConfig::default())?;
    let stats = GraphStats::compute(&graph);
    log::info!("{}", stats);

    println!("# vertices: {}", stats.vertices);
    println!("# edges: {}", stats.edges);

    report_collapsed(&graph, &config);
    report_bubbles(&graph, &config);
    report_coverage(&graph, &config);

    Ok(())
}
