use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sgsearch::graph::{EdgeDir, StringGraph, VertexId};
use sgsearch::parser::GFAParser;
use sgsearch::search::{find_variant_walks, find_walks};

/// GFA text for a chain of `n` bubbles; bubble `i` branches at `s{i}`
/// over `a{i}` and `b{i}` and joins again at `s{i+1}`.
fn bubble_chain(n: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..=n {
        lines.push(format!("S\ts{}\t*\tLN:i:200", i));
    }
    for i in 0..n {
        lines.push(format!("S\ta{}\t*\tLN:i:150", i));
        lines.push(format!("S\tb{}\t*\tLN:i:160", i));
        for branch in &["a", "b"] {
            lines.push(format!("L\ts{}\t+\t{}{}\t+\t100M", i, branch, i));
            lines.push(format!("L\t{}{}\t+\ts{}\t+\t100M", branch, i, i + 1));
        }
    }
    lines
}

fn build_chain(n: usize) -> StringGraph {
    let lines = bubble_chain(n);
    GFAParser::new()
        .parse_lines(lines.iter().map(|l| l.as_bytes()))
        .unwrap()
}

fn vertex(graph: &StringGraph, name: &str) -> VertexId {
    graph.vertex_id(name).unwrap()
}

fn bench_variant_walks(c: &mut Criterion) {
    let graph = build_chain(100);
    c.bench_with_input(
        BenchmarkId::new("find_variant_walks", "chain_100"),
        &graph,
        |b, g| {
            b.iter(|| {
                g.vertices()
                    .filter(|v| v.degree(EdgeDir::Sense) > 1)
                    .filter(|v| {
                        find_variant_walks(g, v.id(), EdgeDir::Sense, 500, 4)
                            .is_found()
                    })
                    .count()
            })
        },
    );
}

fn bench_find_walks(c: &mut Criterion) {
    let graph = build_chain(12);
    let start = vertex(&graph, "s0");
    let end = vertex(&graph, "s12");
    for &max_queue in &[64usize, 4096] {
        c.bench_with_input(
            BenchmarkId::new("find_walks", max_queue),
            &max_queue,
            |b, &q| {
                b.iter(|| {
                    find_walks(&graph, start, end, EdgeDir::Sense, 2000, q)
                })
            },
        );
    }
}

fn bench_build_graph(c: &mut Criterion) {
    let lines = bubble_chain(1000);
    c.bench_with_input(
        BenchmarkId::new("parse_lines", "chain_1000"),
        &lines,
        |b, l| {
            b.iter(|| {
                GFAParser::new()
                    .parse_lines(l.iter().map(|s| s.as_bytes()))
                    .unwrap()
            })
        },
    );
}

criterion_group!(
    name = search_benches;
    config = Criterion::default().sample_size(25);
    targets = bench_variant_walks, bench_find_walks
);

criterion_group!(
    name = loading_benches;
    config = Criterion::default().sample_size(25);
    targets = bench_build_graph
);

criterion_main!(search_benches, loading_benches);
