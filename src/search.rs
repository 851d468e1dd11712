//! Bounded walk searches over a string graph.
//!
//! All searches are exact and bounded by the caller: when a bound is
//! exceeded, everything found so far is discarded and the search
//! reports `SearchOutcome::Aborted`, so callers can tell "nothing to
//! do here" apart from "too complex to analyse here".
//!
//! Every non-containment edge of a `StringGraph` extends a walk by at
//! least one base, so the distance bounds guarantee termination.

pub mod config;
pub mod tree;

pub use self::config::*;
pub use self::tree::SearchTree;

use std::collections::{BTreeMap, VecDeque};

use fnv::FnvHashSet;

use crate::graph::{EdgeDir, EdgeId, StringGraph, VertexId};
use crate::walk::Walk;

/// The frontier of a breadth-first walk search
pub type WalkQueue = VecDeque<Walk>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    Found(T),
    /// The search ran to completion without finding anything
    NotFound,
    /// The search exceeded one of its bounds and gave up
    Aborted,
}

impl<T> SearchOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SearchOutcome::Aborted)
    }

    pub fn found(self) -> Option<T> {
        match self {
            SearchOutcome::Found(t) => Some(t),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SearchOutcome<U> {
        match self {
            SearchOutcome::Found(t) => SearchOutcome::Found(f(t)),
            SearchOutcome::NotFound => SearchOutcome::NotFound,
            SearchOutcome::Aborted => SearchOutcome::Aborted,
        }
    }
}

impl SearchOutcome<Vec<Walk>> {
    fn from_walks(walks: Vec<Walk>) -> Self {
        if walks.is_empty() {
            SearchOutcome::NotFound
        } else {
            SearchOutcome::Found(walks)
        }
    }

    /// The found walks, or an empty vector if the search failed for
    /// any reason
    pub fn into_walks(self) -> Vec<Walk> {
        self.found().unwrap_or_default()
    }
}

/// Seed a frontier with one single-edge walk per edge leaving
/// `start` in `dir`.
pub fn initialize_walk_queue(
    graph: &StringGraph,
    start: VertexId,
    dir: EdgeDir,
) -> WalkQueue {
    graph
        .edges(start, dir)
        .iter()
        .map(|&edge| Walk::from_edge(graph, edge))
        .collect()
}

/// Extend `walk` with the edges leaving `vertex` in `dir`. The walk
/// itself takes the first edge; a copy of it is pushed onto the back
/// of the queue for each other edge. If there are no edges the walk
/// is marked finished and false is returned.
pub fn extend_walk(
    graph: &StringGraph,
    vertex: VertexId,
    dir: EdgeDir,
    walk: &mut Walk,
    queue: &mut WalkQueue,
) -> bool {
    let edges = graph.edges(vertex, dir);

    let (first, rest) = match edges.split_first() {
        Some(split) => split,
        None => {
            walk.set_finished(true);
            return false;
        }
    };

    for &edge in rest {
        let mut branch = walk.clone();
        branch.add_edge(graph, edge);
        queue.push_back(branch);
    }

    walk.add_edge(graph, *first);
    true
}

/// Advance the walk at the front of the queue from the end of its
/// last edge; it's dropped if it hits a dead end.
fn continue_front(graph: &StringGraph, mut walk: Walk, queue: &mut WalkQueue) {
    let last = last_edge(&walk);
    let edge = graph.edge(last);
    if extend_walk(graph, edge.end(), edge.transitive_dir(), &mut walk, queue) {
        queue.push_front(walk);
    }
}

fn last_edge(walk: &Walk) -> EdgeId {
    walk.last_edge()
        .expect("walks in a search frontier always hold an edge")
}

/// Find every walk from `start`, leaving in `dir`, that reaches
/// `target` without exceeding `max_distance`. Walks stop at their
/// first visit to `target`. The search is aborted if the frontier ever
/// grows past `max_queue` walks, even if some walks were found already.
pub fn find_walks(
    graph: &StringGraph,
    start: VertexId,
    target: VertexId,
    dir: EdgeDir,
    max_distance: usize,
    max_queue: usize,
) -> SearchOutcome<Vec<Walk>> {
    let mut queue = initialize_walk_queue(graph, start, dir);
    let mut found = Vec::new();

    while let Some(walk) = queue.pop_front() {
        if queue.len() + 1 > max_queue {
            log::debug!(
                "find_walks from {} to {} aborted, frontier exceeded {}",
                start,
                target,
                max_queue
            );
            return SearchOutcome::Aborted;
        }

        if walk.extension_distance() > max_distance {
            continue;
        }
        if walk.last_vertex() == target {
            found.push(walk);
        } else {
            continue_front(graph, walk, &mut queue);
        }
    }

    SearchOutcome::from_walks(found)
}

/// Count the reads that span the junction between the two reads
/// joined by `edge`.
///
/// ```text
/// X --------------
/// Y        ------------
/// Z            -----------
/// W                ----------
/// ```
///
/// Walking on from X over Y, a walk stops as soon as its last read no
/// longer overlaps X. Here Z spans the X-Y junction and W doesn't.
/// Returns the number of distinct reads on the stopped walks, or
/// `None` if the frontier grew past `max_queue` walks.
pub fn count_spanning_coverage(
    graph: &StringGraph,
    edge: EdgeId,
    max_queue: usize,
) -> Option<usize> {
    let mut queue = WalkQueue::new();
    queue.push_back(Walk::from_edge(graph, edge));

    let mut spanned = Vec::new();

    while let Some(mut walk) = queue.pop_front() {
        if queue.len() + 1 > max_queue {
            log::debug!(
                "spanning coverage of {} aborted, frontier exceeded {}",
                edge,
                max_queue
            );
            return None;
        }

        let seq_len = graph.vertex(walk.last_vertex()).seq_len() as i64;
        let overlap = seq_len - walk.extension_distance() as i64;
        if overlap <= 0 {
            walk.pop_last();
            spanned.push(walk);
        } else {
            continue_front(graph, walk, &mut queue);
        }
    }

    let reads: FnvHashSet<VertexId> = spanned
        .iter()
        .flat_map(|w| w.steps().iter().map(|s| s.end))
        .collect();

    Some(reads.len())
}

/// Find a set of walks from `start` that diverge and then all meet
/// again at a common vertex, each of them within `max_distance`. The
/// walks end at the common vertex and are pairwise distinct.
pub fn find_collapsed_walks(
    graph: &StringGraph,
    start: VertexId,
    dir: EdgeDir,
    max_distance: usize,
    max_nodes: usize,
) -> SearchOutcome<Vec<Walk>> {
    let mut tree =
        SearchTree::new(graph, start, None, dir, max_distance, max_nodes);
    tree.set_index_flag(true);

    loop {
        let progressed = tree.step_once();
        if tree.was_search_aborted() {
            return SearchOutcome::Aborted;
        }

        if let Some(common) = tree.has_search_converged() {
            let walks = tree.build_walks_to_all_leaves();
            if walks.iter().any(|w| w.extension_distance() > max_distance) {
                log::debug!(
                    "collapsed walks from {} converged at {} past distance {}",
                    start,
                    common,
                    max_distance
                );
                return SearchOutcome::Aborted;
            }

            let mut non_redundant = BTreeMap::new();
            for mut walk in walks {
                let truncated = walk.truncate(common);
                assert!(
                    truncated,
                    "convergence vertex {} is missing from a walk from {}",
                    common,
                    start
                );
                non_redundant.entry(walk.path_signature()).or_insert(walk);
            }
            let walks: Vec<Walk> = non_redundant.into_iter().map(|(_, w)| w).collect();
            return SearchOutcome::from_walks(walks);
        }

        if !progressed {
            return SearchOutcome::NotFound;
        }
    }
}

/// Search for a bubble at `start`: a set of at least two, and at most
/// `max_walks`, alternative walks that start and end at the same
/// vertices, such that only one of them needs to be kept.
///
/// The walks are only returned if the bubble can be removed cleanly,
/// i.e. the vertices between the two endpoints have no edges leaving
/// the bubble, and neither endpoint has an edge into the bubble's side
/// that leads elsewhere.
pub fn find_variant_walks(
    graph: &StringGraph,
    start: VertexId,
    dir: EdgeDir,
    max_distance: usize,
    max_walks: usize,
) -> SearchOutcome<Vec<Walk>> {
    let walks = match find_collapsed_walks(
        graph,
        start,
        dir,
        max_distance,
        COLLAPSED_NODE_LIMIT,
    ) {
        SearchOutcome::Found(walks) => walks,
        other => return other,
    };

    if walks.len() < 2 {
        return SearchOutcome::NotFound;
    }
    if walks.len() > max_walks {
        log::debug!(
            "bubble at {} has {} walks, more than {}",
            start,
            walks.len(),
            max_walks
        );
        return SearchOutcome::Aborted;
    }

    if is_cleanly_removable(graph, start, dir, &walks) {
        SearchOutcome::Found(walks)
    } else {
        log::debug!("bubble at {} is connected to the rest of the graph", start);
        SearchOutcome::NotFound
    }
}

fn endpoints_in_set(
    graph: &StringGraph,
    edges: &[EdgeId],
    set: &FnvHashSet<VertexId>,
) -> bool {
    edges.iter().all(|&e| set.contains(&graph.edge(e).end()))
}

/// The walks all start at `start` and end at one shared vertex. Every
/// edge touching the bubble, other than those on the outer sides of
/// the two endpoints, must stay within the walks' vertices.
fn is_cleanly_removable(
    graph: &StringGraph,
    start: VertexId,
    dir: EdgeDir,
    walks: &[Walk],
) -> bool {
    let vertices: FnvHashSet<VertexId> =
        walks.iter().flat_map(|w| w.vertices()).collect();

    let last = graph.edge(last_edge(&walks[0]));
    let end = last.end();

    if !endpoints_in_set(graph, graph.edges(start, dir), &vertices) {
        return false;
    }
    if !endpoints_in_set(graph, graph.edges(end, last.twin_dir()), &vertices) {
        return false;
    }

    vertices
        .iter()
        .filter(|&&v| v != start && v != end)
        .all(|&v| {
            EdgeDir::BOTH
                .iter()
                .all(|&d| endpoints_in_set(graph, graph.edges(v, d), &vertices))
        })
}
