use fnv::FnvHashSet;

use crate::graph::{EdgeDir, EdgeId, StringGraph, VertexId};
use crate::walk::Walk;

/// A node of the search tree: a vertex reached over `edge` from
/// `parent`, plus the direction to leave it in.
#[derive(Debug, Clone)]
struct SearchNode {
    vertex: VertexId,
    dir: EdgeDir,
    parent: Option<usize>,
    edge: Option<EdgeId>,
    distance: usize,
}

/// Breadth-first search tree that advances every branch in lockstep,
/// one edge per step. Branches share their common prefix through
/// parent links, so forking a branch never copies or touches its
/// siblings.
///
/// The tree stops expanding once more than `node_limit` nodes have
/// been created, and doesn't expand leaves that are further than
/// `distance_limit` from the root. With a goal vertex, leaves that
/// reach the goal are set aside instead of being expanded.
pub struct SearchTree<'g> {
    graph: &'g StringGraph,
    nodes: Vec<SearchNode>,
    leaves: Vec<usize>,
    goal_leaves: Vec<usize>,
    goal: Option<VertexId>,
    distance_limit: usize,
    node_limit: usize,
    index_walks: bool,
    aborted: bool,
}

impl<'g> SearchTree<'g> {
    pub fn new(
        graph: &'g StringGraph,
        start: VertexId,
        goal: Option<VertexId>,
        dir: EdgeDir,
        distance_limit: usize,
        node_limit: usize,
    ) -> Self {
        let root = SearchNode {
            vertex: start,
            dir,
            parent: None,
            edge: None,
            distance: 0,
        };
        SearchTree {
            graph,
            nodes: vec![root],
            leaves: vec![0],
            goal_leaves: Vec::new(),
            goal,
            distance_limit,
            node_limit,
            index_walks: false,
            aborted: false,
        }
    }

    /// With indexing, convergence means every branch has passed
    /// through a common vertex; without it, every branch has to sit
    /// on the same vertex.
    pub fn set_index_flag(&mut self, index_walks: bool) {
        self.index_walks = index_walks;
    }

    pub fn was_search_aborted(&self) -> bool {
        self.aborted
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn is_goal(&self, ix: usize) -> bool {
        ix != 0 && Some(self.nodes[ix].vertex) == self.goal
    }

    /// Advance every expandable leaf by one edge. Returns false if no
    /// leaf could be expanded, or if the node budget is exhausted, in
    /// which case the search is marked as aborted.
    pub fn step_once(&mut self) -> bool {
        if self.aborted {
            return false;
        }
        if self.nodes.len() > self.node_limit {
            log::debug!(
                "search tree exceeded node limit ({} > {})",
                self.nodes.len(),
                self.node_limit
            );
            self.aborted = true;
            return false;
        }

        let graph = self.graph;
        let leaves = std::mem::take(&mut self.leaves);
        let mut next = Vec::with_capacity(leaves.len());
        let mut expanded = false;

        for ix in leaves {
            if self.is_goal(ix) {
                self.goal_leaves.push(ix);
                continue;
            }

            let (vertex, dir, distance) = {
                let node = &self.nodes[ix];
                (node.vertex, node.dir, node.distance)
            };

            let edges = graph.edges(vertex, dir);
            if distance > self.distance_limit || edges.is_empty() {
                next.push(ix);
                continue;
            }

            for &edge_id in edges {
                let edge = graph.edge(edge_id);
                assert!(
                    !edge.is_containment(),
                    "containment edge {} reached the search tree",
                    edge_id
                );
                next.push(self.nodes.len());
                self.nodes.push(SearchNode {
                    vertex: edge.end(),
                    dir: edge.transitive_dir(),
                    parent: Some(ix),
                    edge: Some(edge_id),
                    distance: distance + edge.extension_len(),
                });
            }
            expanded = true;
        }

        self.leaves = next;
        log::trace!(
            "search tree step: {} leaves, {} nodes",
            self.leaves.len(),
            self.nodes.len()
        );
        expanded
    }

    /// Iterate from a node up to (but excluding) the root
    fn ancestry(&self, ix: usize) -> impl Iterator<Item = &SearchNode> + '_ {
        let nodes = &self.nodes;
        std::iter::successors(Some(ix), move |&i| nodes[i].parent)
            .take_while(|&i| i != 0)
            .map(move |i| &nodes[i])
    }

    /// If every current leaf has converged on one vertex, return it.
    /// At least two leaves are needed; a single branch hasn't
    /// diverged from anything.
    pub fn has_search_converged(&self) -> Option<VertexId> {
        if self.leaves.len() < 2 {
            return None;
        }

        if !self.index_walks {
            let first = self.nodes[self.leaves[0]].vertex;
            let same = self
                .leaves
                .iter()
                .all(|&ix| ix != 0 && self.nodes[ix].vertex == first);
            return if same { Some(first) } else { None };
        }

        let indices: Vec<FnvHashSet<VertexId>> = self.leaves[1..]
            .iter()
            .map(|&ix| self.ancestry(ix).map(|n| n.vertex).collect())
            .collect();

        let mut first_path: Vec<VertexId> =
            self.ancestry(self.leaves[0]).map(|n| n.vertex).collect();
        first_path.reverse();

        first_path
            .into_iter()
            .find(|v| indices.iter().all(|index| index.contains(v)))
    }

    fn build_walk(&self, ix: usize) -> Walk {
        let mut edges: Vec<EdgeId> =
            self.ancestry(ix).filter_map(|n| n.edge).collect();
        edges.reverse();

        let mut walk = Walk::new(self.nodes[0].vertex);
        for edge in edges {
            walk.add_edge(self.graph, edge);
        }
        walk
    }

    /// One walk per current leaf, from the root to the leaf
    pub fn build_walks_to_all_leaves(&self) -> Vec<Walk> {
        self.leaves.iter().map(|&ix| self.build_walk(ix)).collect()
    }

    /// One walk per branch that reached the goal vertex
    pub fn build_walks_to_goal(&self) -> Vec<Walk> {
        self.goal_leaves.iter().map(|&ix| self.build_walk(ix)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Orientation::*;

    // a -> {b, c} -> d -> e
    fn diamond() -> (StringGraph, Vec<VertexId>) {
        let mut graph = StringGraph::new();
        let vs: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| graph.add_vertex(n, 100).unwrap())
            .collect();
        for &(x, y) in &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)] {
            graph.add_link(vs[x], Forward, vs[y], Forward, 50, 50).unwrap();
        }
        (graph, vs)
    }

    #[test]
    fn indexed_convergence() {
        let (graph, vs) = diamond();
        let mut tree = SearchTree::new(&graph, vs[0], None, EdgeDir::Sense, 1000, 100);
        tree.set_index_flag(true);

        assert!(tree.step_once());
        assert_eq!(None, tree.has_search_converged());
        assert!(tree.step_once());
        assert_eq!(Some(vs[3]), tree.has_search_converged());

        let walks = tree.build_walks_to_all_leaves();
        assert_eq!(2, walks.len());
        for walk in walks.iter() {
            assert_eq!(vs[0], walk.start());
            assert_eq!(vs[3], walk.last_vertex());
            assert_eq!(100, walk.extension_distance());
        }

        // still converged once the branches have moved past d
        assert!(tree.step_once());
        assert_eq!(Some(vs[3]), tree.has_search_converged());
    }

    #[test]
    fn unindexed_convergence_needs_shared_tip() {
        let (graph, vs) = diamond();
        let mut tree = SearchTree::new(&graph, vs[0], None, EdgeDir::Sense, 1000, 100);

        tree.step_once();
        tree.step_once();
        assert_eq!(Some(vs[3]), tree.has_search_converged());
        tree.step_once();
        assert_eq!(Some(vs[4]), tree.has_search_converged());

        // e is a dead end, nothing left to expand
        assert!(!tree.step_once());
        assert!(!tree.was_search_aborted());
    }

    #[test]
    fn node_limit_aborts() {
        let (graph, vs) = diamond();
        let mut tree = SearchTree::new(&graph, vs[0], None, EdgeDir::Sense, 1000, 2);
        assert!(tree.step_once());
        assert_eq!(3, tree.num_nodes());
        assert!(!tree.step_once());
        assert!(tree.was_search_aborted());
        assert!(!tree.step_once());
    }

    #[test]
    fn distance_limit_stops_expansion() {
        let (graph, vs) = diamond();
        let mut tree = SearchTree::new(&graph, vs[0], None, EdgeDir::Sense, 60, 100);
        assert!(tree.step_once());
        assert!(tree.step_once());
        // both leaves are at distance 100 > 60
        assert!(!tree.step_once());
        assert_eq!(5, tree.num_nodes());
    }

    #[test]
    fn goal_leaves_are_set_aside() {
        let (graph, vs) = diamond();
        let mut tree =
            SearchTree::new(&graph, vs[0], Some(vs[3]), EdgeDir::Sense, 1000, 100);
        while tree.step_once() {}

        let walks = tree.build_walks_to_goal();
        assert_eq!(2, walks.len());
        assert!(walks.iter().all(|w| w.last_vertex() == vs[3] && w.len() == 2));
        assert!(tree.build_walks_to_all_leaves().is_empty());
    }
}
