use crate::graph::{EdgeId, StringGraph, VertexId};

/// One traversed edge of a walk, with the vertex it leads to and the
/// sequence length it adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalkStep {
    pub edge: EdgeId,
    pub end: VertexId,
    pub extension: usize,
}

/// A walk through a string graph: a start vertex followed by a chain
/// of edges. Walks only hold handles into the graph, so cloning a
/// walk produces a fully independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    start: VertexId,
    steps: Vec<WalkStep>,
    extension: usize,
    finished: bool,
}

/// The ordered vertex IDs a walk visits, start vertex first. Two
/// walks with equal signatures are redundant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathSignature(Vec<VertexId>);

impl PathSignature {
    pub fn vertices(&self) -> &[VertexId] {
        &self.0
    }
}

impl std::fmt::Display for PathSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl Walk {
    pub fn new(start: VertexId) -> Self {
        Walk {
            start,
            steps: Vec::new(),
            extension: 0,
            finished: false,
        }
    }

    /// Create a walk consisting of a single edge
    pub fn from_edge(graph: &StringGraph, edge: EdgeId) -> Self {
        let mut walk = Walk::new(graph.edge(edge).start());
        walk.add_edge(graph, edge);
        walk
    }

    /// Append an edge to the walk. Panics if the edge is a
    /// containment edge, or if it doesn't leave the walk's last
    /// vertex; either means the graph or the caller is broken.
    pub fn add_edge(&mut self, graph: &StringGraph, edge: EdgeId) {
        let e = graph.edge(edge);
        assert!(
            !e.is_containment(),
            "containment edge {} ({} -> {}) in a walk",
            edge,
            e.start(),
            e.end()
        );
        assert_eq!(
            self.last_vertex(),
            e.start(),
            "edge {} doesn't continue the walk",
            edge
        );
        debug_assert!(e.extension_len() > 0);

        self.extension += e.extension_len();
        self.steps.push(WalkStep {
            edge,
            end: e.end(),
            extension: e.extension_len(),
        });
    }

    /// Remove the last edge, returning it
    pub fn pop_last(&mut self) -> Option<EdgeId> {
        let step = self.steps.pop()?;
        self.extension -= step.extension;
        Some(step.edge)
    }

    /// Drop every edge after the first edge that reaches `id`.
    /// Returns false, leaving the walk untouched, if no edge of the
    /// walk ends at `id`.
    pub fn truncate(&mut self, id: VertexId) -> bool {
        match self.steps.iter().position(|s| s.end == id) {
            Some(ix) => {
                for step in self.steps.drain(ix + 1..) {
                    self.extension -= step.extension;
                }
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn last_edge(&self) -> Option<EdgeId> {
        self.steps.last().map(|s| s.edge)
    }

    /// The vertex at the tip of the walk; the start vertex if the
    /// walk has no edges
    pub fn last_vertex(&self) -> VertexId {
        self.steps.last().map(|s| s.end).unwrap_or(self.start)
    }

    /// Number of edges in the walk
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn edge(&self, ix: usize) -> Option<EdgeId> {
        self.steps.get(ix).map(|s| s.edge)
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.steps.iter().map(|s| s.edge)
    }

    pub fn steps(&self) -> &[WalkStep] {
        &self.steps
    }

    /// Total length of sequence added by the walk's edges
    #[inline]
    pub fn extension_distance(&self) -> usize {
        self.extension
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    /// Produces an iterator over the visited vertices, starting with
    /// the start vertex
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        std::iter::once(self.start).chain(self.steps.iter().map(|s| s.end))
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices().any(|v| v == id)
    }

    pub fn path_signature(&self) -> PathSignature {
        PathSignature(self.vertices().collect())
    }
}
