//! The string graph the searches run on: an arena of reads
//! (vertices) and directed overlaps (edges), addressed by `VertexId`
//! and `EdgeId` handles. Every overlap is stored as a pair of twin
//! edges, one leaving each read.

pub mod direction;
pub mod error;
pub mod orientation;

pub use self::direction::*;
pub use self::error::*;
pub use self::orientation::*;

use std::ops::Range;

use bstr::{BStr, BString, ByteSlice};
use fnv::FnvHashMap;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Stable handle to a vertex; an index into the graph's vertex arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct VertexId(pub usize);

/// Stable handle to an edge; an index into the graph's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct EdgeId(pub usize);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A half-open interval `[start, end)` on a read of length `seq_len`,
/// describing the part of the read covered by an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeqCoord {
    pub start: usize,
    pub end: usize,
    pub seq_len: usize,
}

#[allow(clippy::len_without_is_empty)]
impl SeqCoord {
    pub fn new(start: usize, end: usize, seq_len: usize) -> Self {
        SeqCoord {
            start,
            end,
            seq_len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_left_extreme(&self) -> bool {
        self.start == 0
    }

    #[inline]
    pub fn is_right_extreme(&self) -> bool {
        self.end == self.seq_len
    }

    #[inline]
    pub fn is_extreme(&self) -> bool {
        self.is_left_extreme() || self.is_right_extreme()
    }

    /// The overlap covers the entire read
    #[inline]
    pub fn is_containment(&self) -> bool {
        self.is_left_extreme() && self.is_right_extreme()
    }

    /// The direction of the edge that leaves the read through this
    /// interval
    #[inline]
    pub fn dir(&self) -> EdgeDir {
        if self.is_right_extreme() && !self.is_left_extreme() {
            EdgeDir::Sense
        } else {
            EdgeDir::Antisense
        }
    }
}

/// An overlap between two reads, given as the matching interval on
/// each of them. Inserted into a graph with `StringGraph::add_overlap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub a: VertexId,
    pub b: VertexId,
    pub coord_a: Range<usize>,
    pub coord_b: Range<usize>,
    pub comp: EdgeComp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    id: VertexId,
    name: BString,
    seq_len: usize,
    edges: [Vec<EdgeId>; 2],
}

impl Vertex {
    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &BStr {
        self.name.as_bstr()
    }

    #[inline]
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    #[inline]
    pub fn edges(&self, dir: EdgeDir) -> &[EdgeId] {
        &self.edges[dir.index()]
    }

    #[inline]
    pub fn degree(&self, dir: EdgeDir) -> usize {
        self.edges[dir.index()].len()
    }
}

/// A directed overlap from `start` to `end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    start: VertexId,
    end: VertexId,
    dir: EdgeDir,
    comp: EdgeComp,
    coord: SeqCoord,
    twin: EdgeId,
    containment: bool,
    extension: usize,
}

impl Edge {
    #[inline]
    pub fn start(&self) -> VertexId {
        self.start
    }

    #[inline]
    pub fn end(&self) -> VertexId {
        self.end
    }

    #[inline]
    pub fn dir(&self) -> EdgeDir {
        self.dir
    }

    #[inline]
    pub fn comp(&self) -> EdgeComp {
        self.comp
    }

    /// The overlap interval on the start vertex
    #[inline]
    pub fn coord(&self) -> SeqCoord {
        self.coord
    }

    #[inline]
    pub fn twin(&self) -> EdgeId {
        self.twin
    }

    #[inline]
    pub fn is_containment(&self) -> bool {
        self.containment
    }

    /// Length of the end read that lies past the overlap
    #[inline]
    pub fn extension_len(&self) -> usize {
        self.extension
    }

    /// Direction to continue in from the end vertex
    #[inline]
    pub fn transitive_dir(&self) -> EdgeDir {
        match self.comp {
            EdgeComp::Same => self.dir,
            EdgeComp::Reverse => !self.dir,
        }
    }

    /// Direction of the twin edge, as seen from the end vertex
    #[inline]
    pub fn twin_dir(&self) -> EdgeDir {
        match self.comp {
            EdgeComp::Same => !self.dir,
            EdgeComp::Reverse => self.dir,
        }
    }
}

/// Bidirected graph of reads and their overlaps. Vertices and edges
/// are only ever added; handles stay valid for the lifetime of the
/// graph.
#[derive(Debug, Default, Clone)]
pub struct StringGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    names: FnvHashMap<BString, VertexId>,
}

impl StringGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_vertex<N: AsRef<[u8]>>(
        &mut self,
        name: N,
        seq_len: usize,
    ) -> GraphResult<VertexId> {
        let name = BString::from(name.as_ref());
        if seq_len == 0 {
            return Err(GraphError::EmptySequence(name));
        }
        if self.names.contains_key(&name) {
            return Err(GraphError::DuplicateVertex(name));
        }

        let id = VertexId(self.vertices.len());
        self.names.insert(name.clone(), id);
        self.vertices.push(Vertex {
            id,
            name,
            seq_len,
            edges: [Vec::new(), Vec::new()],
        });
        Ok(id)
    }

    fn make_coord(
        &self,
        id: VertexId,
        range: &Range<usize>,
    ) -> GraphResult<SeqCoord> {
        let seq_len = self.get_vertex(id)?.seq_len;
        if range.start > range.end || range.end > seq_len {
            return Err(GraphError::CoordOutOfBounds(id, range.end, seq_len));
        }
        Ok(SeqCoord::new(range.start, range.end, seq_len))
    }

    /// Insert an overlap as an edge from `a` to `b` and its twin from
    /// `b` to `a`. Returns the two edge handles in that order.
    pub fn add_overlap(
        &mut self,
        overlap: Overlap,
    ) -> GraphResult<(EdgeId, EdgeId)> {
        let Overlap {
            a,
            b,
            coord_a,
            coord_b,
            comp,
        } = overlap;

        let coord_a = self.make_coord(a, &coord_a)?;
        let coord_b = self.make_coord(b, &coord_b)?;

        let containment = coord_a.is_containment() || coord_b.is_containment();
        let (dir_a, dir_b) = (coord_a.dir(), coord_b.dir());

        if !containment {
            if !coord_a.is_extreme() {
                return Err(GraphError::NotExtreme(a));
            }
            if !coord_b.is_extreme() {
                return Err(GraphError::NotExtreme(b));
            }
            let consistent = match comp {
                EdgeComp::Same => dir_a != dir_b,
                EdgeComp::Reverse => dir_a == dir_b,
            };
            if !consistent {
                return Err(GraphError::InconsistentOverlap(a, b));
            }
        }

        let ab = EdgeId(self.edges.len());
        let ba = EdgeId(ab.0 + 1);

        self.edges.push(Edge {
            start: a,
            end: b,
            dir: dir_a,
            comp,
            coord: coord_a,
            twin: ba,
            containment,
            extension: coord_b.seq_len - coord_b.len(),
        });
        self.edges.push(Edge {
            start: b,
            end: a,
            dir: dir_b,
            comp,
            coord: coord_b,
            twin: ab,
            containment,
            extension: coord_a.seq_len - coord_a.len(),
        });

        self.vertices[a.0].edges[dir_a.index()].push(ab);
        self.vertices[b.0].edges[dir_b.index()].push(ba);

        Ok((ab, ba))
    }

    /// Insert a dovetail overlap as described by a GFA link line: the
    /// last `overlap_from` bases of `from` (in its given orientation)
    /// match the first `overlap_to` bases of `to`.
    pub fn add_link(
        &mut self,
        from: VertexId,
        from_orient: Orientation,
        to: VertexId,
        to_orient: Orientation,
        overlap_from: usize,
        overlap_to: usize,
    ) -> GraphResult<(EdgeId, EdgeId)> {
        let len_a = self.get_vertex(from)?.seq_len;
        let len_b = self.get_vertex(to)?.seq_len;
        if overlap_from > len_a {
            return Err(GraphError::CoordOutOfBounds(from, overlap_from, len_a));
        }
        if overlap_to > len_b {
            return Err(GraphError::CoordOutOfBounds(to, overlap_to, len_b));
        }

        let coord_a = match from_orient {
            Orientation::Forward => len_a - overlap_from..len_a,
            Orientation::Backward => 0..overlap_from,
        };
        let coord_b = match to_orient {
            Orientation::Forward => 0..overlap_to,
            Orientation::Backward => len_b - overlap_to..len_b,
        };

        self.add_overlap(Overlap {
            a: from,
            b: to,
            coord_a,
            coord_b,
            comp: from_orient.comp_with(to_orient),
        })
    }

    /// Insert a containment as described by a GFA containment line;
    /// the resulting edges are flagged as containment edges.
    pub fn add_containment(
        &mut self,
        container: VertexId,
        container_orient: Orientation,
        contained: VertexId,
        contained_orient: Orientation,
        pos: usize,
        overlap_len: usize,
    ) -> GraphResult<(EdgeId, EdgeId)> {
        let contained_len = self.get_vertex(contained)?.seq_len;
        self.add_overlap(Overlap {
            a: container,
            b: contained,
            coord_a: pos..pos + overlap_len,
            coord_b: 0..contained_len,
            comp: container_orient.comp_with(contained_orient),
        })
    }

    pub fn get_vertex(&self, id: VertexId) -> GraphResult<&Vertex> {
        self.vertices
            .get(id.0)
            .ok_or(GraphError::UnknownVertex(id))
    }

    /// Panics if `id` doesn't belong to this graph
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Panics if `id` doesn't belong to this graph
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn edges(&self, id: VertexId, dir: EdgeDir) -> &[EdgeId] {
        self.vertex(id).edges(dir)
    }

    /// Edges leaving `id` in either direction, sense edges first
    pub fn all_edges(&self, id: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let vertex = self.vertex(id);
        EdgeDir::BOTH
            .iter()
            .flat_map(move |dir| vertex.edges(*dir).iter().copied())
    }

    pub fn vertex_id<N: AsRef<[u8]>>(&self, name: N) -> Option<VertexId> {
        self.names.get(&BString::from(name.as_ref())).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn has_containments(&self) -> bool {
        self.edges.iter().any(|e| e.containment)
    }
}
