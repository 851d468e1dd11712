use std::fmt;

use crate::graph::{EdgeDir, StringGraph};

/// Vertex and edge counts of a string graph, with vertices classified
/// by how many edges they have on each side.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: usize,
    pub containment_edges: usize,
    /// No edges on either side
    pub islands: usize,
    /// Edges on exactly one side
    pub terminal: usize,
    /// A single edge on at least one side
    pub simple: usize,
    /// Branches on exactly one side
    pub monobranch: usize,
    /// Branches on both sides
    pub dibranch: usize,
}

impl GraphStats {
    pub fn compute(graph: &StringGraph) -> Self {
        let mut stats = GraphStats {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            ..Default::default()
        };

        stats.containment_edges = graph
            .edge_ids()
            .filter(|&e| graph.edge(e).is_containment())
            .count();

        for vertex in graph.vertices() {
            let sense = vertex.degree(EdgeDir::Sense);
            let antisense = vertex.degree(EdgeDir::Antisense);

            if sense == 0 && antisense == 0 {
                stats.islands += 1;
            } else if sense == 0 || antisense == 0 {
                stats.terminal += 1;
            }

            if sense > 1 && antisense > 1 {
                stats.dibranch += 1;
            } else if sense > 1 || antisense > 1 {
                stats.monobranch += 1;
            }

            if sense == 1 || antisense == 1 {
                stats.simple += 1;
            }
        }

        stats
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vertices: {} edges: {} ({} containment) islands: {} \
             terminal: {} simple: {} monobranch: {} dibranch: {}",
            self.vertices,
            self.edges,
            self.containment_edges,
            self.islands,
            self.terminal,
            self.simple,
            self.monobranch,
            self.dibranch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Orientation::Forward;

    #[test]
    fn classify_vertices() {
        let mut graph = StringGraph::new();
        let ids: Vec<_> = ["a", "b", "c", "d", "lone"]
            .iter()
            .map(|n| graph.add_vertex(n, 100).unwrap())
            .collect();
        for &(x, y) in &[(0, 1), (0, 2), (1, 3), (2, 3)] {
            graph
                .add_link(ids[x], Forward, ids[y], Forward, 50, 50)
                .unwrap();
        }

        let stats = GraphStats::compute(&graph);
        assert_eq!(5, stats.vertices);
        assert_eq!(8, stats.edges);
        assert_eq!(0, stats.containment_edges);
        assert_eq!(1, stats.islands);
        // a and d
        assert_eq!(2, stats.terminal);
        assert_eq!(2, stats.monobranch);
        assert_eq!(0, stats.dibranch);
        // b and c
        assert_eq!(2, stats.simple);

        let shown = stats.to_string();
        assert!(shown.starts_with("vertices: 5 edges: 8"));
    }
}
