use std::{error, fmt};

use bstr::BString;

use super::VertexId;

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building a string graph. The search core never
/// produces these; a graph that was built successfully satisfies the
/// geometry the searches rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A vertex with this name was already inserted
    DuplicateVertex(BString),
    /// Reads must have a positive length
    EmptySequence(BString),
    /// A vertex handle that doesn't belong to this graph
    UnknownVertex(VertexId),
    /// An overlap region extends past the end of its read. Includes
    /// the read, the offending end coordinate and the read length.
    CoordOutOfBounds(VertexId, usize, usize),
    /// An overlap region touches neither end of its read
    NotExtreme(VertexId),
    /// The directions implied by the two overlap regions disagree
    /// with the orientation of the overlap
    InconsistentOverlap(VertexId, VertexId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GraphError as GE;
        match self {
            GE::DuplicateVertex(name) => {
                write!(f, "Vertex `{}` was inserted twice", name)
            }
            GE::EmptySequence(name) => {
                write!(f, "Vertex `{}` has an empty sequence", name)
            }
            GE::UnknownVertex(id) => write!(f, "Unknown vertex {}", id),
            GE::CoordOutOfBounds(id, end, len) => write!(
                f,
                "Overlap on vertex {} ends at {}, past its length {}",
                id, end, len
            ),
            GE::NotExtreme(id) => write!(
                f,
                "Overlap on vertex {} doesn't reach either end of the read",
                id
            ),
            GE::InconsistentOverlap(a, b) => write!(
                f,
                "Overlap between vertices {} and {} has inconsistent directions",
                a, b
            ),
        }
    }
}

impl error::Error for GraphError {}
