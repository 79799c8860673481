/// Errors raised by the constrained Delaunay triangulation.
///
/// All variants except [`TriangulationError::InvariantViolation`] describe bad input and
/// are detected before the sweep starts. An invariant violation means the sweep lost
/// track of its own topology: it is a bug in the kernel (or a numerically hopeless
/// input) and the partial mesh must be discarded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    /// Less than three distinct vertices were given.
    #[error("at least 3 distinct vertices are needed, got {0}")]
    InsufficientVertices(usize),

    /// Two input vertices share the same coordinates.
    ///
    /// The sweep identifies vertices by position, so every vertex must be unique.
    #[error("vertices {0} and {1} are duplicates")]
    DuplicateVertex(u32, u32),

    /// The vertex at this index has a NaN or infinite coordinate.
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(u32),

    /// All the vertices lie on a single line.
    #[error("all the vertices are collinear")]
    CollinearVertices,

    /// A constraint edge has coincident endpoints, references a missing vertex, or belongs
    /// to a hole lying outside of the outer loop.
    #[error("constraint edge ({0}, {1}) is degenerate or out of bounds")]
    MalformedConstraint(u32, u32),

    /// An expected neighbor, triangle or front node could not be found.
    #[error("triangulation invariant violated: {0}")]
    InvariantViolation(&'static str),
}
