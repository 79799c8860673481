use super::ParametersError;
use crate::transformation::{BoundaryTraceError, ConvexMergeError, TriangulationError};
use core::fmt;

/// A step of the decomposition pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Stage {
    /// Validation of the parameters.
    Configuration,
    /// Tracing of the mask boundary.
    Trace,
    /// Simplification of the traced loops.
    Simplify,
    /// Constrained triangulation of the simplified loops.
    Triangulate,
    /// Merging of the triangles into convex polygons.
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Configuration => "configuration",
            Stage::Trace => "trace",
            Stage::Simplify => "simplify",
            Stage::Triangulate => "triangulate",
            Stage::Merge => "merge",
        })
    }
}

/// Errors raised by the decomposition of a mask.
///
/// A failed decomposition never yields any polygon.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecompositionError {
    /// The parameters are invalid.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(#[from] ParametersError),
    /// The opaque region cannot be outlined by simple loops.
    #[error("degenerate boundary: {0}")]
    DegenerateBoundary(#[from] BoundaryTraceError),
    /// A loop has fewer than three distinct vertices.
    #[error("{stage} stage: a loop has {count} distinct vertices, at least 3 are needed")]
    InsufficientVertices {
        /// The stage that rejected the loop.
        stage: Stage,
        /// The number of distinct vertices of the loop.
        count: usize,
    },
    /// The simplified loops cannot be used as triangulation constraints.
    #[error("malformed constraint: {0}")]
    MalformedConstraint(TriangulationError),
    /// An internal invariant of the triangulation or of the merge was violated.
    ///
    /// This is a bug rather than an input problem.
    #[error("{stage} stage: invariant violated: {message}")]
    TriangulationInvariant {
        /// The stage that detected the violation.
        stage: Stage,
        /// What went wrong.
        message: String,
    },
    /// The decomposition was cancelled before the given stage.
    #[error("cancelled before the {0} stage")]
    Cancelled(Stage),
}

impl DecompositionError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            DecompositionError::UnsupportedConfiguration(_) => Stage::Configuration,
            DecompositionError::DegenerateBoundary(_) => Stage::Trace,
            DecompositionError::MalformedConstraint(_) => Stage::Triangulate,
            DecompositionError::InsufficientVertices { stage, .. }
            | DecompositionError::TriangulationInvariant { stage, .. }
            | DecompositionError::Cancelled(stage) => *stage,
        }
    }

    /// Whether the failure is caused by the input rather than by a bug.
    ///
    /// Callers processing several masks typically skip the ones failing with a recoverable
    /// error, and report the others.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DecompositionError::TriangulationInvariant { .. })
    }
}

impl From<TriangulationError> for DecompositionError {
    fn from(err: TriangulationError) -> Self {
        match err {
            TriangulationError::InsufficientVertices(count) => {
                DecompositionError::InsufficientVertices {
                    stage: Stage::Triangulate,
                    count,
                }
            }
            TriangulationError::InvariantViolation(message) => {
                DecompositionError::TriangulationInvariant {
                    stage: Stage::Triangulate,
                    message: message.to_string(),
                }
            }
            err => DecompositionError::MalformedConstraint(err),
        }
    }
}

impl From<ConvexMergeError> for DecompositionError {
    fn from(err: ConvexMergeError) -> Self {
        match err {
            ConvexMergeError::VertexLimitTooLow(n) => {
                DecompositionError::UnsupportedConfiguration(ParametersError::TooFewMaxVertices(n))
            }
            err => DecompositionError::TriangulationInvariant {
                stage: Stage::Merge,
                message: err.to_string(),
            },
        }
    }
}
