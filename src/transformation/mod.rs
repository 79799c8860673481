//! Tracing, simplification, triangulation and convex decomposition of mask boundaries.

pub use self::boundary_trace::{trace_boundary, BoundaryTraceError, BoundaryTracer, TracedBoundary};
pub use self::constrained_delaunay::{triangulate, triangulate_polygon, TriangulationError};
pub use self::convex_merge::{merge_convex, merge_convex_idx, ConvexMergeError};
pub use self::simplify::{dedup_loop, simplify, Simplifier, UnknownSimplifier};

pub mod boundary_trace;
pub mod constrained_delaunay;
mod convex_merge;
pub mod simplify;
