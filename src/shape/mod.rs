//! Shapes produced by the decomposition.

pub use self::convex_polygon::ConvexPolygon;

mod convex_polygon;
