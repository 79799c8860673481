//! Sweep-line constrained Delaunay triangulation.
//!
//! The vertices are swept by increasing `y`. Each new vertex is attached to an
//! x-ordered advancing front, the Delaunay property is restored by flipping edges, and
//! every constraint edge ending at the vertex is then forced into the mesh. Once all the
//! vertices are swept, the triangles enclosed by the constraints are collected by a
//! flood-fill that never crosses a constraint, which removes both the outside of the
//! polygon and its holes.

pub use self::error::TriangulationError;
pub use self::predicates::{in_circle, in_scan_area, orient2d, EPSILON};

use self::sweep::Sweep;
use crate::math::{Point, Real};
use crate::utils::{point_in_poly2d, Orientation};
use na::Point2;
use ordered_float::OrderedFloat;

mod advancing_front;
mod error;
mod predicates;
mod sweep;
mod triangle;

/// An edge that must appear in the triangulation.
///
/// The endpoints are stored sorted by sweep order: the upper endpoint has the greater
/// `y`, or the greater `x` if both share the same `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConstraintEdge {
    lower: u32,
    upper: u32,
}

impl ConstraintEdge {
    /// The constraint between the vertices `a` and `b` of `vertices`.
    ///
    /// Fails if the endpoints are the same point or if one of them is out of bounds.
    pub fn new(a: u32, b: u32, vertices: &[Point2<f64>]) -> Result<Self, TriangulationError> {
        match (vertices.get(a as usize), vertices.get(b as usize)) {
            (Some(pa), Some(pb)) if pa != pb => {
                let a_is_upper = pa.y > pb.y || (pa.y == pb.y && pa.x > pb.x);
                Ok(if a_is_upper {
                    Self { lower: b, upper: a }
                } else {
                    Self { lower: a, upper: b }
                })
            }
            _ => Err(TriangulationError::MalformedConstraint(a, b)),
        }
    }

    /// The endpoint visited first by the sweep.
    pub fn lower(&self) -> u32 {
        self.lower
    }

    /// The endpoint visited last by the sweep, which owns the edge.
    pub fn upper(&self) -> u32 {
        self.upper
    }
}

/// Triangulates the region of the plane enclosed by the constraint `edges`.
///
/// The returned triangles are counter-clockwise and index `vertices`. The constraints must
/// form closed, non-intersecting loops and every vertex should be an endpoint of a
/// constraint; the region enclosed by an even number of loops (the holes) is excluded.
///
/// The sweep always runs in double precision.
pub fn triangulate(
    vertices: &[Point2<f64>],
    edges: &[[u32; 2]],
) -> Result<Vec<[u32; 3]>, TriangulationError> {
    let order = sweep_order(vertices)?;
    let constraints = edges
        .iter()
        .map(|[a, b]| ConstraintEdge::new(*a, *b, vertices))
        .collect::<Result<Vec<_>, _>>()?;

    let result = Sweep::new(vertices, &constraints, order).run();

    match &result {
        Ok(triangles) => log::debug!(
            "triangulated {} vertices and {} constraints into {} triangles",
            vertices.len(),
            constraints.len(),
            triangles.len()
        ),
        Err(err @ TriangulationError::InvariantViolation(_)) => {
            log::error!("{err} ({} vertices)", vertices.len())
        }
        Err(_) => {}
    }

    result
}

/// Triangulates a polygon given by its outer loop and the loops of its holes.
///
/// Every loop is closed implicitly and may have any orientation. Returns the vertex buffer
/// (the outer loop followed by each hole) and the counter-clockwise triangles indexing it.
///
/// A hole with a vertex outside of the outer loop is rejected with
/// [`TriangulationError::MalformedConstraint`] on the hole edge starting at that vertex.
/// Loops must not cross each other.
pub fn triangulate_polygon(
    outer: &[Point<Real>],
    holes: &[Vec<Point<Real>>],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), TriangulationError> {
    let num_vertices = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut vertices = Vec::with_capacity(num_vertices);
    let mut edges = Vec::with_capacity(num_vertices);

    for ring in core::iter::once(outer).chain(holes.iter().map(Vec::as_slice)) {
        if ring.len() < 3 {
            return Err(TriangulationError::InsufficientVertices(ring.len()));
        }

        let base = vertices.len() as u32;
        let len = ring.len() as u32;

        if base > 0 {
            if let Some(i) = ring.iter().position(|pt| !point_in_poly2d(pt, outer)) {
                let i = i as u32;
                return Err(TriangulationError::MalformedConstraint(
                    base + i,
                    base + (i + 1) % len,
                ));
            }
        }

        vertices.extend_from_slice(ring);
        edges.extend((0..len).map(|i| [base + i, base + (i + 1) % len]));
    }

    let sweep_vertices: Vec<Point2<f64>> = vertices.iter().map(|pt| pt.cast::<f64>()).collect();
    let triangles = triangulate(&sweep_vertices, &edges)?;
    Ok((vertices, triangles))
}

/// Validates the vertices and sorts them by increasing `y`, then `x`.
fn sweep_order(vertices: &[Point2<f64>]) -> Result<Vec<usize>, TriangulationError> {
    if let Some(i) = vertices
        .iter()
        .position(|pt| !pt.x.is_finite() || !pt.y.is_finite())
    {
        return Err(TriangulationError::NonFiniteVertex(i as u32));
    }

    let mut order: Vec<usize> = (0..vertices.len()).collect();
    order.sort_by_key(|i| (OrderedFloat(vertices[*i].y), OrderedFloat(vertices[*i].x)));

    let distinct = order
        .windows(2)
        .filter(|w| vertices[w[0]] != vertices[w[1]])
        .count()
        + usize::from(!order.is_empty());
    if distinct < 3 {
        return Err(TriangulationError::InsufficientVertices(distinct));
    }

    if let Some(w) = order.windows(2).find(|w| vertices[w[0]] == vertices[w[1]]) {
        let (a, b) = (w[0].min(w[1]), w[0].max(w[1]));
        return Err(TriangulationError::DuplicateVertex(a as u32, b as u32));
    }

    let first = &vertices[order[0]];
    let last = &vertices[order[order.len() - 1]];
    if vertices
        .iter()
        .all(|pt| orient2d(first, last, pt) == Orientation::None)
    {
        return Err(TriangulationError::CollinearVertices);
    }

    Ok(order)
}
