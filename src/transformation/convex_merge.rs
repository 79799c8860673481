//! Greedy merging of triangles into convex polygons with a bounded number of vertices.

use crate::math::{Point, Real};
use crate::shape::ConvexPolygon;
use crate::utils::is_convex_loop;
use hashbrown::HashMap;

/// Errors raised while merging triangles into convex polygons.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvexMergeError {
    /// The vertex limit does not even allow a triangle.
    #[error("polygons need at least 3 vertices, the limit is {0}")]
    VertexLimitTooLow(usize),
    /// The triangle at this index is flat or references a missing vertex.
    #[error("triangle {0} is degenerate or out of bounds")]
    InvalidTriangle(usize),
    /// A merged loop could not be turned into a convex polygon.
    #[error("merged polygon is not strictly convex")]
    NonConvexPolygon,
}

/// Merges the triangles `indices` of `vertices` into convex polygons.
///
/// Each output polygon has at most `max_vertices` vertices, is strictly convex and
/// counter-clockwise. The polygons exactly tile the input triangles.
pub fn merge_convex(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
    max_vertices: usize,
) -> Result<Vec<ConvexPolygon>, ConvexMergeError> {
    merge_convex_idx(vertices, indices, max_vertices)?
        .into_iter()
        .map(|poly_indices| {
            let points = poly_indices
                .into_iter()
                .map(|idx| vertices[idx as usize])
                .collect();
            ConvexPolygon::from_convex_polyline(points).ok_or(ConvexMergeError::NonConvexPolygon)
        })
        .collect()
}

/// Merges the triangles `indices` of `vertices` into convex polygons, returned as
/// counter-clockwise loops of vertex indices.
///
/// Polygons are grown one at a time. The lowest unprocessed triangle seeds a polygon, then
/// the unprocessed triangles sharing one of its edges are tried in index order; the first
/// one whose union with the polygon stays convex and within `max_vertices` is merged and
/// the search starts over. The polygon is emitted once no neighbor can be merged.
pub fn merge_convex_idx(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
    max_vertices: usize,
) -> Result<Vec<Vec<u32>>, ConvexMergeError> {
    if max_vertices < 3 {
        return Err(ConvexMergeError::VertexLimitTooLow(max_vertices));
    }

    let triangles = counter_clockwise_triangles(vertices, indices)?;

    // Directed edge -> triangle having this edge.
    let mut edge_owner = HashMap::with_capacity(triangles.len() * 3);
    for (i, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let _ = edge_owner.insert((tri[k], tri[(k + 1) % 3]), i);
        }
    }

    let mut processed = vec![false; triangles.len()];
    let mut polygons = vec![];

    for seed in 0..triangles.len() {
        if processed[seed] {
            continue;
        }

        processed[seed] = true;
        let mut polygon = triangles[seed].to_vec();

        while polygon.len() < max_vertices
            && grow_polygon(vertices, &triangles, &edge_owner, &mut processed, &mut polygon)
        {}

        polygons.push(polygon);
    }

    log::debug!(
        "merged {} triangles into {} convex polygons",
        triangles.len(),
        polygons.len()
    );

    Ok(polygons)
}

fn counter_clockwise_triangles(
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
) -> Result<Vec<[u32; 3]>, ConvexMergeError> {
    indices
        .iter()
        .enumerate()
        .map(|(i, tri)| {
            let mut points = [Point::origin(); 3];
            for (pt, idx) in points.iter_mut().zip(tri.iter()) {
                *pt = *vertices
                    .get(*idx as usize)
                    .ok_or(ConvexMergeError::InvalidTriangle(i))?;
            }

            if !is_convex_loop(&points) {
                return Err(ConvexMergeError::InvalidTriangle(i));
            }

            let [a, b, c] = points;
            if (b - a).perp(&(c - a)) > 0.0 {
                Ok(*tri)
            } else {
                Ok([tri[0], tri[2], tri[1]])
            }
        })
        .collect()
}

/// Merges one unprocessed neighbor triangle into `polygon`, if possible.
fn grow_polygon(
    vertices: &[Point<Real>],
    triangles: &[[u32; 3]],
    edge_owner: &HashMap<(u32, u32), usize>,
    processed: &mut [bool],
    polygon: &mut Vec<u32>,
) -> bool {
    // The neighbor across the polygon edge `a -> b` has the edge `b -> a`.
    let mut candidates: Vec<(usize, usize)> = (0..polygon.len())
        .filter_map(|k| {
            let a = polygon[k];
            let b = polygon[(k + 1) % polygon.len()];
            edge_owner
                .get(&(b, a))
                .filter(|t| !processed[**t])
                .map(|t| (*t, k))
        })
        .collect();
    candidates.sort_unstable();

    for (t, k) in candidates {
        let (a, b) = (polygon[k], polygon[(k + 1) % polygon.len()]);
        let Some(&apex) = triangles[t].iter().find(|v| **v != a && **v != b) else {
            continue;
        };

        // Sharing more than one edge would pinch the polygon.
        if polygon.contains(&apex) {
            continue;
        }

        let mut merged = polygon.clone();
        merged.insert(k + 1, apex);
        let points: Vec<_> = merged.iter().map(|i| vertices[*i as usize]).collect();

        if is_convex_loop(&points) {
            processed[t] = true;
            *polygon = merged;
            return true;
        }
    }

    false
}
