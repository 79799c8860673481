//! The complete decomposition of an opacity mask into convex polygons.
//!
//! Every invocation owns all of its state, so independent masks may be decomposed
//! concurrently. The stages run one after the other and a [`CancellationToken`] is checked
//! between them.

pub use self::error::{DecompositionError, Stage};
pub use self::parameters::{DecompositionParameters, ParametersError};
#[cfg(feature = "parallel")]
pub use self::task::decompose_batch;
pub use self::task::{CancellationToken, DecompositionTask};

use crate::mask::{OpacityMask, Supersampled};
use crate::math::{Pixel, Point, Real};
use crate::shape::ConvexPolygon;
use crate::transformation::{
    dedup_loop, merge_convex, simplify, triangulate_polygon, BoundaryTracer, TracedBoundary,
};
use crate::utils::{point_in_poly2d, segments_intersect2d};
use hashbrown::HashSet;
use ordered_float::OrderedFloat;

mod error;
mod parameters;
mod task;

/// Decomposes the opaque region of `mask` into convex polygons.
///
/// The polygons are expressed in pixel coordinates of `mask` and have at most
/// `params.max_polygon_vertices` vertices each.
pub fn decompose<M: OpacityMask>(
    mask: &M,
    params: &DecompositionParameters,
) -> Result<Vec<ConvexPolygon>, DecompositionError> {
    decompose_with_cancellation(mask, params, &CancellationToken::new())
}

/// Same as [`decompose`], but gives up with [`DecompositionError::Cancelled`] at the first
/// stage boundary reached after `token` is cancelled.
pub fn decompose_with_cancellation<M: OpacityMask>(
    mask: &M,
    params: &DecompositionParameters,
    token: &CancellationToken,
) -> Result<Vec<ConvexPolygon>, DecompositionError> {
    params.validate()?;

    token.check(Stage::Trace)?;
    let traced = if params.supersample {
        trace(&Supersampled::new(mask), params)?
    } else {
        trace(mask, params)?
    };

    let (outer, holes) = simplify_loops(&traced, params, token)?;
    let holes = retain_valid_holes(&outer, holes);

    token.check(Stage::Triangulate)?;
    let (vertices, triangles) = triangulate_polygon(&outer, &holes)?;

    token.check(Stage::Merge)?;
    let mut polygons = merge_convex(&vertices, &triangles, params.max_polygon_vertices)?;

    if params.supersample {
        polygons = polygons
            .iter()
            .map(|poly| poly.scaled(0.5))
            .collect::<Option<_>>()
            .ok_or_else(|| DecompositionError::TriangulationInvariant {
                stage: Stage::Merge,
                message: "supersampled polygon could not be scaled back".to_string(),
            })?;
    }

    log::debug!(
        "decomposed {}x{} mask into {} polygons ({} triangles)",
        mask.width(),
        mask.height(),
        polygons.len(),
        triangles.len()
    );

    Ok(polygons)
}

type Loop = Vec<Point<Real>>;

fn trace<M: OpacityMask>(
    mask: &M,
    params: &DecompositionParameters,
) -> Result<TracedBoundary, DecompositionError> {
    let traced = BoundaryTracer::new(mask)
        .pixel_corners(params.pixel_perfect)
        .trace(params.detect_holes)?;
    Ok(traced)
}

fn simplify_loops(
    traced: &TracedBoundary,
    params: &DecompositionParameters,
    token: &CancellationToken,
) -> Result<(Loop, Vec<Loop>), DecompositionError> {
    let outer = simplify_loop(&traced.outer, params, token)?;
    let holes = traced
        .holes
        .iter()
        .map(|hole| simplify_loop(hole, params, token))
        .collect::<Result<_, _>>()?;
    Ok((outer, holes))
}

fn simplify_loop(
    pixels: &[Pixel],
    params: &DecompositionParameters,
    token: &CancellationToken,
) -> Result<Loop, DecompositionError> {
    token.check(Stage::Simplify)?;

    let mut points: Loop = pixels
        .iter()
        .map(|p| Point::new(p.x as Real, p.y as Real))
        .collect();
    // Pixel corners may repeat.
    dedup_loop(&mut points);

    let mut simplified = simplify(
        &points,
        params.simplifier,
        params.tolerance,
        params.average_window,
    );
    dedup_loop(&mut simplified);

    log::debug!(
        "simplified loop with {}: {} -> {} points",
        params.simplifier,
        points.len(),
        simplified.len()
    );

    if simplified.len() < 3 {
        return Err(DecompositionError::InsufficientVertices {
            stage: Stage::Simplify,
            count: simplified.len(),
        });
    }

    Ok(simplified)
}

/// Drops the holes the triangulation cannot accept along with the outer loop.
///
/// A hole is dropped if it shares a vertex with a loop kept before it, if it is not fully
/// inside the outer loop, if its edges touch the edges of another kept loop, or if it lies
/// inside another hole.
fn retain_valid_holes(outer: &[Point<Real>], holes: Vec<Loop>) -> Vec<Loop> {
    let key = |pt: &Point<Real>| [OrderedFloat(pt.x), OrderedFloat(pt.y)];
    let mut used: HashSet<_> = outer.iter().map(key).collect();
    let mut kept: Vec<Loop> = Vec::with_capacity(holes.len());

    for (i, hole) in holes.into_iter().enumerate() {
        let reason = if hole.iter().any(|pt| used.contains(&key(pt))) {
            Some("it shares a vertex with another loop")
        } else if !hole.iter().all(|pt| point_in_poly2d(pt, outer)) {
            Some("it is not inside the outer loop")
        } else if loops_touch(&hole, outer) || kept.iter().any(|other| loops_touch(&hole, other)) {
            Some("it touches another loop")
        } else if kept.iter().any(|other| point_in_poly2d(&hole[0], other)) {
            Some("it lies inside another hole")
        } else {
            None
        };

        if let Some(reason) = reason {
            log::warn!("dropping hole {i} ({} points): {reason}", hole.len());
            continue;
        }

        // Keep the outermost of two nested holes.
        kept.retain(|other| {
            let nested = point_in_poly2d(&other[0], &hole);
            if nested {
                log::warn!(
                    "dropping a hole ({} points): it lies inside another hole",
                    other.len()
                );
            }
            !nested
        });

        used.extend(hole.iter().map(key));
        kept.push(hole);
    }

    kept
}

fn loops_touch(a: &[Point<Real>], b: &[Point<Real>]) -> bool {
    let edges = |poly: &[Point<Real>]| {
        (0..poly.len())
            .map(|i| (poly[i], poly[(i + 1) % poly.len()]))
            .collect::<Vec<_>>()
    };
    let edges_b = edges(b);

    edges(a).iter().any(|(p, q)| {
        edges_b
            .iter()
            .any(|(r, s)| segments_intersect2d(p, q, r, s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::BitMask;

    fn square(min: Real, max: Real) -> Loop {
        vec![
            Point::new(min, min),
            Point::new(max, min),
            Point::new(max, max),
            Point::new(min, max),
        ]
    }

    #[test]
    fn invalid_holes_are_dropped() {
        let outer = square(0.0, 10.0);
        let holes = vec![
            square(2.0, 4.0),
            // Shares the vertex (4, 4) with the first hole.
            square(4.0, 6.0),
            // Pokes out of the outer loop.
            square(8.0, 12.0),
            // Nested in the last hole.
            square(6.5, 7.0),
            square(6.0, 8.0),
        ];

        let kept = retain_valid_holes(&outer, holes);
        assert_eq!(kept, vec![square(2.0, 4.0), square(6.0, 8.0)]);
    }

    #[test]
    fn decompose_rectangle_with_hole() {
        let mask = BitMask::from_ascii(
            "
            ##########
            ##########
            ###....###
            ###....###
            ###....###
            ##########
            ##########
            ",
        );
        let params = DecompositionParameters {
            max_polygon_vertices: 6,
            ..DecompositionParameters::default()
        };

        let polygons = decompose(&mask, &params).unwrap();
        assert!(polygons.len() >= 4);
        assert!(polygons.iter().all(|poly| poly.points().len() <= 6));

        let area: Real = polygons.iter().map(|poly| poly.area()).sum();
        // The loops pass through the centers of the boundary pixels.
        assert_relative_eq!(area, 9.0 * 6.0 - 5.0 * 4.0, epsilon = 1.0e-3);
    }

    #[test]
    fn pixel_perfect_loops_cover_whole_pixels() {
        let mask = BitMask::from_ascii(
            "
            ##########
            ##########
            ###....###
            ###....###
            ###....###
            ##########
            ##########
            ",
        );
        let params = DecompositionParameters {
            pixel_perfect: true,
            ..DecompositionParameters::default()
        };

        let polygons = decompose(&mask, &params).unwrap();
        let area: Real = polygons.iter().map(|poly| poly.area()).sum();
        assert_relative_eq!(area, 10.0 * 7.0 - 4.0 * 3.0, epsilon = 1.0e-3);
        assert!(polygons
            .iter()
            .flat_map(|poly| poly.points())
            .all(|pt| pt.x >= 0.0 && pt.x <= 10.0 && pt.y >= 0.0 && pt.y <= 7.0));

        let supersampled = DecompositionParameters {
            supersample: true,
            ..params
        };
        let polygons = decompose(&mask, &supersampled).unwrap();
        let area: Real = polygons.iter().map(|poly| poly.area()).sum();
        assert_relative_eq!(area, 10.0 * 7.0 - 4.0 * 3.0, epsilon = 1.0e-3);
    }

    #[test]
    fn invalid_parameters_are_rejected_first() {
        let mask = BitMask::new(0, 0);
        let params = DecompositionParameters {
            max_polygon_vertices: 2,
            ..DecompositionParameters::default()
        };
        assert_eq!(
            decompose(&mask, &params),
            Err(DecompositionError::UnsupportedConfiguration(
                ParametersError::TooFewMaxVertices(2)
            ))
        );

        let err = decompose(&mask, &DecompositionParameters::default()).unwrap_err();
        assert_eq!(err.stage(), Stage::Trace);
    }

    #[test]
    fn cancelled_token_stops_before_tracing() {
        let mask = BitMask::from_fn(8, 8, |_, _| true);
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(
            decompose_with_cancellation(&mask, &DecompositionParameters::default(), &token),
            Err(DecompositionError::Cancelled(Stage::Trace))
        );
    }

    #[test]
    fn supersampling_keeps_the_image_scale() {
        let mask = BitMask::from_fn(6, 4, |_, _| true);
        let params = DecompositionParameters {
            supersample: true,
            ..DecompositionParameters::default()
        };

        let polygons = decompose(&mask, &params).unwrap();
        let area: Real = polygons.iter().map(|poly| poly.area()).sum();
        // The supersampled loop runs through pixel centers of the 12x8 grid.
        assert_relative_eq!(area, 11.0 * 7.0 / 4.0, epsilon = 1.0e-3);
        assert!(polygons
            .iter()
            .flat_map(|poly| poly.points())
            .all(|pt| pt.x <= 5.5 && pt.y <= 3.5));
    }
}
