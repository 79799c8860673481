use crate::math::{Point, Real};

/// Distance from `pt` to the line through `a` and `b`.
///
/// Computed as twice the area of the triangle `(a, b, pt)` divided by the length of `ab`.
/// Falls back to the distance to `a` when `a` and `b` coincide.
pub fn perpendicular_distance(pt: &Point<Real>, a: &Point<Real>, b: &Point<Real>) -> Real {
    let chord = b - a;
    let chord_len = chord.norm();

    if chord_len == 0.0 {
        (pt - a).norm()
    } else {
        chord.perp(&(pt - a)).abs() / chord_len
    }
}

/// Ramer-Douglas-Peucker reduction of `points`.
///
/// The loop is handled as an open polyline from its first to its last point; both are
/// always kept. A point in between survives only if it is the farthest one from the chord
/// of its sub-range and lies strictly farther than `tolerance` from it. Ties go to the
/// earliest point.
///
/// A non-positive `tolerance`, or fewer than three points, returns the input unchanged.
pub fn douglas_peucker(points: &[Point<Real>], tolerance: Real) -> Vec<Point<Real>> {
    if tolerance <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut ranges = vec![(0, points.len() - 1)];

    while let Some((first, last)) = ranges.pop() {
        let mut max_dist = 0.0;
        let mut farthest = first;

        for i in first + 1..last {
            let dist = perpendicular_distance(&points[i], &points[first], &points[last]);
            if dist > max_dist {
                max_dist = dist;
                farthest = i;
            }
        }

        if max_dist > tolerance {
            keep[farthest] = true;
            ranges.push((farthest, last));
            ranges.push((first, farthest));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(pt, keep)| keep.then_some(*pt))
        .collect()
}
