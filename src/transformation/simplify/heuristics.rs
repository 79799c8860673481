use crate::math::{Point, Real, Vector};

/// How far `pt` bends away from the straight path between its neighbors.
///
/// This is the squared distance between `pt` and the midpoint of `prev` and `next`.
#[inline]
pub fn curvature(prev: &Point<Real>, pt: &Point<Real>, next: &Point<Real>) -> Real {
    (na::center(prev, next) - pt).norm_squared()
}

/// Keeps the first point, then every point at which the curvature accumulated since the
/// last kept point exceeds `limit`.
///
/// Curvature is measured with wrap-around neighbors since the loop is closed. Points on a
/// perfectly straight run never accumulate anything, so they are always dropped.
pub fn accumulate_curvature(points: &[Point<Real>], limit: Real) -> Vec<Point<Real>> {
    select_by_curvature(points, limit, |_| false)
}

/// Like [`accumulate_curvature`], but also keeps every corner turning by 90 degrees or more.
pub fn preserve_corners(points: &[Point<Real>], limit: Real) -> Vec<Point<Real>> {
    select_by_curvature(points, limit, |[prev, pt, next]| {
        let incoming: Vector<Real> = pt - prev;
        let outgoing: Vector<Real> = next - pt;
        incoming.dot(&outgoing) <= 0.0
    })
}

/// Replaces every point by the mean of the `window` points starting at it, then applies
/// [`accumulate_curvature`].
///
/// Consecutive averages that are almost equal are merged. A `window` larger than the loop
/// is clamped to the loop size.
pub fn window_average(points: &[Point<Real>], window: usize, limit: Real) -> Vec<Point<Real>> {
    if points.len() < 3 || window <= 1 {
        return accumulate_curvature(points, limit);
    }

    let window = window.min(points.len());
    let mut averaged: Vec<Point<Real>> = Vec::with_capacity(points.len());

    for i in 0..points.len() {
        let sum: Vector<Real> = (i..i + window)
            .map(|j| points[j % points.len()].coords)
            .sum();
        let avg = Point::from(sum / window as Real);

        if averaged.last().map_or(true, |last| !relative_eq!(*last, avg)) {
            averaged.push(avg);
        }
    }

    if averaged.len() > 1 && relative_eq!(averaged[0], averaged[averaged.len() - 1]) {
        let _ = averaged.pop();
    }

    accumulate_curvature(&averaged, limit)
}

fn select_by_curvature(
    points: &[Point<Real>],
    limit: Real,
    mut always_keep: impl FnMut([&Point<Real>; 3]) -> bool,
) -> Vec<Point<Real>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let mut result = vec![points[0]];
    let mut total = 0.0;

    for i in 1..n {
        let neighborhood = [&points[i - 1], &points[i], &points[(i + 1) % n]];
        total += curvature(neighborhood[0], neighborhood[1], neighborhood[2]);

        if total > limit || always_keep(neighborhood) {
            result.push(points[i]);
            total = 0.0;
        }
    }

    result
}
