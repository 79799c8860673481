//! Corner orientation and convexity tests.

use crate::math::{Point, Real};
use core::cmp::Ordering;

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
/// The orientation or winding direction of a corner or polygon.
pub enum Orientation {
    /// Counter-clockwise
    Ccw,
    /// Clockwise
    Cw,
    /// Neither (a straight line)
    None,
}

/// Returns the direction of a line through `p1`, `p2` and `p3`.
///
/// Counter-clockwise example:
/// o p1
///  .        o p3
///   .     .
///    .  .
///     o p2
///
/// Clockwise example:
///     o p2
///    .  .
///   .     .
///  .        o p3
/// o p1
///
/// A `NaN` coordinate yields [`Orientation::None`].
pub fn corner_direction(p1: &Point<Real>, p2: &Point<Real>, p3: &Point<Real>) -> Orientation {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let cross: Real = v1.perp(&v2);

    match cross.partial_cmp(&0.0) {
        Some(Ordering::Less) => Orientation::Ccw,
        Some(Ordering::Greater) => Orientation::Cw,
        Some(Ordering::Equal) | None => Orientation::None,
    }
}

/// Tests if the closed loop `poly` is strictly convex.
///
/// Every corner must turn in the same direction; a flat corner (180 degrees) or a
/// degenerate one makes the loop non-convex.
pub fn is_convex_loop(poly: &[Point<Real>]) -> bool {
    if poly.len() < 3 {
        return false;
    }

    let mut winding = Orientation::None;

    for i in 0..poly.len() {
        let p1 = &poly[i];
        let p2 = &poly[(i + 1) % poly.len()];
        let p3 = &poly[(i + 2) % poly.len()];

        match (corner_direction(p1, p2, p3), winding) {
            (Orientation::None, _) => return false,
            (dir, Orientation::None) => winding = dir,
            (dir, winding) if dir != winding => return false,
            _ => {}
        }
    }

    true
}
