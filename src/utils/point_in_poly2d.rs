use crate::math::{Point, Real};
use num::Zero;

/// Tests if `pt` lies inside the convex loop `poly`, whatever its winding.
///
/// Points on the boundary are considered inside.
pub fn point_in_convex_poly2d(pt: &Point<Real>, poly: &[Point<Real>]) -> bool {
    let mut reference_side = Real::zero();

    for (i, a) in poly.iter().enumerate() {
        let b = &poly[(i + 1) % poly.len()];
        let side = (b - a).perp(&(pt - a));

        if reference_side.is_zero() {
            reference_side = side;
        } else if side * reference_side < 0.0 {
            return false;
        }
    }

    !poly.is_empty()
}

/// Tests if `pt` lies inside the closed loop `poly` using the even-odd rule.
///
/// The loop may be concave and have any orientation. The result for points lying exactly
/// on an edge is unspecified.
pub fn point_in_poly2d(pt: &Point<Real>, poly: &[Point<Real>]) -> bool {
    let mut inside = false;

    for (i, a) in poly.iter().enumerate() {
        let b = &poly[(i + 1) % poly.len()];

        // Half-open crossing rule so that a vertex lying on the ray is counted once.
        if (a.y > pt.y) != (b.y > pt.y) {
            let t = (pt.y - a.y) / (b.y - a.y);
            let x_cross = a.x + t * (b.x - a.x);

            if pt.x < x_cross {
                inside = !inside;
            }
        }
    }

    inside
}
