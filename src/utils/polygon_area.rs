use crate::math::{Point, Real};

/// The signed area of the closed polygon `poly`.
///
/// Positive for counter-clockwise loops, negative for clockwise ones.
pub fn signed_polygon_area(poly: &[Point<Real>]) -> Real {
    if poly.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        twice_area += a.coords.perp(&b.coords);
    }

    twice_area / 2.0
}

/// The unsigned area of the closed polygon `poly`.
pub fn polygon_area(poly: &[Point<Real>]) -> Real {
    signed_polygon_area(poly).abs()
}
