use crate::math::*;

/// Computes the outward normal of the edge going from `pts[0]` to `pts[1]` on a
/// counter-clockwise polygon.
///
/// Returns `None` if both points are almost equal.
#[inline]
pub fn ccw_face_normal(pts: [&Point<Real>; 2]) -> Option<UnitVector<Real>> {
    let ab = *pts[1] - *pts[0];
    let res = Vector::new(ab[1], -ab[0]);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}
