//! Geometric predicates of the sweep, always evaluated in double precision.

use crate::utils::Orientation;
use na::Point2;

/// Half-width of the band inside which three points are considered collinear.
pub const EPSILON: f64 = 1.0e-12;

/// The orientation of the triangle `a`, `b`, `c`.
///
/// Cross products whose magnitude is below [`EPSILON`] are reported as
/// [`Orientation::None`].
pub fn orient2d(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Orientation {
    let det = (a.x - c.x) * (b.y - c.y) - (a.y - c.y) * (b.x - c.x);

    if det > -EPSILON && det < EPSILON {
        Orientation::None
    } else if det > 0.0 {
        Orientation::Ccw
    } else {
        Orientation::Cw
    }
}

/// Tests if `d` lies strictly inside the circumcircle of the triangle `a`, `b`, `c`.
///
/// `a`, `b`, `c` must be counter-clockwise. The test gives up early, answering `false`,
/// when `d` does not see the edges `ab` and `ca` from the interior side, which is
/// always the case for a legal flip candidate.
pub fn in_circle(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let ad = a - d;
    let bd = b - d;

    let abd = ad.x * bd.y - bd.x * ad.y;
    if abd <= 0.0 {
        return false;
    }

    let cd = c - d;
    let cad = cd.x * ad.y - ad.x * cd.y;
    if cad <= 0.0 {
        return false;
    }

    let a_lift = ad.norm_squared();
    let b_lift = bd.norm_squared();
    let c_lift = cd.norm_squared();

    a_lift * (bd.x * cd.y - cd.x * bd.y) + b_lift * cad + c_lift * abd > 0.0
}

/// Tests if `d` lies inside the wedge swept from `a` between `b` and `c`.
///
/// This is the admissibility test of an edge flip: the quadrilateral `a`, `b`, `d`, `c`
/// must be strictly convex at `b` and `c`.
pub fn in_scan_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let ad = a - d;
    let bd = b - d;

    if ad.x * bd.y - bd.x * ad.y <= 0.0 {
        return false;
    }

    let cd = c - d;
    cd.x * ad.y - ad.x * cd.y > 0.0
}
