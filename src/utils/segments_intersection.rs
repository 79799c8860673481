use crate::math::{Point, Real};
use crate::utils::{corner_direction, Orientation};

/// Tests if the closed segments `[a, b]` and `[c, d]` have at least one point in common.
///
/// Touching endpoints and overlapping collinear segments count as intersecting.
pub fn segments_intersect2d(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
) -> bool {
    let o1 = corner_direction(a, b, c);
    let o2 = corner_direction(a, b, d);
    let o3 = corner_direction(c, d, a);
    let o4 = corner_direction(c, d, b);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::None && on_segment(a, b, c))
        || (o2 == Orientation::None && on_segment(a, b, d))
        || (o3 == Orientation::None && on_segment(c, d, a))
        || (o4 == Orientation::None && on_segment(c, d, b))
}

/// Assuming `pt` is collinear with `a` and `b`, is it between them?
fn on_segment(a: &Point<Real>, b: &Point<Real>, pt: &Point<Real>) -> bool {
    pt.x >= a.x.min(b.x) && pt.x <= a.x.max(b.x) && pt.y >= a.y.min(b.y) && pt.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::segments_intersect2d;
    use crate::math::Point;

    #[test]
    fn crossing_touching_and_disjoint_segments() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 2.0);

        assert!(segments_intersect2d(
            &a,
            &b,
            &Point::new(0.0, 2.0),
            &Point::new(2.0, 0.0)
        ));
        // T junction.
        assert!(segments_intersect2d(
            &a,
            &b,
            &Point::new(1.0, 1.0),
            &Point::new(2.0, 0.0)
        ));
        // Collinear overlap.
        assert!(segments_intersect2d(
            &a,
            &b,
            &Point::new(1.0, 1.0),
            &Point::new(3.0, 3.0)
        ));
        // Collinear but apart.
        assert!(!segments_intersect2d(
            &a,
            &b,
            &Point::new(3.0, 3.0),
            &Point::new(4.0, 4.0)
        ));
        // Parallel.
        assert!(!segments_intersect2d(
            &a,
            &b,
            &Point::new(1.0, 0.0),
            &Point::new(3.0, 2.0)
        ));
        // Would cross if extended.
        assert!(!segments_intersect2d(
            &a,
            &b,
            &Point::new(3.0, 0.0),
            &Point::new(2.5, 0.5)
        ));
    }
}
