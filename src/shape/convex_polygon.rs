use crate::math::{Point, Real, Vector};
use crate::utils;
use na::Unit;

/// A 2D convex polygon, one piece of a decomposed sprite.
///
/// The vertices are stored in counter-clockwise order and every corner turns strictly
/// left: two consecutive edges are never collinear.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    points: Vec<Point<Real>>,
    normals: Vec<Unit<Vector<Real>>>,
}

impl ConvexPolygon {
    /// Creates a new 2D convex polygon from a set of points assumed to describe a convex polyline.
    ///
    /// Clockwise input is reversed. Returns `None` if there are fewer than three points, if
    /// two consecutive points are almost equal, or if the loop is not strictly convex.
    pub fn from_convex_polyline(mut points: Vec<Point<Real>>) -> Option<Self> {
        if !utils::is_convex_loop(&points) {
            return None;
        }

        if utils::signed_polygon_area(&points) < 0.0 {
            points.reverse();
        }

        let mut normals = Vec::with_capacity(points.len());
        for i1 in 0..points.len() {
            let i2 = (i1 + 1) % points.len();
            normals.push(utils::ccw_face_normal([&points[i1], &points[i2]])?);
        }

        Some(ConvexPolygon { points, normals })
    }

    /// The vertices of this convex polygon.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The outward normals of the edges of this convex polygon.
    ///
    /// `normals()[i]` is the normal of the edge going from `points()[i]` to the next vertex.
    #[inline]
    pub fn normals(&self) -> &[Unit<Vector<Real>>] {
        &self.normals
    }

    /// Consumes the polygon and returns its vertices.
    pub fn into_points(self) -> Vec<Point<Real>> {
        self.points
    }

    /// The area of this polygon.
    pub fn area(&self) -> Real {
        utils::signed_polygon_area(&self.points)
    }

    /// The center of mass of this polygon, assuming a uniform density.
    pub fn centroid(&self) -> Point<Real> {
        let origin = self.points[0];
        let mut weighted = Vector::zeros();
        let mut twice_area = 0.0;

        for pts in self.points[1..].windows(2) {
            let a = pts[0] - origin;
            let b = pts[1] - origin;
            let w = a.perp(&b);
            weighted += (a + b) * w;
            twice_area += w;
        }

        origin + weighted / (3.0 * twice_area)
    }

    /// Tests if `pt` lies inside this polygon or on its boundary.
    pub fn contains_local_point(&self, pt: &Point<Real>) -> bool {
        utils::point_in_convex_poly2d(pt, &self.points)
    }

    /// Returns a copy of this polygon with every vertex multiplied by `scale`.
    ///
    /// Returns `None` if `scale` is not strictly positive.
    pub fn scaled(&self, scale: Real) -> Option<Self> {
        if scale <= 0.0 {
            return None;
        }

        Some(ConvexPolygon {
            points: self.points.iter().map(|pt| pt * scale).collect(),
            normals: self.normals.clone(),
        })
    }
}
