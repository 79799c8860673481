//! Various unsorted geometrical and logical operators.

pub use self::ccw_face_normal::ccw_face_normal;
pub use self::point_in_poly2d::{point_in_convex_poly2d, point_in_poly2d};
pub use self::point_in_triangle::{corner_direction, is_convex_loop, Orientation};
pub use self::polygon_area::{polygon_area, signed_polygon_area};
pub use self::segments_intersection::segments_intersect2d;
pub use self::sorted_pair::SortedPair;

mod ccw_face_normal;
mod point_in_poly2d;
mod point_in_triangle;
mod polygon_area;
mod segments_intersection;
mod sorted_pair;
