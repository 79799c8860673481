/*!
alphapoly
========

**alphapoly** turns the opacity mask of a 2D sprite into a small set of convex
polygons usable as collision shapes by a physics engine.

The work is split into four stages, each usable on its own:

1. [`transformation::trace_boundary`] follows the pixel boundary of the opaque region
   and of its holes.
2. [`transformation::simplify()`] reduces every traced loop.
3. [`transformation::triangulate_polygon`] computes a sweep-line constrained Delaunay
   triangulation of the simplified loops.
4. [`transformation::merge_convex`] fuses the triangles back into convex polygons with a
   bounded number of vertices.

[`pipeline::decompose`] chains all of them.

```
# #[cfg(all(feature = "dim2", feature = "f32"))] {
use alphapoly2d::mask::BitMask;
use alphapoly2d::pipeline::{decompose, DecompositionParameters};

let mask = BitMask::from_fn(16, 16, |x, y| (x - 8) * (x - 8) + (y - 8) * (y - 8) <= 36);
let polygons = decompose(&mask, &DecompositionParameters::default()).unwrap();
assert!(!polygons.is_empty());
assert!(polygons.iter().all(|poly| poly.points().len() <= 8));
# }
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![deny(unused_qualifications)]

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod mask;
pub mod pipeline;
pub mod shape;
pub mod transformation;
pub mod utils;

mod real {
    /// The scalar type used to store the output vertices.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used to store the output vertices.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point2, UnitVector2, Vector2};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The point type.
    pub use Point2 as Point;

    /// The vector type.
    pub use Vector2 as Vector;

    /// The unit vector type.
    pub use UnitVector2 as UnitVector;

    /// Integer pixel coordinates, `x` growing to the right and `y` growing upward.
    pub type Pixel = Point2<i32>;
}
