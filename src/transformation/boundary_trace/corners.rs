//! Moves traced pixels onto pixel corners, so that loops enclose whole pixels.
//!
//! A pixel `(x, y)` covers the unit square `[x, x + 1] × [y, y + 1]`. A traced loop runs
//! through pixel coordinates, which leaves half of every boundary pixel outside of the
//! outline. Each traced pixel is instead replaced by the corner of its square that lies on
//! the border of the background region it was traced against.

use super::{Direction, DirectionMask};
use crate::math::Pixel;
use na::Vector2;

const NORTH_EAST: [i32; 2] = [1, 1];
const SOUTH_EAST: [i32; 2] = [1, 0];
const NORTH_WEST: [i32; 2] = [0, 1];
const SOUTH_WEST: [i32; 2] = [0, 0];

/// The corner of `pixel` an outline passes through, given the directions of its
/// `background` neighbors.
///
/// - Background to the north and to the east: the north-east corner.
/// - Background along a single diagonal only: the corner shared with that neighbor.
/// - Background to the east: the south-east corner.
/// - Background to the north: the north-west corner.
/// - Otherwise the south-west corner, unless none of the three neighbors sharing it is
///   background, in which case the first background diagonal among north-east,
///   south-east and north-west is used.
pub fn pixel_corner(pixel: Pixel, background: DirectionMask) -> Pixel {
    let only = |dir: Direction| background == DirectionMask::from(dir);
    let has = |dir: Direction| background.contains(DirectionMask::from(dir));

    let [dx, dy] = if (has(Direction::North) && has(Direction::East)) || only(Direction::NorthEast) {
        NORTH_EAST
    } else if only(Direction::SouthEast) || has(Direction::East) {
        SOUTH_EAST
    } else if only(Direction::NorthWest) || has(Direction::North) {
        NORTH_WEST
    } else if background.intersects(DirectionMask::WEST | DirectionMask::SOUTH_WEST | DirectionMask::SOUTH) {
        SOUTH_WEST
    } else if has(Direction::NorthEast) {
        NORTH_EAST
    } else if has(Direction::SouthEast) {
        SOUTH_EAST
    } else if has(Direction::NorthWest) {
        NORTH_WEST
    } else {
        SOUTH_WEST
    };

    pixel + Vector2::new(dx, dy)
}
