use crate::mask::OpacityMask;
use crate::math::Pixel;
use arrayvec::ArrayVec;
use na::Vector2;

/// One of the eight compass offsets between a pixel and its neighbors.
///
/// Variants are listed counter-clockwise starting from the east, with `y` pointing up, so
/// that rotating a direction is a modular addition on its index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Direction {
    /// `(1, 0)`
    East,
    /// `(1, 1)`
    NorthEast,
    /// `(0, 1)`
    North,
    /// `(-1, 1)`
    NorthWest,
    /// `(-1, 0)`
    West,
    /// `(-1, -1)`
    SouthWest,
    /// `(0, -1)`
    South,
    /// `(1, -1)`
    SouthEast,
}

const OFFSETS: [[i32; 2]; 8] = [
    [1, 0],
    [1, 1],
    [0, 1],
    [-1, 1],
    [-1, 0],
    [-1, -1],
    [0, -1],
    [1, -1],
];

impl Direction {
    /// All directions, in counter-clockwise order starting from the east.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// The position of this direction in [`Direction::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction at position `i % 8` of [`Direction::ALL`].
    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 8]
    }

    /// The pixel offset of this direction.
    #[inline]
    pub fn offset(self) -> Vector2<i32> {
        let [dx, dy] = OFFSETS[self.index()];
        Vector2::new(dx, dy)
    }

    /// The direction matching the offset `(dx, dy)`, if it is one of the eight neighbor offsets.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        OFFSETS
            .iter()
            .position(|off| *off == [dx, dy])
            .map(Self::from_index)
    }

    /// This direction rotated counter-clockwise by `steps` eighths of a turn.
    #[inline]
    pub fn rotate_ccw(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps % 8)
    }

    /// The direction pointing the other way.
    #[inline]
    pub fn opposite(self) -> Self {
        self.rotate_ccw(4)
    }

    /// Is this one of the four diagonal directions?
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// The order in which the neighbors of a pixel entered from `self` are examined.
    ///
    /// The scan goes counter-clockwise, starts just past `self` and ends on `self`, so the
    /// pixel we came from is only stepped back onto when nothing else qualifies.
    pub fn scan_order(self) -> ArrayVec<Direction, 8> {
        (1..=8).map(|k| self.rotate_ccw(k)).collect()
    }
}

bitflags::bitflags! {
    /// A set of directions around a pixel.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirectionMask: u8 {
        /// See [`Direction::East`].
        const EAST = 1;
        /// See [`Direction::NorthEast`].
        const NORTH_EAST = 1 << 1;
        /// See [`Direction::North`].
        const NORTH = 1 << 2;
        /// See [`Direction::NorthWest`].
        const NORTH_WEST = 1 << 3;
        /// See [`Direction::West`].
        const WEST = 1 << 4;
        /// See [`Direction::SouthWest`].
        const SOUTH_WEST = 1 << 5;
        /// See [`Direction::South`].
        const SOUTH = 1 << 6;
        /// See [`Direction::SouthEast`].
        const SOUTH_EAST = 1 << 7;
    }
}

impl From<Direction> for DirectionMask {
    #[inline]
    fn from(dir: Direction) -> Self {
        DirectionMask::from_bits_retain(1 << dir.index())
    }
}

impl DirectionMask {
    /// The set of directions `dir` for which `pred(pixel + dir)` holds.
    pub fn from_neighbors(pixel: Pixel, mut pred: impl FnMut(Pixel) -> bool) -> Self {
        Direction::ALL
            .into_iter()
            .filter(|dir| pred(pixel + dir.offset()))
            .map(DirectionMask::from)
            .collect()
    }

    /// The directions of this set, in counter-clockwise order starting from the east.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.contains(DirectionMask::from(*dir)))
    }
}

/// The directions of the non-opaque neighbors of `pixel`, out-of-range neighbors included.
pub fn transparent_neighbors(mask: &impl OpacityMask, pixel: Pixel) -> DirectionMask {
    DirectionMask::from_neighbors(pixel, |p| !mask.is_opaque(p.x, p.y))
}

/// Is `pixel` opaque with at least one non-opaque neighbor?
pub fn is_boundary_pixel(mask: &impl OpacityMask, pixel: Pixel) -> bool {
    mask.is_opaque(pixel.x, pixel.y) && !transparent_neighbors(mask, pixel).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::BitMask;

    #[test]
    fn offsets_round_trip() {
        for dir in Direction::ALL {
            let off = dir.offset();
            assert_eq!(Direction::from_offset(off.x, off.y), Some(dir));
            assert_eq!(dir.opposite().offset(), -off);
            assert_eq!(dir.is_diagonal(), off.x != 0 && off.y != 0);
        }
        assert_eq!(Direction::from_offset(0, 0), None);
        assert_eq!(Direction::from_offset(2, 0), None);
    }

    // Every (entry, position) pair of the scan, checked against the cross product: each
    // candidate must be a strict counter-clockwise turn away from the previous one.
    #[test]
    fn scan_order_is_counter_clockwise_for_every_entry() {
        for entry in Direction::ALL {
            let scan = entry.scan_order();
            assert_eq!(scan.len(), 8);
            assert_eq!(scan[7], entry);

            let mut seen = DirectionMask::empty();
            let mut previous = entry;

            for (k, dir) in scan.iter().enumerate() {
                assert_eq!(*dir, entry.rotate_ccw(k + 1));
                assert!(!seen.contains((*dir).into()));
                seen |= (*dir).into();

                let a = previous.offset();
                let b = dir.offset();
                let cross = a.x * b.y - a.y * b.x;
                let dot = a.x * b.x + a.y * b.y;
                if k < 7 {
                    // One eighth of a turn: strictly to the left and less than 90 degrees away.
                    assert!(cross > 0, "{:?} -> {:?}", previous, dir);
                    assert!(dot > 0, "{:?} -> {:?}", previous, dir);
                }
                previous = *dir;
            }

            assert_eq!(seen, DirectionMask::all());
        }
    }

    #[test]
    fn rotation_table_matches_offsets() {
        for from in Direction::ALL {
            for steps in 0..8 {
                let to = from.rotate_ccw(steps);
                let angle = |d: Direction| {
                    let off = d.offset();
                    (off.y as f64).atan2(off.x as f64)
                };
                let mut delta = angle(to) - angle(from);
                while delta < 0.0 {
                    delta += core::f64::consts::TAU;
                }
                assert_relative_eq!(
                    delta,
                    steps as f64 * core::f64::consts::FRAC_PI_4,
                    epsilon = 1.0e-9
                );
            }
        }
    }

    #[test]
    fn boundary_pixels_of_a_plus_sign() {
        let mask = BitMask::from_ascii(
            "
            .#.
            ###
            .#.
            ",
        );
        let center = Pixel::new(1, 1);
        assert_eq!(
            transparent_neighbors(&mask, center),
            DirectionMask::NORTH_EAST
                | DirectionMask::NORTH_WEST
                | DirectionMask::SOUTH_WEST
                | DirectionMask::SOUTH_EAST
        );
        assert!(is_boundary_pixel(&mask, center));
        assert!(!is_boundary_pixel(&mask, Pixel::new(0, 0)));
        assert_eq!(
            transparent_neighbors(&mask, Pixel::new(1, 2)).directions().next(),
            Some(Direction::East)
        );
    }
}
