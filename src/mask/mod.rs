//! Opacity masks: the only view of the source image the decomposition needs.

pub use self::bit_mask::BitMask;
pub use self::supersampled::Supersampled;

mod bit_mask;
mod supersampled;

/// A binary opacity test over a `width × height` pixel grid.
///
/// Pixel `(0, 0)` is the bottom-left pixel, `x` grows to the right and `y` grows upward.
/// Implementations must return `false` for any coordinate outside of the grid.
pub trait OpacityMask {
    /// The number of pixel columns.
    fn width(&self) -> u32;

    /// The number of pixel rows.
    fn height(&self) -> u32;

    /// Is the pixel at `(x, y)` opaque?
    fn is_opaque(&self, x: i32, y: i32) -> bool;

    /// Is `(x, y)` a valid pixel coordinate of this mask?
    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width() as i64 && (y as i64) < self.height() as i64
    }
}

impl<M: OpacityMask + ?Sized> OpacityMask for &M {
    #[inline]
    fn width(&self) -> u32 {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> u32 {
        (**self).height()
    }

    #[inline]
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        (**self).is_opaque(x, y)
    }
}

/// An opacity mask backed by a closure.
///
/// The closure is only called for coordinates inside of the grid.
#[derive(Copy, Clone)]
pub struct FnMask<F> {
    width: u32,
    height: u32,
    opaque: F,
}

impl<F: Fn(i32, i32) -> bool> FnMask<F> {
    /// Wraps the `opaque` test for a `width × height` grid.
    pub fn new(width: u32, height: u32, opaque: F) -> Self {
        Self {
            width,
            height,
            opaque,
        }
    }
}

impl<F: Fn(i32, i32) -> bool> OpacityMask for FnMask<F> {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && (self.opaque)(x, y)
    }
}
