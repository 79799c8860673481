use super::OpacityMask;

/// A view of a mask at twice its resolution.
///
/// Every source pixel covers a 2×2 block of the supersampled grid.
#[derive(Copy, Clone, Debug)]
pub struct Supersampled<M> {
    source: M,
}

impl<M: OpacityMask> Supersampled<M> {
    /// Wraps `source`.
    pub fn new(source: M) -> Self {
        Self { source }
    }

    /// The wrapped mask.
    pub fn source(&self) -> &M {
        &self.source
    }
}

impl<M: OpacityMask> OpacityMask for Supersampled<M> {
    #[inline]
    fn width(&self) -> u32 {
        self.source.width().saturating_mul(2)
    }

    #[inline]
    fn height(&self) -> u32 {
        self.source.height().saturating_mul(2)
    }

    #[inline]
    fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && self.source.is_opaque(x.div_euclid(2), y.div_euclid(2))
    }
}
