/// Errors raised while following the boundary of an opacity mask.
///
/// All of them mean the opaque region is too degenerate to be outlined by a simple loop,
/// typically because parts of it are only one pixel thick. They describe the input, not
/// a bug, so callers usually skip the offending sprite.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryTraceError {
    /// The mask does not contain any opaque pixel.
    #[error("the mask has no opaque pixel")]
    EmptyMask,

    /// The loop reached a pixel with no boundary pixel around it.
    ///
    /// This happens on isolated opaque pixels.
    #[error("no boundary pixel follows ({x}, {y})")]
    IsolatedPixel {
        /// The column of the dead-end pixel.
        x: i32,
        /// The row of the dead-end pixel.
        y: i32,
    },

    /// The loop stepped back onto a pixel it already contains before reaching its start.
    #[error("boundary revisited pixel ({x}, {y}) before closing")]
    RevisitedPixel {
        /// The column of the revisited pixel.
        x: i32,
        /// The row of the revisited pixel.
        y: i32,
    },

    /// The loop did not close within the allowed number of steps.
    #[error("boundary did not close after {0} steps")]
    IterationLimitExceeded(usize),
}
