use crate::math::Real;
use crate::transformation::{Simplifier, UnknownSimplifier};

/// Errors raised by [`DecompositionParameters::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParametersError {
    /// The simplification algorithm name is not recognized.
    #[error(transparent)]
    UnknownSimplifier(#[from] UnknownSimplifier),
    /// The polygon vertex limit is zero.
    #[error("the maximum number of vertices per polygon must be positive")]
    NonPositiveMaxVertices,
    /// The polygon vertex limit is positive but does not allow a triangle.
    #[error("polygons need at least 3 vertices, the maximum is {0}")]
    TooFewMaxVertices(usize),
    /// The simplification tolerance is negative or not finite.
    #[error("invalid simplification tolerance {0}")]
    InvalidTolerance(Real),
    /// The averaging window of [`Simplifier::WindowAverage`] is empty.
    #[error("the averaging window must contain at least one point")]
    ZeroAverageWindow,
}

/// Parameters of the decomposition of a mask into convex polygons.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DecompositionParameters {
    /// The algorithm reducing every traced loop.
    ///
    /// Defaults to [`Simplifier::DouglasPeucker`].
    pub simplifier: Simplifier,
    /// The distance threshold of Douglas-Peucker, or the curvature threshold of the
    /// heuristics, in (supersampled) pixels.
    ///
    /// Defaults to `1.0`.
    pub tolerance: Real,
    /// The number of points averaged by [`Simplifier::WindowAverage`].
    ///
    /// Defaults to `3`.
    pub average_window: usize,
    /// Whether holes of the opaque region are traced and cut out of the polygons.
    ///
    /// Defaults to `true`.
    pub detect_holes: bool,
    /// The maximum number of vertices of each output polygon.
    ///
    /// Defaults to `8`.
    pub max_polygon_vertices: usize,
    /// Whether the mask is traced at twice its resolution. The output coordinates are
    /// scaled back to the original resolution.
    ///
    /// Defaults to `false`.
    pub supersample: bool,
    /// Whether the loops run along pixel corners, so that the polygons cover every
    /// opaque boundary pixel entirely, instead of through pixel coordinates.
    ///
    /// The pixel `(x, y)` then covers the square `[x, x + 1] × [y, y + 1]`.
    ///
    /// Defaults to `false`.
    pub pixel_perfect: bool,
}

impl Default for DecompositionParameters {
    fn default() -> Self {
        Self {
            simplifier: Simplifier::DouglasPeucker,
            tolerance: 1.0,
            average_window: 3,
            detect_holes: true,
            max_polygon_vertices: 8,
            supersample: false,
            pixel_perfect: false,
        }
    }
}

impl DecompositionParameters {
    /// Selects the simplification algorithm by name, e.g. `"douglas-peucker"` or `"none"`.
    pub fn with_simplifier_named(mut self, name: &str) -> Result<Self, ParametersError> {
        self.simplifier = name.parse()?;
        Ok(self)
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<(), ParametersError> {
        match self.max_polygon_vertices {
            0 => return Err(ParametersError::NonPositiveMaxVertices),
            n if n < 3 => return Err(ParametersError::TooFewMaxVertices(n)),
            _ => {}
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ParametersError::InvalidTolerance(self.tolerance));
        }

        if self.simplifier.uses_window() && self.average_window == 0 {
            return Err(ParametersError::ZeroAverageWindow);
        }

        Ok(())
    }
}
