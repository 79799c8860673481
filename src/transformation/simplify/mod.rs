//! Reduction of the number of vertices of traced loops.

pub use self::douglas_peucker::{douglas_peucker, perpendicular_distance};
pub use self::heuristics::{accumulate_curvature, curvature, preserve_corners, window_average};

use crate::math::{Point, Real};
use core::fmt;
use core::str::FromStr;
use hashbrown::HashSet;
use ordered_float::OrderedFloat;

mod douglas_peucker;
mod heuristics;

/// The algorithm used to simplify a loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Simplifier {
    /// Exact Ramer-Douglas-Peucker; the tolerance is a distance in pixels.
    #[default]
    DouglasPeucker,
    /// Keeps a point each time the accumulated curvature exceeds the tolerance.
    CurvatureHeuristic,
    /// Curvature accumulation that also keeps every sharp corner.
    CornerHeuristic,
    /// Sliding-window averaging followed by curvature accumulation.
    WindowAverage,
    /// Leaves loops untouched.
    None,
}

impl Simplifier {
    /// All the algorithms, in declaration order.
    pub const ALL: [Simplifier; 5] = [
        Simplifier::DouglasPeucker,
        Simplifier::CurvatureHeuristic,
        Simplifier::CornerHeuristic,
        Simplifier::WindowAverage,
        Simplifier::None,
    ];

    /// The name used by the [`FromStr`] and [`Display`](fmt::Display) implementations.
    pub fn name(self) -> &'static str {
        match self {
            Simplifier::DouglasPeucker => "douglas-peucker",
            Simplifier::CurvatureHeuristic => "curvature",
            Simplifier::CornerHeuristic => "corner",
            Simplifier::WindowAverage => "window-average",
            Simplifier::None => "none",
        }
    }

    /// Does this algorithm read the averaging window size?
    pub fn uses_window(self) -> bool {
        self == Simplifier::WindowAverage
    }
}

impl fmt::Display for Simplifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing the name of an unknown simplification algorithm.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown simplification algorithm `{0}`")]
pub struct UnknownSimplifier(pub String);

impl FromStr for Simplifier {
    type Err = UnknownSimplifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Simplifier::ALL
            .into_iter()
            .find(|alg| alg.name() == normalized)
            .ok_or_else(|| UnknownSimplifier(s.to_string()))
    }
}

/// Simplifies the closed loop `points` with the given algorithm.
///
/// `tolerance` is the distance threshold of Douglas-Peucker and the curvature threshold of
/// the heuristics. `window` is only read by [`Simplifier::WindowAverage`]. The result never
/// has more points than the input.
pub fn simplify(
    points: &[Point<Real>],
    simplifier: Simplifier,
    tolerance: Real,
    window: usize,
) -> Vec<Point<Real>> {
    match simplifier {
        Simplifier::DouglasPeucker => douglas_peucker(points, tolerance),
        Simplifier::CurvatureHeuristic => accumulate_curvature(points, tolerance),
        Simplifier::CornerHeuristic => preserve_corners(points, tolerance),
        Simplifier::WindowAverage => window_average(points, window, tolerance),
        Simplifier::None => points.to_vec(),
    }
}

/// Removes every repeated point of a loop, keeping the first occurrence of each.
///
/// This also drops a closing point equal to the first one.
pub fn dedup_loop(points: &mut Vec<Point<Real>>) {
    let mut seen = HashSet::with_capacity(points.len());
    points.retain(|pt| seen.insert([OrderedFloat(pt.x), OrderedFloat(pt.y)]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for alg in Simplifier::ALL {
            assert_eq!(alg.to_string().parse::<Simplifier>(), Ok(alg));
        }
        assert_eq!(
            "Douglas_Peucker".parse::<Simplifier>(),
            Ok(Simplifier::DouglasPeucker)
        );
        assert_eq!(
            "visvalingam".parse::<Simplifier>(),
            Err(UnknownSimplifier("visvalingam".to_string()))
        );
    }

    #[test]
    fn dedup_keeps_first_occurrences() {
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        dedup_loop(&mut pts);
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn none_is_the_identity() {
        let pts: Vec<_> = (0..10).map(|i| Point::new(i as Real, 0.0)).collect();
        assert_eq!(simplify(&pts, Simplifier::None, 100.0, 3), pts);
        assert_eq!(simplify(&pts, Simplifier::DouglasPeucker, 100.0, 3).len(), 2);
    }
}
