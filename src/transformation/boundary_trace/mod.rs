//! Moore-neighbor tracing of the outline and holes of an opacity mask.
//!
//! The non-opaque pixels are first split into 4-connected components. The component
//! touching the border of the image is the exterior; every other one is a hole. The
//! outer loop follows the opaque pixels touching the exterior, and each hole gets its
//! own loop following the opaque pixels touching that hole, so nested or neighboring
//! holes are never merged.

pub use self::corners::pixel_corner;
pub use self::direction::{is_boundary_pixel, transparent_neighbors, Direction, DirectionMask};
pub use self::error::BoundaryTraceError;

use crate::mask::OpacityMask;
use crate::math::Pixel;
use hashbrown::HashSet;
use std::collections::VecDeque;

mod corners;
mod direction;
mod error;

/// The maximum number of steps a single loop may take before the trace is abandoned.
pub const MAX_TRACE_ITERATIONS: usize = 10_000_000;

/// A closed loop of pixel coordinates.
///
/// The last pixel connects back to the first one, which is not repeated. Loops traced with
/// [`BoundaryTracer::pixel_corners`] hold pixel corners instead, and may repeat a corner.
pub type PixelLoop = Vec<Pixel>;

/// The loops extracted from an opacity mask.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TracedBoundary {
    /// The outline of the opaque region.
    pub outer: PixelLoop,
    /// The outline of every hole, in scan order.
    pub holes: Vec<PixelLoop>,
}

/// The state of the tracer between two steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceState {
    /// The pixel the tracer stands on.
    pub pixel: Pixel,
    /// The direction pointing from `pixel` back to the pixel it was entered from.
    pub entry: Direction,
}

impl TraceState {
    /// The state at the start of a loop.
    ///
    /// Loops start on the first opaque pixel met by a column-major scan, so its western
    /// neighbor is never part of the boundary and acts as the pixel we came from.
    pub fn start(pixel: Pixel) -> Self {
        Self {
            pixel,
            entry: Direction::West,
        }
    }

    /// The neighbors examined from this state, in order.
    pub fn candidates(&self) -> impl Iterator<Item = (Direction, Pixel)> + '_ {
        self.entry
            .scan_order()
            .into_iter()
            .map(move |dir| (dir, self.pixel + dir.offset()))
    }

    /// The state reached after stepping toward `dir`.
    pub fn step(&self, dir: Direction) -> Self {
        Self {
            pixel: self.pixel + dir.offset(),
            entry: dir.opposite(),
        }
    }
}

const OPAQUE: u32 = 0;
const EXTERIOR: u32 = 1;
const FIRST_HOLE: u32 = 2;

/// Component labels of the non-opaque pixels of a mask.
struct BackgroundLabels {
    width: i32,
    height: i32,
    labels: Vec<u32>,
    num_holes: usize,
}

impl BackgroundLabels {
    fn new(mask: &impl OpacityMask) -> Self {
        let width = mask.width().min(i32::MAX as u32) as i32;
        let height = mask.height().min(i32::MAX as u32) as i32;
        let mut result = Self {
            width,
            height,
            labels: vec![OPAQUE; width as usize * height as usize],
            num_holes: 0,
        };

        if result.labels.is_empty() {
            return result;
        }

        let mut visited = vec![false; result.labels.len()];
        let mut queue = VecDeque::new();

        // Border pixels first so that the exterior is labelled as a single component.
        let border = (0..width)
            .flat_map(|x| [Pixel::new(x, 0), Pixel::new(x, height - 1)])
            .chain((0..height).flat_map(|y| [Pixel::new(0, y), Pixel::new(width - 1, y)]));
        let interior = (0..width).flat_map(|x| (0..height).map(move |y| Pixel::new(x, y)));

        for seed in border.chain(interior) {
            let id = result.linear_index(seed);
            if visited[id] || mask.is_opaque(seed.x, seed.y) {
                continue;
            }

            let on_border =
                seed.x == 0 || seed.y == 0 || seed.x == width - 1 || seed.y == height - 1;
            let label = if on_border {
                EXTERIOR
            } else {
                result.num_holes += 1;
                FIRST_HOLE + result.num_holes as u32 - 1
            };

            visited[id] = true;
            queue.push_back(seed);

            while let Some(pixel) = queue.pop_front() {
                let pid = result.linear_index(pixel);
                result.labels[pid] = label;

                for dir in [
                    Direction::East,
                    Direction::North,
                    Direction::West,
                    Direction::South,
                ] {
                    let adj = pixel + dir.offset();
                    if result.contains(adj) && !mask.is_opaque(adj.x, adj.y) {
                        let aid = result.linear_index(adj);
                        if !visited[aid] {
                            visited[aid] = true;
                            queue.push_back(adj);
                        }
                    }
                }
            }
        }

        result
    }

    #[inline]
    fn contains(&self, pixel: Pixel) -> bool {
        pixel.x >= 0 && pixel.y >= 0 && pixel.x < self.width && pixel.y < self.height
    }

    #[inline]
    fn linear_index(&self, pixel: Pixel) -> usize {
        pixel.x as usize * self.height as usize + pixel.y as usize
    }

    /// The label of `pixel`; anything outside of the image belongs to the exterior.
    #[inline]
    fn label(&self, pixel: Pixel) -> u32 {
        if self.contains(pixel) {
            self.labels[self.linear_index(pixel)]
        } else {
            EXTERIOR
        }
    }

    /// Is `pixel` opaque and 8-adjacent to a pixel labelled `region`?
    fn borders(&self, pixel: Pixel, region: u32) -> bool {
        self.label(pixel) == OPAQUE && !self.adjacent_regions(pixel, region).is_empty()
    }

    fn adjacent_regions(&self, pixel: Pixel, region: u32) -> DirectionMask {
        DirectionMask::from_neighbors(pixel, |adj| self.label(adj) == region)
    }
}

/// Follows the outline and the holes of the opaque region of a mask.
pub struct BoundaryTracer<'a, M> {
    mask: &'a M,
    max_iterations: usize,
    pixel_corners: bool,
}

impl<'a, M: OpacityMask> BoundaryTracer<'a, M> {
    /// A tracer for `mask`, allowing [`MAX_TRACE_ITERATIONS`] steps per loop.
    pub fn new(mask: &'a M) -> Self {
        Self {
            mask,
            max_iterations: MAX_TRACE_ITERATIONS,
            pixel_corners: false,
        }
    }

    /// Overrides the number of steps a single loop may take.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Moves every traced pixel onto the corner given by [`pixel_corner`].
    ///
    /// The pixel `(x, y)` then covers the square `[x, x + 1] × [y, y + 1]` and the loops
    /// enclose every boundary pixel entirely. Off by default.
    pub fn pixel_corners(mut self, enabled: bool) -> Self {
        self.pixel_corners = enabled;
        self
    }

    /// Extracts the outer loop and, if `detect_holes` is set, one loop per hole.
    ///
    /// Pixels are scanned column by column, bottom to top. The first opaque pixel starts the
    /// outer loop; afterward every pixel bordering a hole that no loop follows yet starts
    /// the loop of that hole.
    pub fn trace(&self, detect_holes: bool) -> Result<TracedBoundary, BoundaryTraceError> {
        let labels = BackgroundLabels::new(self.mask);
        let scan = (0..labels.width)
            .flat_map(|x| (0..labels.height).map(move |y| Pixel::new(x, y)))
            .filter(|p| labels.label(*p) == OPAQUE);

        let mut pixels = scan.clone();
        let start = pixels.next().ok_or(BoundaryTraceError::EmptyMask)?;
        let outer = self.follow(&labels, start, EXTERIOR)?;
        log::debug!(
            "traced outer loop of {} pixels, {} hole component(s) found",
            outer.len(),
            labels.num_holes
        );

        let mut holes = Vec::new();
        if detect_holes && labels.num_holes > 0 {
            let mut traced = vec![false; labels.num_holes];

            for pixel in scan {
                let untraced = Direction::ALL.into_iter().find_map(|dir| {
                    let region = labels.label(pixel + dir.offset());
                    (region >= FIRST_HOLE && !traced[(region - FIRST_HOLE) as usize])
                        .then_some(region)
                });

                if let Some(region) = untraced {
                    traced[(region - FIRST_HOLE) as usize] = true;
                    holes.push(self.follow(&labels, pixel, region)?);

                    if traced.iter().all(|t| *t) {
                        break;
                    }
                }
            }
        }

        Ok(TracedBoundary { outer, holes })
    }

    /// Follows the opaque pixels bordering `region`, starting from `start`.
    fn follow(
        &self,
        labels: &BackgroundLabels,
        start: Pixel,
        region: u32,
    ) -> Result<PixelLoop, BoundaryTraceError> {
        let mut state = TraceState::start(start);
        let mut points = vec![start];
        let mut visited = HashSet::new();
        let _ = visited.insert(start);

        for _ in 0..self.max_iterations {
            let (dir, next) = state
                .candidates()
                .find(|(_, pixel)| labels.borders(*pixel, region))
                .ok_or(BoundaryTraceError::IsolatedPixel {
                    x: state.pixel.x,
                    y: state.pixel.y,
                })?;

            if next == start {
                if self.pixel_corners {
                    for point in &mut points {
                        *point = pixel_corner(*point, labels.adjacent_regions(*point, region));
                    }
                }
                return Ok(points);
            }

            if !visited.insert(next) {
                return Err(BoundaryTraceError::RevisitedPixel {
                    x: next.x,
                    y: next.y,
                });
            }

            points.push(next);
            state = state.step(dir);
        }

        Err(BoundaryTraceError::IterationLimitExceeded(
            self.max_iterations,
        ))
    }
}

/// Extracts the outer loop of the opaque region of `mask` and, if `detect_holes` is set, the
/// loops of its holes.
pub fn trace_boundary(
    mask: &impl OpacityMask,
    detect_holes: bool,
) -> Result<TracedBoundary, BoundaryTraceError> {
    BoundaryTracer::new(mask).trace(detect_holes)
}
