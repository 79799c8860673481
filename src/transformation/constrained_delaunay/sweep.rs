//! The sweep-line itself: point events, edge events, legalization and mesh cleaning.
//!
//! Every routine that used to call itself is unrolled here into a loop or an explicit
//! work stack. The order in which triangles are created, flipped and visited is the
//! same as with the recursive formulation.

use super::advancing_front::{AdvancingFront, NodeId};
use super::predicates::{in_circle, in_scan_area, orient2d, EPSILON};
use super::triangle::{Triangle, TriangleArena, TriangleId};
use super::{ConstraintEdge, TriangulationError};
use crate::utils::{Orientation, SortedPair};
use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use hashbrown::HashSet;
use na::Point2;
use smallvec::SmallVec;

/// Margin added around the bounding box of the input to place the two sentinel vertices,
/// relative to its size.
const ALPHA: f64 = 0.3;

const MISSING_TRIANGLE: TriangulationError =
    TriangulationError::InvariantViolation("front node is not covered by any triangle");
const MISSING_NEIGHBOR: TriangulationError =
    TriangulationError::InvariantViolation("expected neighbor triangle is missing");
const STALLED_FILL: TriangulationError =
    TriangulationError::InvariantViolation("front filling along a constraint made no progress");
const VERTEX_ON_CONSTRAINT: TriangulationError =
    TriangulationError::InvariantViolation("constraint edge runs through a vertex");

/// A vertex of the sweep.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SweepVertex {
    pub point: Point2<f64>,
    /// The lower endpoints of the constraint edges this vertex is the upper endpoint of.
    pub lower_ends: SmallVec<[usize; 2]>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Basin {
    left: NodeId,
    right: NodeId,
    width: f64,
    left_highest: bool,
}

/// The constraint being inserted.
#[derive(Copy, Clone, Debug, Default)]
struct EdgeEvent {
    p: usize,
    q: usize,
    right: bool,
}

#[derive(Copy, Clone, Debug)]
enum EdgeTask {
    Edge {
        ep: usize,
        eq: usize,
        triangle: TriangleId,
        point: usize,
    },
    Flip {
        ep: usize,
        eq: usize,
        triangle: TriangleId,
        point: usize,
    },
    FlipScan {
        ep: usize,
        eq: usize,
        flip_triangle: TriangleId,
        triangle: TriangleId,
        point: usize,
    },
}

#[derive(Copy, Clone, Debug)]
enum LegalizeFrame {
    Scan(TriangleId),
    AfterFirst {
        t: TriangleId,
        ot: TriangleId,
        i: usize,
        oi: usize,
    },
    AfterSecond {
        t: TriangleId,
        ot: TriangleId,
        i: usize,
        oi: usize,
    },
}

#[derive(Copy, Clone, Debug)]
struct IllegalEdge {
    i: usize,
    ot: TriangleId,
    oi: usize,
    p: usize,
    op: usize,
}

/// The mutable state of one triangulation.
pub(crate) struct Sweep {
    vertices: Vec<SweepVertex>,
    order: Vec<usize>,
    head: usize,
    tail: usize,
    constraints: HashSet<SortedPair<usize>>,
    mesh: TriangleArena,
    front: AdvancingFront,
    basin: Basin,
    edge_event: EdgeEvent,
}

impl Sweep {
    /// Prepares the sweep of `points`, visited in `order` (by increasing `y` then `x`).
    ///
    /// The input must have been validated: at least three distinct, finite and
    /// non-collinear points.
    pub fn new(points: &[Point2<f64>], edges: &[ConstraintEdge], order: Vec<usize>) -> Self {
        let n = points.len();
        let mut vertices: Vec<_> = points
            .iter()
            .map(|point| SweepVertex {
                point: *point,
                lower_ends: SmallVec::new(),
            })
            .collect();
        let mut constraints = HashSet::with_capacity(edges.len());

        for edge in edges {
            let (lower, upper) = (edge.lower() as usize, edge.upper() as usize);
            if constraints.insert(SortedPair::new(lower, upper)) {
                vertices[upper].lower_ends.push(lower);
            }
        }

        let mut mins = points[0];
        let mut maxs = points[0];
        for pt in points {
            mins = mins.inf(pt);
            maxs = maxs.sup(pt);
        }
        let margin = (maxs - mins) * ALPHA;

        let tail = n;
        let head = n + 1;
        vertices.push(SweepVertex {
            point: Point2::new(mins.x - margin.x, mins.y - margin.y),
            lower_ends: SmallVec::new(),
        });
        vertices.push(SweepVertex {
            point: Point2::new(maxs.x + margin.x, mins.y - margin.y),
            lower_ends: SmallVec::new(),
        });

        let first = order[0];
        let mut mesh = TriangleArena::default();
        let seed = mesh.push(Triangle::new(first, tail, head));
        let front = AdvancingFront::new(
            (tail, vertices[tail].point.x),
            (first, vertices[first].point.x),
            (head, vertices[head].point.x),
            seed,
        );

        Self {
            vertices,
            order,
            head,
            tail,
            constraints,
            mesh,
            front,
            basin: Basin::default(),
            edge_event: EdgeEvent::default(),
        }
    }

    /// Runs the sweep and returns the counter-clockwise triangles of the constrained region.
    pub fn run(mut self) -> Result<Vec<[u32; 3]>, TriangulationError> {
        for k in 1..self.order.len() {
            let vertex = self.order[k];
            let node = self.point_event(vertex)?;

            for e in 0..self.vertices[vertex].lower_ends.len() {
                let lower = self.vertices[vertex].lower_ends[e];
                self.insert_constraint(lower, vertex, node)?;
            }
        }

        self.finish()
    }

    #[inline]
    fn pt(&self, vertex: usize) -> &Point2<f64> {
        &self.vertices[vertex].point
    }

    #[inline]
    fn node_pt(&self, node: NodeId) -> &Point2<f64> {
        self.pt(self.front.node(node).vertex)
    }

    #[inline]
    fn node_triangle(&self, node: NodeId) -> Result<TriangleId, TriangulationError> {
        self.front.node(node).triangle.ok_or(MISSING_TRIANGLE)
    }

    fn orient_nodes(&self, a: NodeId, b: NodeId, c: NodeId) -> Orientation {
        orient2d(self.node_pt(a), self.node_pt(b), self.node_pt(c))
    }

    /*
     * Point events.
     */
    fn point_event(&mut self, vertex: usize) -> Result<NodeId, TriangulationError> {
        let x = self.pt(vertex).x;
        let node = self
            .front
            .locate_node(x)
            .ok_or(TriangulationError::InvariantViolation(
                "no front node below the swept vertex",
            ))?;
        let new_node = self.new_front_triangle(vertex, node)?;

        // The new vertex lies right above `node`.
        if x <= self.front.node(node).x + EPSILON {
            self.fill(node)?;
        }

        self.fill_advancing_front(new_node)?;
        Ok(new_node)
    }

    fn new_front_triangle(&mut self, vertex: usize, node: NodeId) -> Result<NodeId, TriangulationError> {
        let next = self.front.next(node)?;
        let covering = self.node_triangle(node)?;
        let triangle = self.mesh.push(Triangle::new(
            vertex,
            self.front.node(node).vertex,
            self.front.node(next).vertex,
        ));
        self.mesh.mark_neighbor(triangle, covering)?;

        let new_node = self.front.insert_after(node, vertex, self.pt(vertex).x)?;

        if !self.legalize(triangle)? {
            self.map_triangle_to_nodes(triangle);
        }

        Ok(new_node)
    }

    /// Covers the gap between `node` and its two front neighbors, removing `node` from the front.
    fn fill(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let prev = self.front.prev(node)?;
        let next = self.front.next(node)?;
        let triangle = self.mesh.push(Triangle::new(
            self.front.node(prev).vertex,
            self.front.node(node).vertex,
            self.front.node(next).vertex,
        ));

        let prev_triangle = self.node_triangle(prev)?;
        let node_triangle = self.node_triangle(node)?;
        self.mesh.mark_neighbor(triangle, prev_triangle)?;
        self.mesh.mark_neighbor(triangle, node_triangle)?;

        self.front.remove(node)?;

        if !self.legalize(triangle)? {
            self.map_triangle_to_nodes(triangle);
        }

        Ok(())
    }

    fn fill_advancing_front(&mut self, n: NodeId) -> Result<(), TriangulationError> {
        let mut node = self.front.next(n)?;
        while let Some(next) = self.front.node(node).next {
            let angle = self.hole_angle(node)?;
            if angle > FRAC_PI_2 || angle < -FRAC_PI_2 {
                break;
            }
            self.fill(node)?;
            node = next;
        }

        let mut node = self.front.prev(n)?;
        while let Some(prev) = self.front.node(node).prev {
            let angle = self.hole_angle(node)?;
            if angle > FRAC_PI_2 || angle < -FRAC_PI_2 {
                break;
            }
            self.fill(node)?;
            node = prev;
        }

        if let Some(next) = self.front.node(n).next {
            if self.front.node(next).next.is_some() && self.basin_angle(n)? < 3.0 * FRAC_PI_4 {
                self.fill_basin(n)?;
            }
        }

        Ok(())
    }

    fn hole_angle(&self, node: NodeId) -> Result<f64, TriangulationError> {
        let origin = self.node_pt(node);
        let a = self.node_pt(self.front.next(node)?) - origin;
        let b = self.node_pt(self.front.prev(node)?) - origin;
        Ok(a.perp(&b).atan2(a.dot(&b)))
    }

    fn basin_angle(&self, node: NodeId) -> Result<f64, TriangulationError> {
        let next_next = self.front.next(self.front.next(node)?)?;
        let d = self.node_pt(node) - self.node_pt(next_next);
        Ok(d.y.atan2(d.x))
    }

    /*
     * Basins.
     */
    fn fill_basin(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let next = self.front.next(node)?;
        let next_next = self.front.next(next)?;
        let left = if self.orient_nodes(node, next, next_next) == Orientation::Ccw {
            node
        } else {
            next
        };

        let mut bottom = left;
        while let Some(next) = self.front.node(bottom).next {
            if self.node_pt(bottom).y < self.node_pt(next).y {
                break;
            }
            bottom = next;
        }
        if bottom == left {
            return Ok(());
        }

        let mut right = bottom;
        while let Some(next) = self.front.node(right).next {
            if self.node_pt(right).y >= self.node_pt(next).y {
                break;
            }
            right = next;
        }
        if right == bottom {
            return Ok(());
        }

        self.basin = Basin {
            left,
            right,
            width: self.node_pt(right).x - self.node_pt(left).x,
            left_highest: self.node_pt(left).y > self.node_pt(right).y,
        };

        self.fill_basin_from(bottom)
    }

    fn fill_basin_from(&mut self, mut node: NodeId) -> Result<(), TriangulationError> {
        let basin = self.basin;

        while !self.is_shallow(node) {
            self.fill(node)?;

            let prev = self.front.prev(node)?;
            let next = self.front.next(node)?;

            if prev == basin.left && next == basin.right {
                break;
            } else if prev == basin.left {
                let next_next = self.front.next(next)?;
                if self.orient_nodes(node, next, next_next) == Orientation::Cw {
                    break;
                }
                node = next;
            } else if next == basin.right {
                let prev_prev = self.front.prev(prev)?;
                if self.orient_nodes(node, prev, prev_prev) == Orientation::Ccw {
                    break;
                }
                node = prev;
            } else if self.node_pt(prev).y < self.node_pt(next).y {
                node = prev;
            } else {
                node = next;
            }
        }

        Ok(())
    }

    fn is_shallow(&self, node: NodeId) -> bool {
        let rim = if self.basin.left_highest {
            self.basin.left
        } else {
            self.basin.right
        };
        let height = self.node_pt(rim).y - self.node_pt(node).y;
        self.basin.width > height
    }

    /*
     * Edge events.
     */
    fn insert_constraint(&mut self, lower: usize, upper: usize, node: NodeId) -> Result<(), TriangulationError> {
        self.edge_event = EdgeEvent {
            p: lower,
            q: upper,
            right: self.pt(lower).x > self.pt(upper).x,
        };

        if self.is_edge_side_of_triangle(self.node_triangle(node)?, lower, upper) {
            return Ok(());
        }

        if self.edge_event.right {
            self.fill_right_above(node)?;
        } else {
            self.fill_left_above(node)?;
        }

        self.run_edge_tasks(EdgeTask::Edge {
            ep: lower,
            eq: upper,
            triangle: self.node_triangle(node)?,
            point: upper,
        })
    }

    /// Marks `(ep, eq)` as constrained if it is an edge of `triangle`.
    fn is_edge_side_of_triangle(&mut self, triangle: TriangleId, ep: usize, eq: usize) -> bool {
        match self.mesh[triangle].edge_index(ep, eq) {
            Some(i) => {
                self.mesh[triangle].constrained[i] = true;
                if let Some(neighbor) = self.mesh[triangle].neighbors[i] {
                    self.mesh[neighbor].mark_constrained_edge(ep, eq);
                }
                true
            }
            None => false,
        }
    }

    fn fill_right_above(&mut self, mut node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            let next = self.front.next(node)?;
            if self.node_pt(next).x >= self.pt(p).x {
                return Ok(());
            }

            if orient2d(self.pt(q), self.node_pt(next), self.pt(p)) == Orientation::Ccw {
                let before = self.mesh.len();
                self.fill_right_below(node)?;
                if self.mesh.len() == before {
                    return Err(STALLED_FILL);
                }
            } else {
                node = next;
            }
        }
    }

    fn fill_right_below(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        while self.node_pt(node).x < self.pt(self.edge_event.p).x {
            let next = self.front.next(node)?;
            let next_next = self.front.next(next)?;

            if self.orient_nodes(node, next, next_next) == Orientation::Ccw {
                return self.fill_right_concave(node);
            }

            let before = self.mesh.len();
            self.fill_right_convex(node)?;
            if self.mesh.len() == before {
                return Err(STALLED_FILL);
            }
        }

        Ok(())
    }

    fn fill_right_concave(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            self.fill(self.front.next(node)?)?;

            let next = self.front.next(node)?;
            if self.front.node(next).vertex == p
                || orient2d(self.pt(q), self.node_pt(next), self.pt(p)) != Orientation::Ccw
            {
                return Ok(());
            }

            let next_next = self.front.next(next)?;
            if self.orient_nodes(node, next, next_next) != Orientation::Ccw {
                return Ok(());
            }
        }
    }

    fn fill_right_convex(&mut self, mut node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            let n1 = self.front.next(node)?;
            let n2 = self.front.next(n1)?;
            let n3 = self.front.next(n2)?;

            if self.orient_nodes(n1, n2, n3) == Orientation::Ccw {
                return self.fill_right_concave(n1);
            }
            if orient2d(self.pt(q), self.node_pt(n2), self.pt(p)) != Orientation::Ccw {
                return Ok(());
            }
            node = n1;
        }
    }

    fn fill_left_above(&mut self, mut node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            let prev = self.front.prev(node)?;
            if self.node_pt(prev).x <= self.pt(p).x {
                return Ok(());
            }

            if orient2d(self.pt(q), self.node_pt(prev), self.pt(p)) == Orientation::Cw {
                let before = self.mesh.len();
                self.fill_left_below(node)?;
                if self.mesh.len() == before {
                    return Err(STALLED_FILL);
                }
            } else {
                node = prev;
            }
        }
    }

    fn fill_left_below(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        while self.node_pt(node).x > self.pt(self.edge_event.p).x {
            let prev = self.front.prev(node)?;
            let prev_prev = self.front.prev(prev)?;

            if self.orient_nodes(node, prev, prev_prev) == Orientation::Cw {
                return self.fill_left_concave(node);
            }

            let before = self.mesh.len();
            self.fill_left_convex(node)?;
            if self.mesh.len() == before {
                return Err(STALLED_FILL);
            }
        }

        Ok(())
    }

    fn fill_left_concave(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            self.fill(self.front.prev(node)?)?;

            let prev = self.front.prev(node)?;
            if self.front.node(prev).vertex == p
                || orient2d(self.pt(q), self.node_pt(prev), self.pt(p)) != Orientation::Cw
            {
                return Ok(());
            }

            let prev_prev = self.front.prev(prev)?;
            if self.orient_nodes(node, prev, prev_prev) != Orientation::Cw {
                return Ok(());
            }
        }
    }

    fn fill_left_convex(&mut self, mut node: NodeId) -> Result<(), TriangulationError> {
        let EdgeEvent { p, q, .. } = self.edge_event;

        loop {
            let n1 = self.front.prev(node)?;
            let n2 = self.front.prev(n1)?;
            let n3 = self.front.prev(n2)?;

            if self.orient_nodes(n1, n2, n3) == Orientation::Cw {
                return self.fill_left_concave(n1);
            }
            if orient2d(self.pt(q), self.node_pt(n2), self.pt(p)) != Orientation::Cw {
                return Ok(());
            }
            node = n1;
        }
    }

    /// Walks and flips the triangles crossed by the constraint `(ep, eq)` until it shows up
    /// as a mesh edge.
    fn run_edge_tasks(&mut self, first: EdgeTask) -> Result<(), TriangulationError> {
        let budget = self
            .mesh
            .len()
            .saturating_mul(self.mesh.len())
            .saturating_add(1024);
        let mut tasks = vec![first];
        let mut steps = 0;

        while let Some(task) = tasks.pop() {
            steps += 1;
            if steps > budget {
                return Err(TriangulationError::InvariantViolation(
                    "constraint insertion did not converge",
                ));
            }

            match task {
                EdgeTask::Edge {
                    ep,
                    eq,
                    triangle,
                    point,
                } => self.edge_step(ep, eq, triangle, point, &mut tasks)?,
                EdgeTask::Flip {
                    ep,
                    eq,
                    triangle,
                    point,
                } => self.flip_step(ep, eq, triangle, point, &mut tasks)?,
                EdgeTask::FlipScan {
                    ep,
                    eq,
                    flip_triangle,
                    triangle,
                    point,
                } => self.flip_scan_step(ep, eq, flip_triangle, triangle, point, &mut tasks)?,
            }
        }

        Ok(())
    }

    fn edge_step(
        &mut self,
        ep: usize,
        eq: usize,
        triangle: TriangleId,
        point: usize,
        tasks: &mut Vec<EdgeTask>,
    ) -> Result<(), TriangulationError> {
        if self.is_edge_side_of_triangle(triangle, ep, eq) {
            return Ok(());
        }

        let p1 = self.mesh[triangle].point_ccw(point)?;
        let o1 = orient2d(self.pt(eq), self.pt(p1), self.pt(ep));
        if o1 == Orientation::None {
            return self.split_constraint(ep, eq, triangle, point, p1, tasks);
        }

        let p2 = self.mesh[triangle].point_cw(point)?;
        let o2 = orient2d(self.pt(eq), self.pt(p2), self.pt(ep));
        if o2 == Orientation::None {
            return self.split_constraint(ep, eq, triangle, point, p2, tasks);
        }

        if o1 == o2 {
            let next = if o1 == Orientation::Cw {
                self.mesh[triangle].neighbor_ccw(point)?
            } else {
                self.mesh[triangle].neighbor_cw(point)?
            };
            tasks.push(EdgeTask::Edge {
                ep,
                eq,
                triangle: next.ok_or(MISSING_NEIGHBOR)?,
                point,
            });
        } else {
            tasks.push(EdgeTask::Flip {
                ep,
                eq,
                triangle,
                point,
            });
        }

        Ok(())
    }

    /// The constraint `(ep, eq)` passes exactly through `through`, a vertex next to `eq`:
    /// keeps `(eq, through)` and continues with `(ep, through)`.
    fn split_constraint(
        &mut self,
        ep: usize,
        eq: usize,
        triangle: TriangleId,
        point: usize,
        through: usize,
        tasks: &mut Vec<EdgeTask>,
    ) -> Result<(), TriangulationError> {
        if !self.mesh[triangle].contains_edge(eq, through) {
            return Err(VERTEX_ON_CONSTRAINT);
        }

        self.mesh[triangle].mark_constrained_edge(eq, through);
        self.edge_event.q = through;
        let across = self.mesh[triangle]
            .neighbor_across(point)?
            .ok_or(MISSING_NEIGHBOR)?;
        tasks.push(EdgeTask::Edge {
            ep,
            eq: through,
            triangle: across,
            point: through,
        });
        Ok(())
    }

    fn flip_step(
        &mut self,
        ep: usize,
        eq: usize,
        t: TriangleId,
        p: usize,
        tasks: &mut Vec<EdgeTask>,
    ) -> Result<(), TriangulationError> {
        let ot = self.mesh[t].neighbor_across(p)?.ok_or(MISSING_NEIGHBOR)?;
        let op = self.mesh.opposite_point(ot, t, p)?;
        let ccw = self.mesh[t].point_ccw(p)?;
        let cw = self.mesh[t].point_cw(p)?;

        if in_scan_area(self.pt(p), self.pt(ccw), self.pt(cw), self.pt(op)) {
            self.mesh.rotate_pair(t, p, ot, op)?;
            self.map_triangle_to_nodes(t);
            self.map_triangle_to_nodes(ot);

            if p == eq && op == ep {
                if eq == self.edge_event.q && ep == self.edge_event.p {
                    self.mesh[t].mark_constrained_edge(ep, eq);
                    self.mesh[ot].mark_constrained_edge(ep, eq);
                    let _ = self.legalize(t)?;
                    let _ = self.legalize(ot)?;
                }
            } else {
                let o = orient2d(self.pt(eq), self.pt(op), self.pt(ep));
                let next = self.next_flip_triangle(o, t, ot, p, op)?;
                tasks.push(EdgeTask::Flip {
                    ep,
                    eq,
                    triangle: next,
                    point: p,
                });
            }
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            // The scan runs first, then the walk resumes from `t`.
            tasks.push(EdgeTask::Edge {
                ep,
                eq,
                triangle: t,
                point: p,
            });
            tasks.push(EdgeTask::FlipScan {
                ep,
                eq,
                flip_triangle: t,
                triangle: ot,
                point: new_p,
            });
        }

        Ok(())
    }

    fn flip_scan_step(
        &mut self,
        ep: usize,
        eq: usize,
        flip_triangle: TriangleId,
        t: TriangleId,
        p: usize,
        tasks: &mut Vec<EdgeTask>,
    ) -> Result<(), TriangulationError> {
        let ot = self.mesh[t].neighbor_across(p)?.ok_or(MISSING_NEIGHBOR)?;
        let op = self.mesh.opposite_point(ot, t, p)?;
        let ccw = self.mesh[flip_triangle].point_ccw(eq)?;
        let cw = self.mesh[flip_triangle].point_cw(eq)?;

        if in_scan_area(self.pt(eq), self.pt(ccw), self.pt(cw), self.pt(op)) {
            tasks.push(EdgeTask::Flip {
                ep: eq,
                eq: op,
                triangle: ot,
                point: op,
            });
        } else {
            let new_p = self.next_flip_point(ep, eq, ot, op)?;
            tasks.push(EdgeTask::FlipScan {
                ep,
                eq,
                flip_triangle,
                triangle: ot,
                point: new_p,
            });
        }

        Ok(())
    }

    /// Legalizes the triangle of the flipped pair that the constraint no longer crosses and
    /// returns the other one.
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t: TriangleId,
        ot: TriangleId,
        p: usize,
        op: usize,
    ) -> Result<TriangleId, TriangulationError> {
        let (settled, crossed) = if o == Orientation::Ccw { (ot, t) } else { (t, ot) };
        let slot = self.mesh[settled]
            .edge_index(p, op)
            .ok_or(TriangulationError::InvariantViolation("flipped diagonal not found"))?;

        self.mesh[settled].delaunay[slot] = true;
        let _ = self.legalize(settled)?;
        self.mesh[settled].clear_delaunay();
        Ok(crossed)
    }

    fn next_flip_point(
        &self,
        ep: usize,
        eq: usize,
        ot: TriangleId,
        op: usize,
    ) -> Result<usize, TriangulationError> {
        match orient2d(self.pt(eq), self.pt(op), self.pt(ep)) {
            Orientation::Cw => self.mesh[ot].point_ccw(op),
            Orientation::Ccw => self.mesh[ot].point_cw(op),
            Orientation::None => Err(VERTEX_ON_CONSTRAINT),
        }
    }

    /*
     * Legalization.
     */
    /// Restores the Delaunay property around `t`.
    ///
    /// Returns `true` if at least one edge was flipped, in which case the front nodes have
    /// already been re-mapped.
    fn legalize(&mut self, t: TriangleId) -> Result<bool, TriangulationError> {
        let mut stack = vec![LegalizeFrame::Scan(t)];
        let mut flipped = false;

        while let Some(frame) = stack.pop() {
            match frame {
                LegalizeFrame::Scan(t) => {
                    flipped = false;
                    if let Some(IllegalEdge { i, ot, oi, p, op }) = self.find_illegal_edge(t)? {
                        self.mesh[t].delaunay[i] = true;
                        self.mesh[ot].delaunay[oi] = true;
                        self.mesh.rotate_pair(t, p, ot, op)?;
                        stack.push(LegalizeFrame::AfterFirst { t, ot, i, oi });
                        stack.push(LegalizeFrame::Scan(t));
                    }
                }
                LegalizeFrame::AfterFirst { t, ot, i, oi } => {
                    if !flipped {
                        self.map_triangle_to_nodes(t);
                    }
                    stack.push(LegalizeFrame::AfterSecond { t, ot, i, oi });
                    stack.push(LegalizeFrame::Scan(ot));
                }
                LegalizeFrame::AfterSecond { t, ot, i, oi } => {
                    if !flipped {
                        self.map_triangle_to_nodes(ot);
                    }
                    self.mesh[t].delaunay[i] = false;
                    self.mesh[ot].delaunay[oi] = false;
                    flipped = true;
                }
            }
        }

        Ok(flipped)
    }

    fn find_illegal_edge(&mut self, t: TriangleId) -> Result<Option<IllegalEdge>, TriangulationError> {
        for i in 0..3 {
            if self.mesh[t].delaunay[i] {
                continue;
            }
            let Some(ot) = self.mesh[t].neighbors[i] else {
                continue;
            };

            let p = self.mesh[t].points[i];
            let op = self.mesh.opposite_point(ot, t, p)?;
            let oi = self.mesh[ot].index(op)?;

            if self.mesh[ot].constrained[oi] || self.mesh[ot].delaunay[oi] {
                self.mesh[t].constrained[i] = self.mesh[ot].constrained[oi];
                continue;
            }

            let ccw = self.mesh[t].point_ccw(p)?;
            let cw = self.mesh[t].point_cw(p)?;
            if in_circle(self.pt(p), self.pt(ccw), self.pt(cw), self.pt(op)) {
                return Ok(Some(IllegalEdge { i, ot, oi, p, op }));
            }
        }

        Ok(None)
    }

    /// Makes the front nodes lying on the open edges of `t` point to `t`.
    fn map_triangle_to_nodes(&mut self, t: TriangleId) {
        for i in 0..3 {
            if self.mesh[t].neighbors[i].is_none() {
                let vertex = self.mesh[t].points[(i + 2) % 3];
                let x = self.pt(vertex).x;
                if let Some(node) = self.front.locate_point(vertex, x) {
                    self.front.node_mut(node).triangle = Some(t);
                }
            }
        }
    }

    /*
     * Finalization.
     */
    fn finish(mut self) -> Result<Vec<[u32; 3]>, TriangulationError> {
        self.sync_constrained_edges()?;

        let first = self.front.next(self.front.head())?;
        let p = self.front.node(first).vertex;
        let mut t = self.node_triangle(first)?;
        let mut steps = 0;

        while !self.mesh[t].constrained[self.mesh[t].cw_slot(p)?] {
            t = self.mesh[t].neighbor_ccw(p)?.ok_or(MISSING_NEIGHBOR)?;
            steps += 1;
            if steps > self.mesh.len() {
                return Err(TriangulationError::InvariantViolation(
                    "no constrained edge around the first front vertex",
                ));
            }
        }

        let interior = self.clean_mesh(t);
        let mut result = Vec::with_capacity(interior.len());

        for t in interior {
            let [a, b, c] = self.mesh[t].points;
            if [a, b, c].iter().any(|v| *v == self.head || *v == self.tail) {
                return Err(TriangulationError::InvariantViolation(
                    "mesh cleaning escaped the constrained region",
                ));
            }

            match orient2d(self.pt(a), self.pt(b), self.pt(c)) {
                Orientation::Ccw => result.push([a as u32, b as u32, c as u32]),
                Orientation::Cw => result.push([a as u32, c as u32, b as u32]),
                Orientation::None => log::debug!("dropping flat triangle ({a}, {b}, {c})"),
            }
        }

        Ok(result)
    }

    /// Makes every constraint edge constrained on both triangles sharing it.
    fn sync_constrained_edges(&mut self) -> Result<(), TriangulationError> {
        for t in 0..self.mesh.len() {
            for i in 0..3 {
                let a = self.mesh[t].points[(i + 1) % 3];
                let b = self.mesh[t].points[(i + 2) % 3];
                let mut constrained =
                    self.mesh[t].constrained[i] || self.constraints.contains(&SortedPair::new(a, b));

                if let Some(ot) = self.mesh[t].neighbors[i] {
                    let j = self.mesh[ot].edge_index(a, b).ok_or(
                        TriangulationError::InvariantViolation("neighbor triangles do not share an edge"),
                    )?;
                    constrained |= self.mesh[ot].constrained[j];
                    self.mesh[ot].constrained[j] = constrained;
                }

                self.mesh[t].constrained[i] = constrained;
            }
        }

        Ok(())
    }

    /// Flood-fills the triangles reachable from `start` without crossing a constraint.
    fn clean_mesh(&mut self, start: TriangleId) -> Vec<TriangleId> {
        let mut stack = vec![start];
        let mut interior = vec![];

        while let Some(t) = stack.pop() {
            if self.mesh[t].interior {
                continue;
            }
            self.mesh[t].interior = true;
            interior.push(t);

            for i in (0..3).rev() {
                if !self.mesh[t].constrained[i] {
                    if let Some(neighbor) = self.mesh[t].neighbors[i] {
                        stack.push(neighbor);
                    }
                }
            }
        }

        interior
    }
}
