//! Triangles of the sweep and the arena that links them together.

use super::TriangulationError;
use core::ops::{Index, IndexMut};

/// Index of a triangle inside its [`TriangleArena`].
pub(crate) type TriangleId = usize;

const NOT_IN_TRIANGLE: TriangulationError =
    TriangulationError::InvariantViolation("vertex is not part of the triangle");

/// A triangle of the sweep.
///
/// Neighbors and edge flags are indexed by the opposite vertex: `neighbors[i]` lies across
/// the edge that does not touch `points[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Triangle {
    pub points: [usize; 3],
    pub neighbors: [Option<TriangleId>; 3],
    pub constrained: [bool; 3],
    /// Scratch flags preventing an edge from being flipped back while legalizing.
    pub delaunay: [bool; 3],
    pub interior: bool,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            points: [a, b, c],
            neighbors: [None; 3],
            constrained: [false; 3],
            delaunay: [false; 3],
            interior: false,
        }
    }

    pub fn index(&self, p: usize) -> Result<usize, TriangulationError> {
        self.points
            .iter()
            .position(|&q| q == p)
            .ok_or(NOT_IN_TRIANGLE)
    }

    pub fn contains(&self, p: usize) -> bool {
        self.points.contains(&p)
    }

    pub fn contains_edge(&self, p: usize, q: usize) -> bool {
        self.contains(p) && self.contains(q)
    }

    /// The slot of the edge `(p, q)`, that is the index of the third vertex.
    pub fn edge_index(&self, p: usize, q: usize) -> Option<usize> {
        let i = self.points.iter().position(|&v| v == p)?;
        let j = self.points.iter().position(|&v| v == q)?;
        (i != j).then(|| 3 - i - j)
    }

    /// The slot of the edge following `p` clockwise, shared with `point_ccw(p)`'s opposite.
    pub fn cw_slot(&self, p: usize) -> Result<usize, TriangulationError> {
        Ok((self.index(p)? + 1) % 3)
    }

    /// The slot of the edge following `p` counter-clockwise.
    pub fn ccw_slot(&self, p: usize) -> Result<usize, TriangulationError> {
        Ok((self.index(p)? + 2) % 3)
    }

    pub fn point_cw(&self, p: usize) -> Result<usize, TriangulationError> {
        Ok(self.points[(self.index(p)? + 2) % 3])
    }

    pub fn point_ccw(&self, p: usize) -> Result<usize, TriangulationError> {
        Ok(self.points[(self.index(p)? + 1) % 3])
    }

    pub fn neighbor_cw(&self, p: usize) -> Result<Option<TriangleId>, TriangulationError> {
        Ok(self.neighbors[self.cw_slot(p)?])
    }

    pub fn neighbor_ccw(&self, p: usize) -> Result<Option<TriangleId>, TriangulationError> {
        Ok(self.neighbors[self.ccw_slot(p)?])
    }

    pub fn neighbor_across(&self, p: usize) -> Result<Option<TriangleId>, TriangulationError> {
        Ok(self.neighbors[self.index(p)?])
    }

    pub fn mark_constrained_edge(&mut self, p: usize, q: usize) {
        if let Some(i) = self.edge_index(p, q) {
            self.constrained[i] = true;
        }
    }

    /// Rotates the vertices so that `new` takes the place next to `origin`.
    ///
    /// This is the vertex half of a diagonal flip; neighbors and flags are fixed up by
    /// [`TriangleArena::rotate_pair`].
    pub fn rotate(&mut self, origin: usize, new: usize) -> Result<(), TriangulationError> {
        let [a, b, c] = self.points;
        self.points = match self.index(origin)? {
            0 => [c, a, new],
            1 => [new, a, b],
            _ => [c, new, b],
        };
        Ok(())
    }

    pub fn clear_delaunay(&mut self) {
        self.delaunay = [false; 3];
    }
}

/// Owner of every triangle created by a sweep.
///
/// Triangles are never removed: flips rewrite them in place, so a [`TriangleId`] stays
/// valid for the whole sweep.
#[derive(Clone, Debug, Default)]
pub(crate) struct TriangleArena {
    triangles: Vec<Triangle>,
}

impl Index<TriangleId> for TriangleArena {
    type Output = Triangle;

    #[inline]
    fn index(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id]
    }
}

impl IndexMut<TriangleId> for TriangleArena {
    #[inline]
    fn index_mut(&mut self, id: TriangleId) -> &mut Triangle {
        &mut self.triangles[id]
    }
}

impl TriangleArena {
    pub fn push(&mut self, triangle: Triangle) -> TriangleId {
        self.triangles.push(triangle);
        self.triangles.len() - 1
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Links `a` and `b` through their shared edge.
    pub fn mark_neighbor(&mut self, a: TriangleId, b: TriangleId) -> Result<(), TriangulationError> {
        let [a0, a1, a2] = self[a].points;
        let other = &self[b];

        let (slot, p, q) = if other.contains_edge(a1, a2) {
            (0, a1, a2)
        } else if other.contains_edge(a0, a2) {
            (1, a0, a2)
        } else if other.contains_edge(a0, a1) {
            (2, a0, a1)
        } else {
            return Err(TriangulationError::InvariantViolation(
                "neighbor triangles do not share an edge",
            ));
        };

        let other_slot = other
            .edge_index(p, q)
            .ok_or(TriangulationError::InvariantViolation("shared edge lookup failed"))?;
        self[a].neighbors[slot] = Some(b);
        self[b].neighbors[other_slot] = Some(a);
        Ok(())
    }

    /// The vertex of `t` facing `other` across their shared edge, seen from `p` in `other`.
    pub fn opposite_point(
        &self,
        t: TriangleId,
        other: TriangleId,
        p: usize,
    ) -> Result<usize, TriangulationError> {
        self[t].point_cw(self[other].point_cw(p)?)
    }

    /// Flips the diagonal shared by `t` and `ot`, where `p` and `op` are the vertices
    /// of `t` and `ot` facing that diagonal.
    pub fn rotate_pair(
        &mut self,
        t: TriangleId,
        p: usize,
        ot: TriangleId,
        op: usize,
    ) -> Result<(), TriangulationError> {
        let (t_ccw, t_cw) = (self[t].ccw_slot(p)?, self[t].cw_slot(p)?);
        let (ot_ccw, ot_cw) = (self[ot].ccw_slot(op)?, self[ot].cw_slot(op)?);

        let n1 = self[t].neighbors[t_ccw];
        let n2 = self[t].neighbors[t_cw];
        let n3 = self[ot].neighbors[ot_ccw];
        let n4 = self[ot].neighbors[ot_cw];

        let ce = [
            self[t].constrained[t_ccw],
            self[t].constrained[t_cw],
            self[ot].constrained[ot_ccw],
            self[ot].constrained[ot_cw],
        ];
        let de = [
            self[t].delaunay[t_ccw],
            self[t].delaunay[t_cw],
            self[ot].delaunay[ot_ccw],
            self[ot].delaunay[ot_cw],
        ];

        self[t].rotate(p, op)?;
        self[ot].rotate(op, p)?;

        let (ot_ccw_p, t_cw_p) = (self[ot].ccw_slot(p)?, self[t].cw_slot(p)?);
        let (t_ccw_op, ot_cw_op) = (self[t].ccw_slot(op)?, self[ot].cw_slot(op)?);

        self[ot].delaunay[ot_ccw_p] = de[0];
        self[t].delaunay[t_cw_p] = de[1];
        self[t].delaunay[t_ccw_op] = de[2];
        self[ot].delaunay[ot_cw_op] = de[3];

        self[ot].constrained[ot_ccw_p] = ce[0];
        self[t].constrained[t_cw_p] = ce[1];
        self[t].constrained[t_ccw_op] = ce[2];
        self[ot].constrained[ot_cw_op] = ce[3];

        self[t].neighbors = [None; 3];
        self[ot].neighbors = [None; 3];

        if let Some(n1) = n1 {
            self.mark_neighbor(ot, n1)?;
        }
        if let Some(n2) = n2 {
            self.mark_neighbor(t, n2)?;
        }
        if let Some(n3) = n3 {
            self.mark_neighbor(t, n3)?;
        }
        if let Some(n4) = n4 {
            self.mark_neighbor(ot, n4)?;
        }

        self.mark_neighbor(t, ot)
    }
}
