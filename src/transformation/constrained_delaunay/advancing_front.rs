//! The x-ordered frontier of the sweep.

use super::triangle::TriangleId;
use super::TriangulationError;

/// Index of a node inside its [`AdvancingFront`].
pub(crate) type NodeId = usize;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct FrontNode {
    pub vertex: usize,
    pub x: f64,
    /// The triangle covering the front between this node and the next one.
    pub triangle: Option<TriangleId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

/// A doubly-linked list of front nodes stored in an arena.
///
/// Removed nodes are unlinked but keep their own links, so a walk may step out of a
/// node right after it has been removed.
#[derive(Clone, Debug)]
pub(crate) struct AdvancingFront {
    nodes: Vec<FrontNode>,
    head: NodeId,
    search: NodeId,
}

impl AdvancingFront {
    /// A front made of three nodes, `(vertex, x)`, from left to right.
    ///
    /// The left and middle nodes are covered by `seed`.
    pub fn new(
        left: (usize, f64),
        middle: (usize, f64),
        right: (usize, f64),
        seed: TriangleId,
    ) -> Self {
        let node = |(vertex, x): (usize, f64), triangle, prev, next| FrontNode {
            vertex,
            x,
            triangle,
            prev,
            next,
        };

        Self {
            nodes: vec![
                node(left, Some(seed), None, Some(1)),
                node(middle, Some(seed), Some(0), Some(2)),
                node(right, None, Some(1), None),
            ],
            head: 0,
            search: 0,
        }
    }

    /// The leftmost node.
    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn node(&self, id: NodeId) -> &FrontNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FrontNode {
        &mut self.nodes[id]
    }

    pub fn next(&self, id: NodeId) -> Result<NodeId, TriangulationError> {
        self.nodes[id]
            .next
            .ok_or(TriangulationError::InvariantViolation("front node has no right neighbor"))
    }

    pub fn prev(&self, id: NodeId) -> Result<NodeId, TriangulationError> {
        self.nodes[id]
            .prev
            .ok_or(TriangulationError::InvariantViolation("front node has no left neighbor"))
    }

    /// Inserts a new node right after `node`.
    pub fn insert_after(
        &mut self,
        node: NodeId,
        vertex: usize,
        x: f64,
    ) -> Result<NodeId, TriangulationError> {
        let next = self.next(node)?;
        let id = self.nodes.len();
        self.nodes.push(FrontNode {
            vertex,
            x,
            triangle: None,
            prev: Some(node),
            next: Some(next),
        });
        self.nodes[node].next = Some(id);
        self.nodes[next].prev = Some(id);
        Ok(id)
    }

    /// Unlinks an inner node from the front.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TriangulationError> {
        let prev = self.prev(node)?;
        let next = self.next(node)?;
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);

        if self.search == node {
            self.search = prev;
        }
        Ok(())
    }

    /// The node with the greatest abscissa not greater than `x`.
    pub fn locate_node(&mut self, x: f64) -> Option<NodeId> {
        let mut node = self.search;

        if x < self.nodes[node].x {
            while let Some(prev) = self.nodes[node].prev {
                node = prev;
                if x >= self.nodes[node].x {
                    self.search = node;
                    return Some(node);
                }
            }
        } else {
            while let Some(next) = self.nodes[node].next {
                if x < self.nodes[next].x {
                    self.search = node;
                    return Some(node);
                }
                node = next;
            }
        }

        None
    }

    /// The node holding `vertex`, located at abscissa `x`, if it is still on the front.
    pub fn locate_point(&mut self, vertex: usize, x: f64) -> Option<NodeId> {
        let start = self.search;
        let found = if x == self.nodes[start].x {
            // Several nodes may share an abscissa for a short while.
            self.walk(start, vertex, |n| n.prev, |n| n.x == x)
                .or_else(|| self.walk(start, vertex, |n| n.next, |n| n.x == x))
        } else if x < self.nodes[start].x {
            self.walk(start, vertex, |n| n.prev, |_| true)
        } else {
            self.walk(start, vertex, |n| n.next, |_| true)
        };

        if let Some(node) = found {
            self.search = node;
        }
        found
    }

    fn walk(
        &self,
        start: NodeId,
        vertex: usize,
        step: impl Fn(&FrontNode) -> Option<NodeId>,
        keep_going: impl Fn(&FrontNode) -> bool,
    ) -> Option<NodeId> {
        let mut node = start;
        loop {
            let current = &self.nodes[node];
            if current.vertex == vertex {
                return Some(node);
            }
            if node != start && !keep_going(current) {
                return None;
            }
            node = step(current)?;
        }
    }

    /// The vertices currently on the front, from left to right.
    #[cfg(test)]
    pub fn vertices(&self) -> Vec<usize> {
        let mut result = vec![];
        let mut node = Some(self.head);
        while let Some(id) = node {
            result.push(self.nodes[id].vertex);
            node = self.nodes[id].next;
        }
        result
    }
}
