//! Canonical oriented triangles.

use std::fmt;

use crate::topology::edge::Edge;

/// Three oriented edges listed anticlockwise.
///
/// Stored in canonical rotation: the smallest label comes first. Two
/// triangles compare equal iff they bound the same oriented edges in the same
/// cyclic order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    edges: [Edge; 3],
}

impl Triangle {
    /// Builds a triangle, rotating it into canonical form.
    pub fn new(edges: [Edge; 3]) -> Self {
        let first = (0..3).min_by_key(|&i| edges[i]).unwrap_or(0);
        Triangle {
            edges: [edges[first], edges[(first + 1) % 3], edges[(first + 2) % 3]],
        }
    }

    /// Builds a triangle from raw labels.
    pub fn from_labels(labels: [i32; 3]) -> Self {
        Self::new(labels.map(Edge::new))
    }

    #[inline]
    pub fn edges(&self) -> [Edge; 3] {
        self.edges
    }

    #[inline]
    pub fn labels(&self) -> [i32; 3] {
        self.edges.map(Edge::label)
    }

    /// Unoriented indices of the three sides.
    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        self.edges.map(Edge::index)
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    /// Position of `edge` among the sides, if present.
    pub fn side_of(&self, edge: Edge) -> Option<usize> {
        self.edges.iter().position(|&e| e == edge)
    }

    /// The sides rotated so that `edge` comes first.
    pub fn rotated_to(&self, edge: Edge) -> Option<[Edge; 3]> {
        self.side_of(edge)
            .map(|i| [self.edges[i], self.edges[(i + 1) % 3], self.edges[(i + 2) % 3]])
    }

    /// Relabels every side through `f`, re-canonicalising.
    pub fn map(&self, mut f: impl FnMut(Edge) -> Edge) -> Triangle {
        Triangle::new([f(self.edges[0]), f(self.edges[1]), f(self.edges[2])])
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }
}

impl fmt::Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.edges[0], self.edges[1], self.edges[2])
    }
}
