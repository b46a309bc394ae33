//! Integral laminations in edge coordinates.
//!
//! A [`Lamination`] is a vector of integers, one per edge of a fixed
//! triangulation, recording how often the lamination meets each edge. A
//! negative coordinate `-k` means the edge itself is `k` parallel arcs of the
//! lamination. The vector is only meaningful together with the triangulation
//! it was measured on, so the two travel together and every transformation
//! returns a new value on the new triangulation.
//!
//! Not every vector is realizable. Malformed input is a caller error: it is
//! only detected where an algorithm trips over it (see
//! [`SurfaceError::Unrealizable`]), or up front through
//! [`Lamination::validate_realizable`].

pub mod arc;
mod components;
pub mod curve;
pub mod multicurve;
pub mod pattern;
pub(crate) mod traintrack;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::algs::flip_rule;
use crate::config::EngineConfig;
use crate::debug_invariants::DebugInvariants;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

use self::pattern::LocalPattern;

/// Edge coordinates of a lamination on a specific triangulation.
#[derive(Clone)]
pub struct Lamination {
    triangulation: Arc<Triangulation>,
    weights: Vec<i64>,
}

impl Lamination {
    /// Wraps coordinates measured on `triangulation`, in edge-index order.
    pub fn new(triangulation: Arc<Triangulation>, weights: Vec<i64>) -> Result<Self, SurfaceError> {
        if weights.len() != triangulation.zeta() {
            return Err(SurfaceError::LengthMismatch {
                expected: triangulation.zeta(),
                found: weights.len(),
            });
        }
        Ok(Lamination { triangulation, weights })
    }

    /// Callers guarantee `weights.len() == triangulation.zeta()`.
    pub(crate) fn from_parts(triangulation: Arc<Triangulation>, weights: Vec<i64>) -> Self {
        debug_assert_eq!(weights.len(), triangulation.zeta());
        Lamination { triangulation, weights }
    }

    /// The lamination with no components.
    pub fn empty(triangulation: Arc<Triangulation>) -> Self {
        let zeta = triangulation.zeta();
        Lamination::from_parts(triangulation, vec![0; zeta])
    }

    /// The arc running along edge `index`.
    pub fn edge_arc(triangulation: Arc<Triangulation>, index: usize) -> Result<Self, SurfaceError> {
        triangulation.check_edge(Edge::positive(index))?;
        let mut weights = vec![0; triangulation.zeta()];
        weights[index] = -1;
        Ok(Lamination::from_parts(triangulation, weights))
    }

    /// One arc per edge. These are the test laminations for mapping class
    /// equality: a mapping class is determined by where it sends them.
    pub fn edge_arcs(triangulation: &Arc<Triangulation>) -> Vec<Lamination> {
        (0..triangulation.zeta())
            .map(|i| {
                let mut weights = vec![0; triangulation.zeta()];
                weights[i] = -1;
                Lamination::from_parts(Arc::clone(triangulation), weights)
            })
            .collect()
    }

    #[inline]
    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.triangulation
    }

    #[inline]
    pub fn weights(&self) -> &[i64] {
        &self.weights
    }

    pub fn into_weights(self) -> Vec<i64> {
        self.weights
    }

    /// Coordinate on `edge` (either orientation).
    ///
    /// # Panics
    /// If `edge` is not an edge of the triangulation.
    #[inline]
    pub fn get(&self, edge: Edge) -> i64 {
        self.weights[edge.index()]
    }

    /// Whether both live on the same triangulation (by identity or structure).
    pub fn same_triangulation(&self, other: &Triangulation) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.triangulation), other) || *self.triangulation == *other
    }

    // -------------------------------------------------------------------------
    // Weights
    // -------------------------------------------------------------------------

    /// Geometric intersection with the triangulation: the sum of positive coordinates.
    pub fn weight(&self) -> i64 {
        self.weights.iter().map(|&w| w.max(0)).sum()
    }

    /// Number of components in the triangle of `edge` that cut off the corner
    /// opposite `edge`; negative for terminal arcs ending at that corner.
    pub fn dual_weight(&self, edge: Edge) -> i64 {
        let [x, y, z] = self.triangulation.corner(edge);
        flip_rule::dual_weight(self.get(x), self.get(y), self.get(z))
    }

    /// Components crossing the corner at the head of `edge`.
    pub fn side_weight(&self, edge: Edge) -> i64 {
        self.dual_weight(self.triangulation.corner(edge)[1])
    }

    /// Coordinates of the square around `edge`, in square order.
    pub(crate) fn square_weights(&self, square: &[Edge; 5]) -> [i64; 5] {
        square.map(|e| self.get(e))
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.weights.iter().all(|&w| w == 0)
    }

    /// Non-empty, non-negative and realizable as a union of curves.
    pub fn is_multicurve(&self) -> bool {
        !self.is_empty() && self.validate_realizable().is_ok()
    }

    /// Whether some component is an arc: a carried edge or strands ending at a vertex.
    pub fn has_arcs(&self) -> bool {
        self.weights.iter().any(|&w| w < 0)
            || self.triangulation.edges().any(|e| self.dual_weight(e) < 0)
    }

    /// Non-empty with at least one arc component. This is a cheap candidate
    /// check: it does not rule out closed components alongside the arcs.
    pub fn is_multiarc(&self) -> bool {
        !self.is_empty() && self.has_arcs()
    }

    /// Local picture inside triangle `index`.
    pub fn pattern(&self, index: usize) -> Result<LocalPattern, SurfaceError> {
        let triangle = self.triangulation.triangle(index)?;
        let duals = triangle.edges().map(|e| self.dual_weight(e));
        let carried = triangle.iter().any(|e| self.get(e) < 0);
        Ok(LocalPattern::from_parts(duals, carried))
    }

    /// Local pictures of every triangle, in triangle order.
    pub fn patterns(&self) -> Vec<LocalPattern> {
        self.triangulation
            .triangles()
            .iter()
            .map(|t| {
                let duals = t.edges().map(|e| self.dual_weight(e));
                LocalPattern::from_parts(duals, t.iter().any(|e| self.get(e) < 0))
            })
            .collect()
    }

    /// Checks the coordinates describe a (possibly empty) multicurve: every
    /// coordinate non-negative, and in every triangle an even total satisfying
    /// the triangle inequality.
    pub fn validate_realizable(&self) -> Result<(), SurfaceError> {
        if let Some(i) = self.weights.iter().position(|&w| w < 0) {
            return Err(SurfaceError::Unrealizable {
                edge: Edge::positive(i),
                reason: "negative coordinate on a multicurve",
            });
        }
        for t in self.triangulation.triangles() {
            let [x, y, z] = t.edges();
            let [a, b, c] = [x, y, z].map(|e| self.get(e));
            if (a + b + c) % 2 != 0 {
                return Err(SurfaceError::Unrealizable { edge: x, reason: "odd triangle total" });
            }
            for (e, w, rest) in [(x, a, b + c), (y, b, a + c), (z, c, a + b)] {
                if w > rest {
                    return Err(SurfaceError::Unrealizable {
                        edge: e,
                        reason: "triangle inequality fails",
                    });
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Peripheral components
    // -------------------------------------------------------------------------

    /// Number of peripheral curves around each vertex.
    pub fn peripheral_multiplicities(&self) -> Vec<i64> {
        self.triangulation
            .vertices()
            .iter()
            .map(|cycle| cycle.iter().map(|&e| self.side_weight(e)).min().unwrap_or(0).max(0))
            .collect()
    }

    /// Whether some component is a curve around a puncture.
    pub fn has_peripheral(&self) -> bool {
        self.peripheral_multiplicities().iter().any(|&m| m > 0)
    }

    /// Non-empty and consisting only of peripheral curves.
    pub fn is_peripheral(&self) -> bool {
        !self.is_empty() && self.remove_peripheral().is_empty()
    }

    /// The lamination with every peripheral component deleted.
    pub fn remove_peripheral(&self) -> Lamination {
        let mut weights = self.weights.clone();
        let vertices = self.triangulation.vertices();
        for (cycle, m) in vertices.iter().zip(self.peripheral_multiplicities()) {
            if m > 0 {
                for e in cycle {
                    weights[e.index()] -= m;
                }
            }
        }
        Lamination::from_parts(Arc::clone(&self.triangulation), weights)
    }

    /// Number of components of a multicurve, counting multiplicity.
    ///
    /// Counts orbits of the interval pairings at the corners, so the cost
    /// grows with the number of edges and the logarithm of the weight.
    pub fn num_components(&self) -> Result<usize, SurfaceError> {
        self.validate_realizable()?;
        let (total, pairings) = components::corner_pairings(self);
        Ok(components::count_orbits(total, pairings) as usize)
    }

    /// Components with their multiplicities, arcs and curves alike.
    /// Peripheral components are not reported.
    pub fn components(&self) -> Result<Vec<(Lamination, i64)>, SurfaceError> {
        self.components_with(&EngineConfig::default())
    }

    pub fn components_with(
        &self,
        config: &EngineConfig,
    ) -> Result<Vec<(Lamination, i64)>, SurfaceError> {
        self.validate_realizable()?;
        traintrack::components(self, config)
    }

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    /// `self + k * other`, on the same triangulation.
    pub fn scaled_add(&self, other: &Lamination, k: i64) -> Result<Lamination, SurfaceError> {
        if !self.same_triangulation(&other.triangulation) {
            return Err(SurfaceError::TriangulationMismatch("adding laminations"));
        }
        let weights = self
            .weights
            .iter()
            .zip(&other.weights)
            .map(|(&x, &y)| {
                y.checked_mul(k)
                    .and_then(|ky| x.checked_add(ky))
                    .ok_or(SurfaceError::PowerOverflow { base: y, exponent: k })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Lamination::from_parts(Arc::clone(&self.triangulation), weights))
    }

    /// Coordinate-wise difference `self - other`.
    pub fn difference(&self, other: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        if !self.same_triangulation(&other.triangulation) {
            return Err(SurfaceError::TriangulationMismatch("subtracting laminations"));
        }
        Ok(self.weights.iter().zip(&other.weights).map(|(x, y)| x - y).collect())
    }
}

// -----------------------------------------------------------------------------
// Equality, hashing, formatting
// -----------------------------------------------------------------------------

impl PartialEq for Lamination {
    fn eq(&self, other: &Self) -> bool {
        self.weights == other.weights && self.same_triangulation(&other.triangulation)
    }
}

impl Eq for Lamination {}

impl Hash for Lamination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.weights.hash(state);
    }
}

impl fmt::Debug for Lamination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lamination{:?}", self.weights)
    }
}

impl fmt::Display for Lamination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.weights)
    }
}

impl DebugInvariants for Lamination {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Lamination");
    }

    fn validate_invariants(&self) -> Result<(), SurfaceError> {
        crate::ensure_invariant!(
            self.weights.len() == self.triangulation.zeta(),
            "{} coordinates on a triangulation with {} edges",
            self.weights.len(),
            self.triangulation.zeta()
        );
        Ok(())
    }
}
