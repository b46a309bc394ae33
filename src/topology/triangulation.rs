//! Immutable ideal triangulations of punctured surfaces.
//!
//! # Expected invariants
//! - Every oriented label of `0..zeta` and its reverse bounds exactly one
//!   triangle side, so every edge borders two triangle sides (possibly of the
//!   same triangle, for self-glued edges).
//! - Triangles are stored canonically rotated and sorted, so structural
//!   equality is equality of the triangle lists.
//! - Lookups (`corner`, `triangle_of`, `vertex_of`) are dense arrays indexed by
//!   label slot and are computed once at construction.
//!
//! Triangulations are never mutated. [`Triangulation::flip`],
//! [`Triangulation::relabel`] and [`Triangulation::pachner_1_3`] return fresh
//! instances together with the correspondence between old and new labels.

use std::fmt;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use once_cell::sync::OnceCell;

use crate::debug_invariants::DebugInvariants;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::gluing::GluingTable;
use crate::topology::label_map::LabelMap;
use crate::topology::triangle::Triangle;

/// A combinatorial ideal triangulation.
#[derive(Clone)]
pub struct Triangulation {
    triangles: Vec<Triangle>,
    zeta: usize,
    /// slot -> index into `triangles`.
    triangle_of: Vec<usize>,
    /// slot -> containing triangle rotated to start at that label.
    corners: Vec<[Edge; 3]>,
    vertices: Vec<Vec<Edge>>,
    /// slot -> index into `vertices`.
    vertex_of: Vec<usize>,
    components: OnceCell<Vec<Vec<Edge>>>,
}

impl Triangulation {
    /// Builds a triangulation from raw label triples.
    ///
    /// ```rust
    /// # use flip_graph::topology::triangulation::Triangulation;
    /// let torus = Triangulation::new([[0, 1, 2], [!0, !1, !2]]).unwrap();
    /// assert_eq!(torus.zeta(), 3);
    /// assert_eq!(torus.num_vertices(), 1);
    /// ```
    pub fn new(triangles: impl IntoIterator<Item = [i32; 3]>) -> Result<Self, SurfaceError> {
        Self::from_gluing(&GluingTable::new(triangles.into_iter().collect()))
    }

    /// Builds a triangulation from a gluing table, validating it first.
    pub fn from_gluing(table: &GluingTable) -> Result<Self, SurfaceError> {
        let zeta = table.validate()?;
        let triangles = table.triangles.iter().map(|&t| Triangle::from_labels(t)).collect();
        let triangulation = Self::build(zeta, triangles);
        crate::debug_invariants!(triangulation.validate_invariants(), "Triangulation::from_gluing");
        Ok(triangulation)
    }

    /// Assembles the lookup tables. The triangles must use every label once.
    pub(crate) fn build(zeta: usize, mut triangles: Vec<Triangle>) -> Self {
        triangles.sort();
        let mut triangle_of = vec![0; 2 * zeta];
        let mut corners = vec![[Edge::new(0); 3]; 2 * zeta];
        for (t, tri) in triangles.iter().enumerate() {
            let [x, y, z] = tri.edges();
            for corner in [[x, y, z], [y, z, x], [z, x, y]] {
                let slot = corner[0].slot(zeta);
                triangle_of[slot] = t;
                corners[slot] = corner;
            }
        }

        // Walk round each vertex: the label following `l` is `!corner(l)[2]`.
        let mut vertex_of = vec![usize::MAX; 2 * zeta];
        let mut vertices = Vec::new();
        for start in Self::labels(zeta) {
            if vertex_of[start.slot(zeta)] != usize::MAX {
                continue;
            }
            let id = vertices.len();
            let mut cycle = vec![start];
            vertex_of[start.slot(zeta)] = id;
            loop {
                let last = cycle[cycle.len() - 1];
                let next = !corners[last.slot(zeta)][2];
                if vertex_of[next.slot(zeta)] != usize::MAX {
                    break;
                }
                vertex_of[next.slot(zeta)] = id;
                cycle.push(next);
            }
            vertices.push(cycle);
        }

        Triangulation {
            triangles,
            zeta,
            triangle_of,
            corners,
            vertices,
            vertex_of,
            components: OnceCell::new(),
        }
    }

    fn labels(zeta: usize) -> impl Iterator<Item = Edge> {
        let z = zeta as i32;
        (-z..z).map(Edge::new)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Number of edges.
    #[inline]
    pub fn zeta(&self) -> usize {
        self.zeta
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Canonical triangles, sorted.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Every oriented label in increasing order (`!(zeta-1)` .. `zeta-1`).
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        Self::labels(self.zeta)
    }

    /// The labels `0..zeta`.
    pub fn positive_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.zeta).map(Edge::positive)
    }

    #[inline]
    pub fn contains(&self, edge: Edge) -> bool {
        edge.index() < self.zeta
    }

    /// Errors with [`SurfaceError::UnknownEdge`] if `edge` is not a label here.
    pub fn check_edge(&self, edge: Edge) -> Result<(), SurfaceError> {
        if self.contains(edge) {
            Ok(())
        } else {
            Err(SurfaceError::UnknownEdge { edge, zeta: self.zeta })
        }
    }

    /// The triangle containing `edge`, rotated so that `edge` comes first.
    ///
    /// # Panics
    /// If `edge` is not a label of this triangulation.
    #[inline]
    pub fn corner(&self, edge: Edge) -> [Edge; 3] {
        self.corners[edge.slot(self.zeta)]
    }

    /// Index of the triangle containing `edge`.
    ///
    /// # Panics
    /// If `edge` is not a label of this triangulation.
    #[inline]
    pub fn triangle_of(&self, edge: Edge) -> usize {
        self.triangle_of[edge.slot(self.zeta)]
    }

    pub fn triangle(&self, index: usize) -> Result<&Triangle, SurfaceError> {
        self.triangles.get(index).ok_or(SurfaceError::UnknownTriangle {
            index,
            count: self.triangles.len(),
        })
    }

    /// Vertex cycles. Each label appears in exactly one cycle.
    #[inline]
    pub fn vertices(&self) -> &[Vec<Edge>] {
        &self.vertices
    }

    /// Index of the vertex cycle containing `edge`.
    #[inline]
    pub fn vertex_of(&self, edge: Edge) -> usize {
        self.vertex_of[edge.slot(self.zeta)]
    }

    /// Length of the vertex cycle containing `edge`.
    #[inline]
    pub fn vertex_degree(&self, edge: Edge) -> usize {
        self.vertices[self.vertex_of(edge)].len()
    }

    // -------------------------------------------------------------------------
    // Flips
    // -------------------------------------------------------------------------

    /// An edge is flippable iff it borders two distinct triangles.
    pub fn is_flippable(&self, edge: Edge) -> bool {
        self.contains(edge) && self.triangle_of(edge) != self.triangle_of(!edge)
    }

    /// The quadrilateral around a flippable edge: `[a, b, c, d, edge]` where
    /// `(edge, a, b)` and `(!edge, c, d)` are its two corners.
    pub fn square(&self, edge: Edge) -> Result<[Edge; 5], SurfaceError> {
        self.check_edge(edge)?;
        if !self.is_flippable(edge) {
            return Err(SurfaceError::NotFlippable(edge));
        }
        let [_, a, b] = self.corner(edge);
        let [_, c, d] = self.corner(!edge);
        Ok([a, b, c, d, edge])
    }

    /// Flips `edge`, replacing the diagonal of its square by the other one.
    ///
    /// Labels are preserved, so the returned correspondence is the identity;
    /// the new diagonal keeps the label of the old one.
    pub fn flip(&self, edge: Edge) -> Result<(Triangulation, LabelMap), SurfaceError> {
        let [a, b, c, d, e] = self.square(edge)?;
        let (t0, t1) = (self.triangle_of(e), self.triangle_of(!e));
        let mut triangles: Vec<Triangle> = self
            .triangles
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != t0 && i != t1)
            .map(|(_, t)| *t)
            .collect();
        let (p, q) = if e.is_positive() { (e, !e) } else { (!e, e) };
        triangles.push(Triangle::new([p, d, a]));
        triangles.push(Triangle::new([q, b, c]));
        let flipped = Self::build(self.zeta, triangles);
        crate::debug_invariants!(flipped.validate_invariants(), "Triangulation::flip");
        Ok((flipped, LabelMap::identity(self.zeta)))
    }

    /// Applies a relabeling to every triangle.
    pub fn relabel(&self, map: &LabelMap) -> Result<Triangulation, SurfaceError> {
        if map.zeta() != self.zeta {
            return Err(SurfaceError::LengthMismatch {
                expected: self.zeta,
                found: map.zeta(),
            });
        }
        if !map.respects_orientation() {
            return Err(SurfaceError::InvalidGluing(
                "relabeling does not commute with reversal".into(),
            ));
        }
        let triangles = self.triangles.iter().map(|t| t.map(|e| map.get(e))).collect();
        Ok(Self::build(self.zeta, triangles))
    }

    /// Subdivides triangle `index` by a new vertex joined to its corners.
    ///
    /// For the canonical triangle `(p, q, r)` the new edges `s, t, u` get
    /// labels `zeta, zeta + 1, zeta + 2` and the triangle is replaced by
    /// `(p, !u, t)`, `(q, !s, u)` and `(r, !t, s)`. Edge `s` runs to the
    /// corner opposite `p`, `t` opposite `q`, `u` opposite `r`.
    pub fn pachner_1_3(&self, index: usize) -> Result<(Triangulation, [Edge; 3]), SurfaceError> {
        let [p, q, r] = self.triangle(index)?.edges();
        let z = self.zeta;
        let [s, t, u] = [Edge::positive(z), Edge::positive(z + 1), Edge::positive(z + 2)];
        let mut triangles: Vec<Triangle> = self
            .triangles
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, t)| *t)
            .collect();
        triangles.extend([
            Triangle::new([p, !u, t]),
            Triangle::new([q, !s, u]),
            Triangle::new([r, !t, s]),
        ]);
        Ok((Self::build(z + 3, triangles), [s, t, u]))
    }

    // -------------------------------------------------------------------------
    // Topology
    // -------------------------------------------------------------------------

    /// Labels of each connected component, each list sorted.
    pub fn components(&self) -> &[Vec<Edge>] {
        self.components.get_or_init(|| {
            let n = 2 * self.zeta;
            let mut parent: Vec<usize> = (0..n).collect();
            fn find(parent: &mut [usize], mut x: usize) -> usize {
                while parent[x] != x {
                    parent[x] = parent[parent[x]];
                    x = parent[x];
                }
                x
            }
            let union = |parent: &mut Vec<usize>, x: Edge, y: Edge| {
                let (rx, ry) = (find(parent, x.slot(self.zeta)), find(parent, y.slot(self.zeta)));
                parent[rx] = ry;
            };
            for e in self.positive_edges() {
                union(&mut parent, e, !e);
            }
            for t in &self.triangles {
                let [x, y, z] = t.edges();
                union(&mut parent, x, y);
                union(&mut parent, x, z);
            }
            self.edges()
                .map(|e| (find(&mut parent, e.slot(self.zeta)), e))
                .into_group_map()
                .into_values()
                .map(|mut labels| {
                    labels.sort();
                    labels
                })
                .sorted()
                .collect()
        })
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() == 1
    }

    /// `V - E + F` of the closed surface obtained by filling the punctures.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - self.zeta as i64 + self.triangles.len() as i64
    }

    /// `(genus, punctures)` of each component, in component order.
    pub fn surface_types(&self) -> Vec<(usize, usize)> {
        self.components()
            .iter()
            .map(|component| {
                let v = self
                    .vertices
                    .iter()
                    .filter(|cycle| component.binary_search(&cycle[0]).is_ok())
                    .count();
                let e = component.len() / 2;
                // 2 - 2g = v - e + 2e/3
                let genus = (2 + e / 3).saturating_sub(v) / 2;
                (genus, v)
            })
            .collect()
    }

    /// Total genus over all components.
    pub fn genus(&self) -> usize {
        self.surface_types().iter().map(|&(g, _)| g).sum()
    }

    /// Number of punctures (vertices).
    pub fn num_punctures(&self) -> usize {
        self.vertices.len()
    }

    /// Upper bound on the order of a periodic mapping class of this surface.
    ///
    /// Per component: `4g + 2` for g > 1, `max(v, 6)` for g = 1, `v` for g = 0.
    /// Components of equal type may be permuted, contributing `m!`.
    pub fn max_order(&self) -> usize {
        fn order(genus: usize, punctures: usize) -> usize {
            match genus {
                0 => punctures,
                1 => punctures.max(6),
                g => 4 * g + 2,
            }
        }
        self.surface_types()
            .into_iter()
            .counts()
            .into_iter()
            .map(|((g, v), m)| order(g, v) * (1..=m).product::<usize>())
            .product()
    }
}

// -----------------------------------------------------------------------------
// Equality, hashing, formatting
// -----------------------------------------------------------------------------

impl PartialEq for Triangulation {
    fn eq(&self, other: &Self) -> bool {
        self.zeta == other.zeta && self.triangles == other.triangles
    }
}

impl Eq for Triangulation {}

impl Hash for Triangulation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triangles.hash(state);
    }
}

impl fmt::Debug for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.triangles.iter()).finish()
    }
}

impl DebugInvariants for Triangulation {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Triangulation");
    }

    fn validate_invariants(&self) -> Result<(), SurfaceError> {
        if 2 * self.zeta != 3 * self.triangles.len() {
            return Err(SurfaceError::InvariantViolation(format!(
                "{} triangles cannot have {} edges",
                self.triangles.len(),
                self.zeta
            )));
        }
        for e in self.edges() {
            let corner = self.corner(e);
            if corner[0] != e || !self.triangles[self.triangle_of(e)].contains(e) {
                return Err(SurfaceError::InvariantViolation(format!(
                    "corner lookup for {e} is stale"
                )));
            }
        }
        let covered: usize = self.vertices.iter().map(Vec::len).sum();
        if covered != 2 * self.zeta {
            return Err(SurfaceError::InvariantViolation(
                "vertex cycles do not partition the labels".into(),
            ));
        }
        Ok(())
    }
}
