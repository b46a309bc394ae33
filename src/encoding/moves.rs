//! Elementary moves between triangulations.
//!
//! Each move knows its source and target triangulation, how to push
//! lamination coordinates from one to the other, and how to produce its
//! inverse in constant time from data captured at construction. Moves are
//! immutable and cheap to clone: triangulations and bulky tables sit behind
//! `Arc`.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::algs::crush::{self, CrushData};
use crate::algs::flip_rule::{self, SquareWeights};
use crate::algs::twist;
use crate::config::EngineConfig;
use crate::encoding::{same_triangulation, Encoding};
use crate::lamination::arc::MultiArc;
use crate::lamination::curve::Curve;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::label_map::LabelMap;
use crate::topology::triangulation::Triangulation;

/// Coordinate transport across one move.
pub trait Transport {
    fn source(&self) -> &Arc<Triangulation>;
    fn target(&self) -> &Arc<Triangulation>;
    /// Coordinates on the target of a lamination known to live on the source.
    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError>;
    /// The move undoing this one.
    fn inverse(&self) -> Move;
}

fn triangle_inequality(x: i64, y: i64, z: i64) -> bool {
    x <= y + z && y <= z + x && z <= x + y
}

/// New diagonal coordinate for the flip of `square`.
///
/// Squares that look locally like a multicurve must have even triangle
/// totals and must not produce a negative coordinate.
fn flipped_coordinate(lamination: &Lamination, square: &[Edge; 5]) -> Result<i64, SurfaceError> {
    let w = lamination.square_weights(square);
    let [a, b, c, d, e] = w;
    let curve_like =
        w.iter().all(|&x| x >= 0) && triangle_inequality(e, a, b) && triangle_inequality(e, c, d);
    let edge = square[4];
    if curve_like && ((e + a + b) % 2 != 0 || (e + c + d) % 2 != 0) {
        return Err(SurfaceError::Unrealizable { edge, reason: "odd triangle total" });
    }
    let (case, new_e) = flip_rule::flipped_weight(SquareWeights::new(w));
    if curve_like && new_e < 0 {
        log::debug!("flip of {edge} ({case}) on {w:?} left a negative coordinate");
        return Err(SurfaceError::Unrealizable {
            edge,
            reason: "flip produced a negative coordinate",
        });
    }
    Ok(new_e)
}

// -----------------------------------------------------------------------------
// Edge flips
// -----------------------------------------------------------------------------

/// Flip of a single edge.
#[derive(Clone)]
pub struct EdgeFlip {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    square: [Edge; 5],
    reverse_square: [Edge; 5],
}

impl EdgeFlip {
    pub fn new(source: Arc<Triangulation>, edge: Edge) -> Result<Self, SurfaceError> {
        let square = source.square(edge)?;
        let (flipped, _) = source.flip(edge)?;
        let reverse_square = flipped.square(!edge)?;
        Ok(EdgeFlip {
            source,
            target: Arc::new(flipped),
            square,
            reverse_square,
        })
    }

    /// The flipped edge, as labelled in the source.
    pub fn edge(&self) -> Edge {
        self.square[4]
    }

    pub fn square(&self) -> [Edge; 5] {
        self.square
    }
}

impl Transport for EdgeFlip {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let new_e = flipped_coordinate(lamination, &self.square)?;
        let mut weights = lamination.weights().to_vec();
        weights[self.edge().index()] = new_e;
        Ok(weights)
    }

    fn inverse(&self) -> Move {
        Move::EdgeFlip(EdgeFlip {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            square: self.reverse_square,
            reverse_square: self.square,
        })
    }
}

/// Simultaneous flip of edges no two of which share a triangle.
#[derive(Clone)]
pub struct MultiEdgeFlip {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    squares: Arc<[[Edge; 5]]>,
    reverse_squares: Arc<[[Edge; 5]]>,
}

impl MultiEdgeFlip {
    pub fn new(source: Arc<Triangulation>, edges: &[Edge]) -> Result<Self, SurfaceError> {
        let mut owner: HashMap<usize, Edge> = HashMap::with_capacity(2 * edges.len());
        let mut squares = Vec::with_capacity(edges.len());
        for &edge in edges {
            squares.push(source.square(edge)?);
            for t in [source.triangle_of(edge), source.triangle_of(!edge)] {
                if let Some(&prev) = owner.get(&t) {
                    return Err(SurfaceError::AdjacentEdges(prev, edge));
                }
                owner.insert(t, edge);
            }
        }
        let mut current = (*source).clone();
        for &edge in edges {
            current = current.flip(edge)?.0;
        }
        let reverse_squares = edges
            .iter()
            .map(|&edge| current.square(!edge))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultiEdgeFlip {
            source,
            target: Arc::new(current),
            squares: squares.into(),
            reverse_squares: reverse_squares.into(),
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.squares.iter().map(|sq| sq[4])
    }
}

impl Transport for MultiEdgeFlip {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let mut weights = lamination.weights().to_vec();
        for square in self.squares.iter() {
            weights[square[4].index()] = flipped_coordinate(lamination, square)?;
        }
        Ok(weights)
    }

    fn inverse(&self) -> Move {
        Move::MultiEdgeFlip(MultiEdgeFlip {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            squares: Arc::clone(&self.reverse_squares),
            reverse_squares: Arc::clone(&self.squares),
        })
    }
}

// -----------------------------------------------------------------------------
// Isometries
// -----------------------------------------------------------------------------

/// A relabeling carrying the source triangles onto the target ones.
#[derive(Clone)]
pub struct Isometry {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    map: Arc<LabelMap>,
    inverse_map: Arc<LabelMap>,
}

impl Isometry {
    pub fn new(
        source: Arc<Triangulation>,
        target: Arc<Triangulation>,
        map: LabelMap,
    ) -> Result<Self, SurfaceError> {
        if source.relabel(&map)? != *target {
            return Err(SurfaceError::NotIsometric);
        }
        let inverse_map = Arc::new(map.inverse());
        Ok(Isometry { source, target, map: Arc::new(map), inverse_map })
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.map
    }
}

impl Transport for Isometry {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        Ok(self
            .target
            .positive_edges()
            .map(|e| lamination.get(self.inverse_map.get(e)))
            .collect())
    }

    fn inverse(&self) -> Move {
        Move::Isometry(Isometry {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            map: Arc::clone(&self.inverse_map),
            inverse_map: Arc::clone(&self.map),
        })
    }
}

// -----------------------------------------------------------------------------
// Pachner moves
// -----------------------------------------------------------------------------

/// Subdivision of one triangle by a new vertex of degree three.
#[derive(Clone)]
pub struct Pachner13 {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    corners: [Edge; 3],
    new_edges: [Edge; 3],
}

impl Pachner13 {
    pub fn new(source: Arc<Triangulation>, triangle: usize) -> Result<Self, SurfaceError> {
        let corners = source.triangle(triangle)?.edges();
        let (target, new_edges) = source.pachner_1_3(triangle)?;
        Ok(Pachner13 { source, target: Arc::new(target), corners, new_edges })
    }

    /// The edges `s, t, u` added by the subdivision.
    pub fn new_edges(&self) -> [Edge; 3] {
        self.new_edges
    }
}

impl Transport for Pachner13 {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let duals = self.corners.map(|e| lamination.dual_weight(e));
        if duals.iter().any(|&d| d < 0) {
            return Err(SurfaceError::TerminalArcs("subdivided triangle holds terminal arcs"));
        }
        let mut weights = lamination.weights().to_vec();
        weights.extend(duals);
        Ok(weights)
    }

    fn inverse(&self) -> Move {
        Move::Pachner31(Pachner31 {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            corners: self.corners,
            new_edges: self.new_edges,
        })
    }
}

/// Removal of a degree-three vertex added by [`Pachner13`].
#[derive(Clone)]
pub struct Pachner31 {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    corners: [Edge; 3],
    new_edges: [Edge; 3],
}

impl Transport for Pachner31 {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        if self.new_edges.iter().any(|&e| lamination.get(e) < 0) {
            return Err(SurfaceError::TerminalArcs("removed edges carry arcs"));
        }
        let mut weights = lamination.weights().to_vec();
        weights.truncate(self.target.zeta());
        Ok(weights)
    }

    fn inverse(&self) -> Move {
        Move::Pachner13(Pachner13 {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            corners: self.corners,
            new_edges: self.new_edges,
        })
    }
}

// -----------------------------------------------------------------------------
// Crush and lift
// -----------------------------------------------------------------------------

/// Crushing and lifting can wrap strands round a puncture; those
/// components are dropped from the image.
fn without_peripheral(target: &Arc<Triangulation>, weights: Vec<i64>) -> Vec<i64> {
    Lamination::from_parts(Arc::clone(target), weights).remove_peripheral().into_weights()
}

/// Collapse along a short non-isolating curve.
#[derive(Clone)]
pub struct Crush {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    data: Arc<CrushData>,
}

impl Crush {
    /// `curve` must be short; isolating curves are rejected.
    pub fn new(curve: &Curve) -> Result<Self, SurfaceError> {
        let (target, data) = crush::prepare(curve)?;
        Ok(Crush {
            source: Arc::clone(curve.triangulation()),
            target: Arc::new(target),
            data: Arc::new(data),
        })
    }

    pub fn data(&self) -> &CrushData {
        &self.data
    }
}

impl Transport for Crush {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let weights = crush::crush_weights(&self.data, lamination);
        Ok(without_peripheral(&self.target, weights))
    }

    fn inverse(&self) -> Move {
        Move::Lift(Lift {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            data: Arc::clone(&self.data),
        })
    }
}

/// Linear map back from a crushed triangulation.
#[derive(Clone)]
pub struct Lift {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    data: Arc<CrushData>,
}

impl Lift {
    pub fn matrix(&self) -> Vec<Vec<i64>> {
        crush::lift_matrix(&self.data)
    }
}

impl Transport for Lift {
    fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let weights = crush::lift_weights(&self.data, lamination);
        Ok(without_peripheral(&self.target, weights))
    }

    fn inverse(&self) -> Move {
        Move::Crush(Crush {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            data: Arc::clone(&self.data),
        })
    }
}

// -----------------------------------------------------------------------------
// Twist short-cut
// -----------------------------------------------------------------------------

/// A power of the Dehn twist about a short curve, as one move.
#[derive(Clone)]
pub struct Twist {
    curve: Curve,
    step: Arc<Encoding>,
    inverse_step: Arc<Encoding>,
    power: i64,
    accelerate: bool,
}

impl Twist {
    /// `curve` must be short.
    pub fn new(curve: Curve, power: i64, config: &EngineConfig) -> Result<Self, SurfaceError> {
        let step = twist::twist_step(&curve)?;
        let inverse_step = step.inverse();
        Ok(Twist::from_step(curve, step, inverse_step, power, config))
    }

    /// A twist whose one-step encoding and its inverse are already built.
    pub(crate) fn from_step(
        curve: Curve,
        step: Encoding,
        inverse_step: Encoding,
        power: i64,
        config: &EngineConfig,
    ) -> Twist {
        Twist {
            curve,
            step: Arc::new(step),
            inverse_step: Arc::new(inverse_step),
            power,
            accelerate: config.accelerate_twists,
        }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn power(&self) -> i64 {
        self.power
    }

    /// The same twist raised to `power`, sharing the one-step encodings.
    pub fn with_power(&self, power: i64) -> Twist {
        Twist { power, ..self.clone() }
    }

    /// The one-step twist encoding this move short-cuts.
    pub fn step(&self) -> &Encoding {
        &self.step
    }
}

impl Transport for Twist {
    fn source(&self) -> &Arc<Triangulation> {
        self.curve.triangulation()
    }

    fn target(&self) -> &Arc<Triangulation> {
        self.curve.triangulation()
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let (fwd, bwd) = if self.power >= 0 {
            (&*self.step, &*self.inverse_step)
        } else {
            (&*self.inverse_step, &*self.step)
        };
        let n = self.power.unsigned_abs();
        let image = if self.accelerate {
            twist::accelerated_power(fwd, bwd, self.curve.lamination(), n, lamination)?
        } else {
            twist::literal_power(fwd, n, lamination)?
        };
        Ok(image.into_weights())
    }

    fn inverse(&self) -> Move {
        Move::Twist(self.with_power(-self.power))
    }
}

// -----------------------------------------------------------------------------
// Half twists
// -----------------------------------------------------------------------------

/// A twist about a curve, run inside a triangulation where the curve is short.
struct ConjugatedTwist {
    conjugator: Encoding,
    inverse_conjugator: Encoding,
    twist: Twist,
}

impl ConjugatedTwist {
    fn new(curve: Curve, config: &EngineConfig) -> Result<Self, SurfaceError> {
        let (short, conjugator) = curve.shorten_with(config)?;
        Ok(ConjugatedTwist {
            inverse_conjugator: conjugator.inverse(),
            conjugator,
            twist: Twist::new(short, 1, config)?,
        })
    }

    fn apply_power(&self, power: i64, lamination: &Lamination) -> Result<Lamination, SurfaceError> {
        if power == 0 {
            return Ok(lamination.clone());
        }
        let inside = self.conjugator.apply(lamination)?;
        let twisted = Move::Twist(self.twist.with_power(power)).apply(&inside)?;
        self.inverse_conjugator.apply(&twisted)
    }
}

/// Flips edges away from the vertex of `edge` until `edge` is all that
/// leaves it.
fn isolate_vertex(mut encoding: Encoding, edge: Edge) -> Result<Encoding, SurfaceError> {
    let bound = 2 * encoding.target().zeta();
    let mut steps = 0;
    while encoding.target().vertex_degree(edge) > 1 {
        if steps >= bound {
            return Err(SurfaceError::StepBoundExceeded { algorithm: "half twist", bound });
        }
        let next = encoding.target().corner(edge)[2];
        encoding = encoding.flip(next)?;
        steps += 1;
    }
    Ok(encoding)
}

/// A power of the half twist swapping the two ends of a short arc.
///
/// The square of the half twist is the Dehn twist about the boundary of the
/// arc's neighbourhood, so only odd powers run the one-step encoding and the
/// rest goes through the accelerated twist.
#[derive(Clone)]
pub struct HalfTwist {
    arc: MultiArc,
    step: Arc<Encoding>,
    boundary: Option<Arc<ConjugatedTwist>>,
    power: i64,
}

impl HalfTwist {
    /// `arc` must be a single edge arc joining two distinct punctures.
    pub fn new(arc: MultiArc, power: i64, config: &EngineConfig) -> Result<Self, SurfaceError> {
        let weights = arc.lamination().weights();
        if weights.iter().filter(|&&w| w != 0).count() != 1 || !weights.contains(&-1) {
            return Err(SurfaceError::NotShort(format!("{weights:?} is not a single edge arc")));
        }
        let edge = arc.parallel()?;
        let source = Arc::clone(arc.triangulation());
        if source.vertex_of(edge) == source.vertex_of(!edge) {
            return Err(SurfaceError::ArcIsALoop(edge));
        }
        let conjugator = isolate_vertex(Encoding::identity(Arc::clone(&source)), edge)?;
        let half = isolate_vertex(Encoding::identity(Arc::clone(conjugator.target())), !edge)?;
        let map = half.target().find_isometry(half.source(), &[(edge, !edge)])?;
        let close = Move::isometry(Arc::clone(half.target()), Arc::clone(half.source()), map)?;
        let half = half.then_move(close)?;
        let step = conjugator.then(&half)?.then(&conjugator.inverse())?;

        let boundary = arc.boundary_with(config)?;
        let boundary = if boundary.is_empty() {
            None
        } else {
            Some(Arc::new(ConjugatedTwist::new(Curve::new(boundary)?, config)?))
        };
        log::debug!("half twist about {edge}: step of {} moves", step.len());
        Ok(HalfTwist { arc, step: Arc::new(step), boundary, power })
    }

    pub fn arc(&self) -> &MultiArc {
        &self.arc
    }

    pub fn power(&self) -> i64 {
        self.power
    }

    /// The same half twist raised to `power`, sharing the one-step encoding.
    pub fn with_power(&self, power: i64) -> HalfTwist {
        HalfTwist { power, ..self.clone() }
    }

    /// The one-step half twist encoding.
    pub fn step(&self) -> &Encoding {
        &self.step
    }
}

impl Transport for HalfTwist {
    fn source(&self) -> &Arc<Triangulation> {
        self.arc.triangulation()
    }

    fn target(&self) -> &Arc<Triangulation> {
        self.arc.triangulation()
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        let mut current = lamination.clone();
        if self.power.rem_euclid(2) == 1 {
            current = self.step.apply(&current)?;
        }
        if let Some(boundary) = &self.boundary {
            current = boundary.apply_power(self.power.div_euclid(2), &current)?;
        }
        Ok(current.into_weights())
    }

    fn inverse(&self) -> Move {
        Move::HalfTwist(self.with_power(-self.power))
    }
}

// -----------------------------------------------------------------------------
// The move enum
// -----------------------------------------------------------------------------

/// One step of an [`Encoding`].
#[derive(Clone)]
pub enum Move {
    EdgeFlip(EdgeFlip),
    MultiEdgeFlip(MultiEdgeFlip),
    Isometry(Isometry),
    Pachner13(Pachner13),
    Pachner31(Pachner31),
    Crush(Crush),
    Lift(Lift),
    Twist(Twist),
    HalfTwist(HalfTwist),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Move::EdgeFlip($m) => $body,
            Move::MultiEdgeFlip($m) => $body,
            Move::Isometry($m) => $body,
            Move::Pachner13($m) => $body,
            Move::Pachner31($m) => $body,
            Move::Crush($m) => $body,
            Move::Lift($m) => $body,
            Move::Twist($m) => $body,
            Move::HalfTwist($m) => $body,
        }
    };
}

impl Move {
    pub fn flip(source: Arc<Triangulation>, edge: Edge) -> Result<Move, SurfaceError> {
        EdgeFlip::new(source, edge).map(Move::EdgeFlip)
    }

    pub fn multi_flip(source: Arc<Triangulation>, edges: &[Edge]) -> Result<Move, SurfaceError> {
        MultiEdgeFlip::new(source, edges).map(Move::MultiEdgeFlip)
    }

    pub fn isometry(
        source: Arc<Triangulation>,
        target: Arc<Triangulation>,
        map: LabelMap,
    ) -> Result<Move, SurfaceError> {
        Isometry::new(source, target, map).map(Move::Isometry)
    }

    pub fn pachner(source: Arc<Triangulation>, triangle: usize) -> Result<Move, SurfaceError> {
        Pachner13::new(source, triangle).map(Move::Pachner13)
    }

    /// Pushes `lamination` across the move.
    pub fn apply(&self, lamination: &Lamination) -> Result<Lamination, SurfaceError> {
        if !same_triangulation(lamination.triangulation(), self.source()) {
            return Err(SurfaceError::TriangulationMismatch("lamination is not on the move's source"));
        }
        let weights = self.transport(lamination)?;
        log::trace!("{self}: {:?} -> {weights:?}", lamination.weights());
        Ok(Lamination::from_parts(Arc::clone(self.target()), weights))
    }

    pub fn is_flip(&self) -> bool {
        matches!(self, Move::EdgeFlip(_) | Move::MultiEdgeFlip(_))
    }
}

impl Transport for Move {
    fn source(&self) -> &Arc<Triangulation> {
        dispatch!(self, m => m.source())
    }

    fn target(&self) -> &Arc<Triangulation> {
        dispatch!(self, m => m.target())
    }

    fn transport(&self, lamination: &Lamination) -> Result<Vec<i64>, SurfaceError> {
        dispatch!(self, m => m.transport(lamination))
    }

    fn inverse(&self) -> Move {
        dispatch!(self, m => m.inverse())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::EdgeFlip(m) => write!(f, "Flip({})", m.edge()),
            Move::MultiEdgeFlip(m) => {
                f.write_str("MultiFlip(")?;
                for (i, e) in m.edges().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str(")")
            }
            Move::Isometry(_) => f.write_str("Isometry"),
            Move::Pachner13(m) => write!(f, "Pachner13({})", m.new_edges[0]),
            Move::Pachner31(m) => write!(f, "Pachner31({})", m.new_edges[0]),
            Move::Crush(m) => write!(f, "Crush({})", m.data.parallel),
            Move::Lift(m) => write!(f, "Lift({})", m.data.parallel),
            Move::Twist(m) => write!(f, "Twist^{}", m.power),
            Move::HalfTwist(m) => write!(f, "HalfTwist^{}", m.power),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Arc<Triangulation> {
        Arc::new(Triangulation::new([[0, 1, 2], [!0, !1, !2]]).unwrap())
    }

    fn s_0_4() -> Arc<Triangulation> {
        Arc::new(Triangulation::new([[-6, -1, 0], [-5, 2, 5], [-4, -3, 4], [-2, 1, 3]]).unwrap())
    }

    fn lam(t: &Arc<Triangulation>, w: Vec<i64>) -> Lamination {
        Lamination::new(Arc::clone(t), w).unwrap()
    }

    #[test]
    fn flip_and_its_inverse() {
        let t = torus();
        let m = Move::flip(Arc::clone(&t), Edge::new(0)).unwrap();
        let l = lam(&t, vec![1, 1, 0]);
        let image = m.apply(&l).unwrap();
        // Generic square [1, 0, 1, 0, 1]: max(2, 0) - 1.
        assert_eq!(image.weights(), &[1, 1, 0]);
        let back = m.inverse().apply(&image).unwrap();
        assert_eq!(back, l);
        assert_eq!(m.to_string(), "Flip(0)");
    }

    #[test]
    fn odd_squares_are_unrealizable() {
        let t = torus();
        let m = Move::flip(Arc::clone(&t), Edge::new(0)).unwrap();
        let err = m.apply(&lam(&t, vec![1, 1, 1])).unwrap_err();
        assert!(matches!(err, SurfaceError::Unrealizable { .. }));
        assert!(err.is_assumption());
    }

    #[test]
    fn wrong_triangulation_is_a_contract_error() {
        let m = Move::flip(torus(), Edge::new(0)).unwrap();
        let l = Lamination::empty(s_0_4());
        assert!(matches!(m.apply(&l), Err(SurfaceError::TriangulationMismatch(_))));
    }

    #[test]
    fn isometry_transport() {
        let t = torus();
        let rotate = LabelMap::from_pairs(
            3,
            [(0, 1), (1, 2), (2, 0)]
                .into_iter()
                .flat_map(|(a, b)| [(Edge::new(a), Edge::new(b)), (Edge::new(!a), Edge::new(!b))]),
        )
        .unwrap();
        let m = Move::isometry(Arc::clone(&t), Arc::clone(&t), rotate).unwrap();
        let image = m.apply(&lam(&t, vec![1, 1, 0])).unwrap();
        assert_eq!(image.weights(), &[0, 1, 1]);
        assert_eq!(m.inverse().apply(&image).unwrap().weights(), &[1, 1, 0]);
    }

    #[test]
    fn multi_flip_rejects_adjacent_edges() {
        let t = s_0_4();
        let flippable: Vec<Edge> = t.positive_edges().filter(|&e| t.is_flippable(e)).collect();
        let (e, f) = (flippable[0], flippable[1]);
        let shares = [t.triangle_of(e), t.triangle_of(!e)]
            .iter()
            .any(|x| [t.triangle_of(f), t.triangle_of(!f)].contains(x));
        let result = Move::multi_flip(Arc::clone(&t), &[e, f]);
        if shares {
            assert!(matches!(result, Err(SurfaceError::AdjacentEdges(_, _))));
        } else {
            assert!(result.is_ok());
        }
        assert!(matches!(
            Move::multi_flip(Arc::clone(&t), &[e, e]),
            Err(SurfaceError::AdjacentEdges(_, _))
        ));
    }

    #[test]
    fn pachner_round_trip() {
        let t = s_0_4();
        let m = Move::pachner(Arc::clone(&t), 1).unwrap();
        let l = lam(&t, vec![1, 1, 0, 2, 2, 2]);
        let up = m.apply(&l).unwrap();
        assert_eq!(up.weights().len(), 9);
        assert!(up.is_multicurve());
        assert_eq!(m.inverse().apply(&up).unwrap(), l);
    }

    #[test]
    fn pachner_rejects_terminal_arcs() {
        let t = torus();
        // Two strands along edge 0 end at the corner opposite it.
        let l = lam(&t, vec![2, 0, 0]);
        assert_eq!(l.dual_weight(Edge::new(0)), -2);
        let m = Move::pachner(Arc::clone(&t), 1).unwrap();
        assert!(matches!(m.apply(&l), Err(SurfaceError::TerminalArcs(_))));
    }
}
