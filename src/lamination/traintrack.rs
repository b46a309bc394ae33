//! Splitting a lamination into its components.
//!
//! Triangles holding strands round all three corners are subdivided first,
//! so every complementary region reaches a vertex. The result is flipped
//! until each component shows up in a single place: an arc lies along an
//! edge with negative weight, and a curve runs once round a square whose
//! two outer sides are glued. The components are then pulled back along
//! the same moves.

use std::sync::Arc;

use crate::algs::shorten::{self, ShortenStrategy};
use crate::config::EngineConfig;
use crate::encoding::moves::Move;
use crate::encoding::Encoding;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

/// Flips a subdivided lamination until its components can be read off.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct TrainTrackStrategy;

/// The square `[a, b, c, d, e]` carries a curve running round `b` and `e`.
fn holds_curve(lamination: &Lamination, square: &[Edge; 5]) -> bool {
    let [a, b, _, d, e] = *square;
    b == !d
        && lamination.dual_weight(a) > 0
        && lamination.dual_weight(b) == 0
        && lamination.dual_weight(e) == 0
}

impl ShortenStrategy for TrainTrackStrategy {
    const NAME: &'static str = "train track";

    fn is_short(&self, lamination: &Lamination) -> bool {
        lamination.triangulation().edges().all(|e| self.score(lamination, e) == 0)
    }

    fn score(&self, lamination: &Lamination, edge: Edge) -> u8 {
        let Ok(square) = lamination.triangulation().square(edge) else {
            return 0;
        };
        if lamination.get(edge) <= 0 || holds_curve(lamination, &square) {
            return 0;
        }
        let [a, b, c, d, e] = square;
        let [da, db, dc, dd, de] = [a, b, c, d, e].map(|x| lamination.dual_weight(x));
        if a == !c && da == 0 && db > 0 && de == 0 {
            return 0;
        }
        if de > 0 || da < 0 || db < 0 {
            return 1;
        }
        if (da == 0 && db == 0) || (da == 0 && de == 0) || (db == 0 && de == 0) {
            return if (da > 0 && dc > 0) || (db > 0 && dd > 0) { 2 } else { 3 };
        }
        4
    }
}

/// Subdivides every triangle with strands round all three corners.
fn subdivide(lamination: &Lamination) -> Result<Encoding, SurfaceError> {
    let source = lamination.triangulation();
    let mut encoding = Encoding::identity(Arc::clone(source));
    for triangle in source.triangles() {
        let edges = triangle.edges();
        if edges.iter().all(|&e| lamination.dual_weight(e) > 0) {
            let target = Arc::clone(encoding.target());
            let index = target.triangle_of(edges[0]);
            encoding = encoding.then_move(Move::pachner(target, index)?)?;
        }
    }
    Ok(encoding)
}

fn indicator(triangulation: &Arc<Triangulation>, edges: &[Edge], value: i64) -> Lamination {
    let mut weights = vec![0; triangulation.zeta()];
    for e in edges {
        weights[e.index()] = value;
    }
    Lamination::from_parts(Arc::clone(triangulation), weights)
}

/// Components of `lamination` with their multiplicities, arcs and curves
/// alike. Peripheral components are dropped first.
pub(crate) fn components(
    lamination: &Lamination,
    config: &EngineConfig,
) -> Result<Vec<(Lamination, i64)>, SurfaceError> {
    let lamination = lamination.remove_peripheral();
    if lamination.is_empty() {
        return Ok(Vec::new());
    }
    let subdivision = subdivide(&lamination)?;
    let track = subdivision.apply(&lamination)?;
    let (short, flips) = shorten::shorten(&TrainTrackStrategy, &track, config)?;
    let back = subdivision.then(&flips)?.inverse();

    let t = short.triangulation();
    let mut found = Vec::new();
    for edge in t.positive_edges() {
        let w = short.get(edge);
        if w < 0 {
            found.push((indicator(t, &[edge], -1), -w));
        }
        if let Ok(square) = t.square(edge) {
            if holds_curve(&short, &square) {
                found.push((indicator(t, &[square[1], edge], 1), w));
            }
        }
    }
    let components = found
        .into_iter()
        .map(|(component, m)| Ok((back.apply(&component)?, m)))
        .collect::<Result<Vec<_>, SurfaceError>>()?;

    let mut total = vec![0i64; lamination.weights().len()];
    for (component, m) in &components {
        for (t, w) in total.iter_mut().zip(component.weights()) {
            *t += m * w;
        }
    }
    crate::ensure_invariant!(
        total == lamination.weights(),
        "components {total:?} do not add up to {:?}",
        lamination.weights()
    );
    log::trace!("{} components of {:?}", components.len(), lamination.weights());
    Ok(components)
}
