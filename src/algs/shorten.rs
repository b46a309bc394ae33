//! Flip-graph descent towards a short representative.
//!
//! A [`ShortenStrategy`] says when a lamination is short and scores each
//! candidate flip; [`shorten`] greedily flips the first best-scoring edge
//! until the lamination is short. Candidates are the two sides of the last
//! flipped square that the next flip most likely needs, followed by every
//! label in increasing order, which makes the descent deterministic.
//!
//! With [`EngineConfig::accelerate_twists`] the descent also looks for a
//! weight-two curve the lamination winds around many times, and undoes
//! those windings with a single twist move. Attempts back off exponentially
//! while they find nothing, so the number of moves no longer grows with the
//! number of windings.
//!
//! The descent is guarded by [`EngineConfig::shorten_bound`]: exceeding it
//! is an internal failure, never an infinite loop.

use crate::algs::flip_rule::{self, SquareWeights};
use crate::algs::twist;
use crate::config::EngineConfig;
use crate::encoding::moves::{Move, Twist};
use crate::encoding::Encoding;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;

/// How to recognise and approach a short lamination.
pub trait ShortenStrategy {
    /// Name used in logs and guard errors.
    const NAME: &'static str;

    fn is_short(&self, lamination: &Lamination) -> bool;

    /// Priority of flipping `edge`; 0 means never.
    fn score(&self, lamination: &Lamination, edge: Edge) -> u8;

    /// Error reported when no flip scores above 0 but the lamination is not short.
    fn stuck(&self, lamination: &Lamination) -> SurfaceError {
        SurfaceError::InvariantViolation(format!(
            "{} shortening stalled at {:?}",
            Self::NAME,
            lamination.weights()
        ))
    }
}

/// Shortening for curves: drive the weight down to 2 (or to a single
/// triangle of total 4 for isolating curves).
#[derive(Copy, Clone, Debug, Default)]
pub struct CurveStrategy;

impl ShortenStrategy for CurveStrategy {
    const NAME: &'static str = "curve";

    fn is_short(&self, lamination: &Lamination) -> bool {
        if lamination.weight() == 2 {
            return true;
        }
        if !lamination.weights().iter().all(|&w| w == 0 || w == 2) {
            return false;
        }
        let heavy = lamination
            .triangulation()
            .triangles()
            .iter()
            .filter(|t| t.iter().map(|e| lamination.get(e)).sum::<i64>() == 4)
            .count();
        heavy == 1
    }

    fn score(&self, lamination: &Lamination, edge: Edge) -> u8 {
        let Ok(square) = lamination.triangulation().square(edge) else {
            return 0;
        };
        let [a, b, c, d, e] = lamination.square_weights(&square);
        if e == 0 {
            return 0;
        }
        if (a + c).max(b + d) == e {
            return 3;
        }
        if lamination.dual_weight(edge) > 0 {
            return 0;
        }
        if lamination.dual_weight(square[0]) > 0 && lamination.dual_weight(square[1]) > 0 {
            return 2;
        }
        1
    }
}

/// Shortening for multiarcs: flip away every strand crossing an edge, so
/// that each arc becomes an edge of the triangulation.
#[derive(Copy, Clone, Debug, Default)]
pub struct ArcStrategy;

impl ShortenStrategy for ArcStrategy {
    const NAME: &'static str = "arc";

    fn is_short(&self, lamination: &Lamination) -> bool {
        lamination.weight() == 0
    }

    fn score(&self, lamination: &Lamination, edge: Edge) -> u8 {
        let flippable = lamination.triangulation().is_flippable(edge);
        u8::from(flippable && lamination.dual_weight(edge) < 0)
    }

    fn stuck(&self, lamination: &Lamination) -> SurfaceError {
        SurfaceError::NotAMultiArc(format!(
            "{:?} has closed components left after flipping away its arcs",
            lamination.weights()
        ))
    }
}

/// Flips `lamination` to a short representative.
///
/// Returns the short lamination and the encoding carrying the input to it.
pub fn shorten<S: ShortenStrategy>(
    strategy: &S,
    lamination: &Lamination,
    config: &EngineConfig,
) -> Result<(Lamination, Encoding), SurfaceError> {
    let bound = config.shorten_bound(lamination.triangulation().zeta(), lamination.weight());
    let mut current = lamination.clone();
    let mut conjugator = Encoding::identity(lamination.triangulation().clone());
    let mut extra: Vec<Edge> = Vec::new();
    let mut steps = 0usize;
    let (mut next_untwist, mut backoff) = (0usize, 1usize);

    while !strategy.is_short(&current) {
        if steps >= bound {
            log::debug!("{} shortening hit its guard of {bound} flips", S::NAME);
            return Err(SurfaceError::StepBoundExceeded { algorithm: S::NAME, bound });
        }
        if config.accelerate_twists && steps >= next_untwist {
            if let Some(untwisting) = untwist(&current, config)? {
                log::trace!("untwisting {} times at step {steps}", untwisting.power());
                let untwisting = Move::Twist(untwisting);
                current = untwisting.apply(&current)?;
                conjugator = conjugator.then_move(untwisting)?;
                extra.clear();
                steps += 1;
                (next_untwist, backoff) = (steps, 1);
                continue;
            }
            next_untwist = steps + backoff;
            backoff = backoff.saturating_mul(2);
        }
        let mut best: Option<(u8, Edge)> = None;
        for edge in extra.iter().copied().chain(current.triangulation().edges()) {
            let score = strategy.score(&current, edge);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, edge));
            }
        }
        let edge = match best {
            Some((score, edge)) if score > 0 => edge,
            _ => return Err(strategy.stuck(&current)),
        };
        let flip = Move::flip(current.triangulation().clone(), edge)?;
        current = flip.apply(&current)?;
        conjugator = conjugator.then_move(flip)?;
        let square = current.triangulation().square(edge)?;
        extra = vec![square[0], square[3]];
        steps += 1;
    }

    log::debug!(
        "{} shortening took {steps} flips, weight {} -> {}",
        S::NAME,
        lamination.weight(),
        current.weight()
    );
    Ok((current, conjugator))
}

/// A twist move undoing at least two windings of `lamination` about one
/// weight-two curve, if some such curve carries a run of them.
fn untwist(lamination: &Lamination, config: &EngineConfig) -> Result<Option<Twist>, SurfaceError> {
    for curve in twist::short_curves(lamination.triangulation()) {
        let step = twist::twist_step(&curve)?;
        let inverse = step.inverse();
        let next = step.apply(lamination)?;
        let prev = inverse.apply(lamination)?;
        let f = next.difference(lamination)?;
        if f.iter().all(|&x| x == 0) || f != lamination.difference(&prev)? {
            continue;
        }
        let Some(m) = twist::multiple_of(&f, curve.lamination().weights()) else {
            continue;
        };
        // Orient the run so that it falls towards the curve; `bwd` climbs back.
        let (sign, down, bwd) = if m < 0 {
            (1, f, &inverse)
        } else {
            (-1, f.iter().map(|x| -x).collect(), &step)
        };
        let limit = (lamination.weight().max(0) / (2 * m.abs())) as u64;
        let run = twist::falling_run(bwd, lamination, &down, limit)?;
        if run < 2 {
            continue;
        }
        let power = sign * run as i64;
        return Ok(Some(Twist::from_step(curve, step, inverse, power, config)));
    }
    Ok(None)
}

/// New total weight if `edge` were flipped, when it can be.
fn weight_after_flip(lamination: &Lamination, edge: Edge) -> Option<i64> {
    let square = lamination.triangulation().square(edge).ok()?;
    let weights = lamination.square_weights(&square);
    let (_, new_e) = flip_rule::flipped_weight(SquareWeights::new(weights));
    Some(lamination.weight() - weights[4].max(0) + new_e.max(0))
}

/// Flips to a local minimum of the total weight.
///
/// Each step takes the flip with the largest strict decrease, ties broken
/// by the smallest label; stops when no single flip decreases the weight.
pub fn shorten_lamination(
    lamination: &Lamination,
    config: &EngineConfig,
) -> Result<(Lamination, Encoding), SurfaceError> {
    let bound = config.shorten_bound(lamination.triangulation().zeta(), lamination.weight());
    let mut current = lamination.clone();
    let mut conjugator = Encoding::identity(lamination.triangulation().clone());
    let mut steps = 0usize;
    loop {
        let weight = current.weight();
        let best = current
            .triangulation()
            .positive_edges()
            .filter_map(|e| weight_after_flip(&current, e).map(|w| (w, e)))
            .filter(|&(w, _)| w < weight)
            .min();
        let Some((_, edge)) = best else {
            break;
        };
        if steps >= bound {
            return Err(SurfaceError::StepBoundExceeded { algorithm: "local minimum", bound });
        }
        let flip = Move::flip(current.triangulation().clone(), edge)?;
        current = flip.apply(&current)?;
        conjugator = conjugator.then_move(flip)?;
        steps += 1;
    }
    log::debug!(
        "local minimum after {steps} flips, weight {} -> {}",
        lamination.weight(),
        current.weight()
    );
    Ok((current, conjugator))
}

/// True when no single flip lowers the total weight.
pub fn is_local_minimum(lamination: &Lamination) -> bool {
    let weight = lamination.weight();
    lamination
        .triangulation()
        .positive_edges()
        .filter_map(|e| weight_after_flip(lamination, e))
        .all(|w| w >= weight)
}
