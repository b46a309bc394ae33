//! Dehn twists about short curves.
//!
//! The one-step twist about a short curve with parallel edge `a` flips the
//! edge opposite `a` once per strand crossing the far side of `a`'s triangle
//! and closes up with the isometry back to the starting triangulation.
//!
//! Raising it to a power `n` literally costs `n` applications. The short-cut
//! watches the orbit of a lamination `L`: once consecutive differences
//! `fwd(L) - L` and `L - bwd(L)` agree and are a multiple `m c` of the curve,
//! the orbit is an arithmetic progression. For `m > 0` it stays one forever
//! and the answer is read off directly; for `m < 0` the progression runs only
//! until the orbit turns round, so the largest safe jump is found by doubling
//! and bisection, each candidate checked by two backward steps. The number of
//! encoding evaluations is logarithmic in `n` plus a short transient.
//!
//! Shortening uses the same run search backwards: a lamination twisted many
//! times about a weight-two curve is untwisted in one move.

use std::sync::Arc;

use hashbrown::HashSet;

use crate::encoding::moves::Move;
use crate::encoding::Encoding;
use crate::lamination::curve::Curve;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::triangulation::Triangulation;

/// The encoding of a single left twist about a short curve.
pub fn twist_step(curve: &Curve) -> Result<Encoding, SurfaceError> {
    let source = curve.triangulation();
    let a = curve.parallel()?;
    let flips = (curve.weight() - 2).max(1);
    let mut encoding = Encoding::identity(source.clone());
    for _ in 0..flips {
        let edge = encoding.target().corner(a)[2];
        encoding = encoding.flip(edge)?;
    }
    let map = encoding.target().find_isometry(source, &[(a, a)])?;
    let close = Move::isometry(encoding.target().clone(), source.clone(), map)?;
    encoding.then_move(close)
}

/// `Some(m)` if `d == m * c` coordinate-wise.
pub(crate) fn multiple_of(d: &[i64], c: &[i64]) -> Option<i64> {
    let mut ratio = None;
    for (&x, &y) in d.iter().zip(c) {
        if y == 0 {
            if x != 0 {
                return None;
            }
            continue;
        }
        if x % y != 0 {
            return None;
        }
        let q = x / y;
        match ratio {
            None => ratio = Some(q),
            Some(m) if m != q => return None,
            Some(_) => {}
        }
    }
    ratio
}

fn difference(x: &Lamination, y: &Lamination) -> Vec<i64> {
    x.weights().iter().zip(y.weights()).map(|(a, b)| a - b).collect()
}

/// `lamination + k * step`, failing on overflow.
fn jump(lamination: &Lamination, step: &[i64], k: u64) -> Result<Lamination, SurfaceError> {
    let k = i64::try_from(k).map_err(|_| SurfaceError::PowerOverflow { base: 1, exponent: i64::MAX })?;
    let weights = lamination
        .weights()
        .iter()
        .zip(step)
        .map(|(&x, &y)| {
            y.checked_mul(k)
                .and_then(|ky| x.checked_add(ky))
                .ok_or(SurfaceError::PowerOverflow { base: y, exponent: k })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Lamination::from_parts(lamination.triangulation().clone(), weights))
}

/// Whether `y` looks `bwd`-linear: `y - bwd(y)` and `bwd(y) - bwd(bwd(y))`
/// both equal `step`. Coordinates `bwd` cannot carry count as off the run.
fn falls_linearly(bwd: &Encoding, y: &Lamination, step: &[i64]) -> Result<bool, SurfaceError> {
    let y1 = match bwd.apply(y) {
        Ok(y1) => y1,
        Err(SurfaceError::Unrealizable { .. }) => return Ok(false),
        Err(e) => return Err(e),
    };
    if difference(y, &y1) != step {
        return Ok(false);
    }
    let y2 = match bwd.apply(&y1) {
        Ok(y2) => y2,
        Err(SurfaceError::Unrealizable { .. }) => return Ok(false),
        Err(e) => return Err(e),
    };
    Ok(difference(&y1, &y2) == step)
}

/// Largest `j <= limit` with `start + j * step` still on the arithmetic run
/// leading back to `start`, found by doubling and bisection; 0 if none.
pub(crate) fn falling_run(
    bwd: &Encoding,
    start: &Lamination,
    step: &[i64],
    limit: u64,
) -> Result<u64, SurfaceError> {
    let ok = |j: u64| -> Result<bool, SurfaceError> {
        falls_linearly(bwd, &jump(start, step, j)?, step)
    };
    let (mut lo, mut hi) = (0u64, 1u64);
    while hi <= limit && ok(hi)? {
        lo = hi;
        hi = hi.saturating_mul(2);
    }
    hi = hi.min(limit.saturating_add(1));
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if ok(mid)? {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// Every weight-two curve of `triangulation`. Such a curve crosses two
/// edges once each, and those edges share both of the triangles they bound.
pub(crate) fn short_curves(triangulation: &Arc<Triangulation>) -> Vec<Curve> {
    let zeta = triangulation.zeta();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut curves = Vec::new();
    for x in triangulation.positive_edges() {
        let [_, p, q] = triangulation.corner(x);
        let [_, r, s] = triangulation.corner(!x);
        for y in [p, q] {
            let i = y.index();
            if i == x.index() || (i != r.index() && i != s.index()) {
                continue;
            }
            if !seen.insert((x.index().min(i), x.index().max(i))) {
                continue;
            }
            let mut weights = vec![0; zeta];
            weights[x.index()] = 1;
            weights[i] = 1;
            let candidate = Lamination::from_parts(Arc::clone(triangulation), weights);
            if let Ok(curve) = Curve::new(candidate) {
                curves.push(curve);
            }
        }
    }
    curves
}

/// Applies `fwd` to `lamination` `n` times, one application at a time.
pub fn literal_power(fwd: &Encoding, n: u64, lamination: &Lamination) -> Result<Lamination, SurfaceError> {
    let mut current = lamination.clone();
    for _ in 0..n {
        current = fwd.apply(&current)?;
    }
    Ok(current)
}

/// Applies `fwd` to `lamination` `n` times using the orbit short-cut.
///
/// `bwd` must be the inverse of `fwd`, and `curve` the short curve both twist
/// about, on the same triangulation.
pub fn accelerated_power(
    fwd: &Encoding,
    bwd: &Encoding,
    curve: &Lamination,
    mut n: u64,
    lamination: &Lamination,
) -> Result<Lamination, SurfaceError> {
    let mut current = lamination.clone();
    let mut evaluations = 0usize;
    while n > 0 {
        let next = fwd.apply(&current)?;
        let prev = bwd.apply(&current)?;
        evaluations += 2;
        let f = difference(&next, &current);
        if f.iter().all(|&x| x == 0) {
            // Disjoint from the curve: every power fixes it.
            return Ok(current);
        }
        let g = difference(&current, &prev);
        if f == g {
            match multiple_of(&f, curve.weights()) {
                Some(m) if m > 0 => {
                    log::debug!("twist orbit is linear after {evaluations} evaluations; jumping {n}");
                    return jump(&current, &f, n);
                }
                Some(m) if m < 0 => {
                    // The orbit falls towards the curve; it is linear only up to
                    // the turning point.
                    let run = falling_run(bwd, &current, &f, n)?;
                    if run > 0 {
                        log::trace!("twist orbit jump of {run} towards the curve");
                        current = jump(&current, &f, run)?;
                        n -= run;
                        continue;
                    }
                }
                _ => {}
            }
        }
        current = next;
        n -= 1;
    }
    log::debug!("twist power finished after {evaluations} evaluations");
    Ok(current)
}
