//! Simple closed curves.
//!
//! Intersection numbers and slopes are read off a short representative: the
//! curve then runs round a single edge `a`, and what the other lamination
//! does between `a` and `!a` at their common vertex counts its crossings
//! and its twisting.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::algs::shorten::{self, CurveStrategy, ShortenStrategy};
use crate::config::EngineConfig;
use crate::encoding::mapping_class::MappingClass;
use crate::encoding::moves::{Crush, Move, Twist};
use crate::encoding::Encoding;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

/// A rational slope `numerator / denominator` in lowest terms, with a
/// positive denominator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slope {
    numerator: i64,
    denominator: i64,
}

impl Slope {
    /// Fails with [`SurfaceError::UndefinedSlope`] on a zero denominator.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, SurfaceError> {
        if denominator == 0 {
            return Err(SurfaceError::UndefinedSlope);
        }
        let g = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()) as i64;
        let sign = denominator.signum();
        Ok(Slope { numerator: sign * numerator / g, denominator: sign * denominator / g })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl Ord for Slope {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.numerator) * i128::from(other.denominator);
        let rhs = i128::from(other.numerator) * i128::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Slope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A lamination seen from the short representative of a curve.
struct Winding {
    short: Curve,
    lamination: Lamination,
    /// The parallel edge of the short curve.
    a: Edge,
    /// Labels leaving the common vertex from `a` round to `!a`, `!a` excluded.
    fan: Vec<Edge>,
    /// Strands running round the vertex through the whole fan.
    around: i64,
}

impl Winding {
    fn intersection(&self) -> i64 {
        let l = &self.lamination;
        let out = self.fan.iter().map(|&e| (-l.side_weight(e)).max(0)).sum::<i64>()
            + self.fan[1..].iter().map(|&e| (-l.get(e)).max(0)).sum::<i64>();
        l.get(self.a) - 2 * self.around + out
    }
}

/// A single essential, non-peripheral simple closed curve.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Curve(Lamination);

impl Curve {
    /// Checks that `lamination` is a connected, non-peripheral multicurve.
    ///
    /// Component counting works on runs of strands, so huge weights are
    /// cheap to check.
    pub fn new(lamination: Lamination) -> Result<Self, SurfaceError> {
        if lamination.is_empty() {
            return Err(SurfaceError::NotACurve("empty lamination".into()));
        }
        lamination
            .validate_realizable()
            .map_err(|e| SurfaceError::NotACurve(e.to_string()))?;
        if lamination.has_peripheral() {
            return Err(SurfaceError::NotACurve(format!(
                "{:?} has peripheral components",
                lamination.weights()
            )));
        }
        let components = lamination.num_components()?;
        if components != 1 {
            return Err(SurfaceError::NotACurve(format!(
                "{:?} has {components} components",
                lamination.weights()
            )));
        }
        Ok(Curve(lamination))
    }

    pub fn lamination(&self) -> &Lamination {
        &self.0
    }

    pub fn into_lamination(self) -> Lamination {
        self.0
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        self.0.triangulation()
    }

    pub fn weight(&self) -> i64 {
        self.0.weight()
    }

    pub fn is_short(&self) -> bool {
        CurveStrategy.is_short(&self.0)
    }

    /// Flips to a triangulation where the curve is short.
    pub fn shorten(&self) -> Result<(Curve, Encoding), SurfaceError> {
        self.shorten_with(&EngineConfig::default())
    }

    pub fn shorten_with(&self, config: &EngineConfig) -> Result<(Curve, Encoding), SurfaceError> {
        let (short, conjugator) = shorten::shorten(&CurveStrategy, &self.0, config)?;
        Ok((Curve(short), conjugator))
    }

    /// The smallest label missed by the curve but with the curve running
    /// round the corner opposite it. Only defined for short curves.
    pub fn parallel(&self) -> Result<Edge, SurfaceError> {
        if !self.is_short() {
            return Err(SurfaceError::NotShort(format!("{:?}", self.0.weights())));
        }
        self.triangulation()
            .edges()
            .find(|&e| self.0.get(e) == 0 && self.0.dual_weight(e) > 0)
            .ok_or_else(|| {
                SurfaceError::InvariantViolation(format!(
                    "short curve {:?} has no parallel edge",
                    self.0.weights()
                ))
            })
    }

    /// Whether the curve cuts off a subsurface with no punctures.
    pub fn is_isolating(&self) -> Result<bool, SurfaceError> {
        let (short, _) = self.shorten()?;
        Ok(short.weight() > 2)
    }

    /// The Dehn twist about this curve raised to `power`.
    ///
    /// The encoding shortens the curve, applies one twist move and shortens
    /// back, so its length does not depend on `power`.
    pub fn encode_twist(&self, power: i64) -> Result<MappingClass, SurfaceError> {
        self.encode_twist_with(power, &EngineConfig::default())
    }

    pub fn encode_twist_with(
        &self,
        power: i64,
        config: &EngineConfig,
    ) -> Result<MappingClass, SurfaceError> {
        let (short, conjugator) = self.shorten_with(config)?;
        let twist = Twist::new(short, power, config)?;
        MappingClass::from_twist(conjugator, twist)
    }

    fn winding(&self, lamination: &Lamination, config: &EngineConfig) -> Result<Winding, SurfaceError> {
        if !lamination.same_triangulation(self.triangulation()) {
            return Err(SurfaceError::TriangulationMismatch("measuring against a curve"));
        }
        let (short, conjugator) = self.shorten_with(config)?;
        let lamination = conjugator.apply(lamination)?;
        let a = short.parallel()?;
        let t = short.triangulation();
        let cycle = &t.vertices()[t.vertex_of(a)];
        let start = cycle.iter().position(|&e| e == a).unwrap_or(0);
        let fan: Vec<Edge> = cycle
            .iter()
            .cycle()
            .skip(start)
            .take(cycle.len())
            .copied()
            .take_while(|&e| e != !a)
            .collect();
        crate::ensure_invariant!(
            !fan.is_empty() && fan.len() < cycle.len(),
            "parallel edge {a} of a short curve is not a loop"
        );
        let around = fan.iter().map(|&e| lamination.side_weight(e).max(0)).min().unwrap_or(0);
        Ok(Winding { short, lamination, a, fan, around })
    }

    /// Geometric intersection number with `lamination`.
    pub fn intersection(&self, lamination: &Lamination) -> Result<i64, SurfaceError> {
        self.intersection_with(lamination, &EngineConfig::default())
    }

    pub fn intersection_with(
        &self,
        lamination: &Lamination,
        config: &EngineConfig,
    ) -> Result<i64, SurfaceError> {
        Ok(self.winding(lamination, config)?.intersection())
    }

    /// How far `lamination` twists round this curve.
    ///
    /// The twist `encode_twist(1)` adds one to the slope of anything whose
    /// slope lies outside `[-1, 1]`. Fails with
    /// [`SurfaceError::UndefinedSlope`] when the two are disjoint.
    pub fn slope(&self, lamination: &Lamination) -> Result<Slope, SurfaceError> {
        self.slope_with(lamination, &EngineConfig::default())
    }

    pub fn slope_with(
        &self,
        lamination: &Lamination,
        config: &EngineConfig,
    ) -> Result<Slope, SurfaceError> {
        let winding = self.winding(lamination, config)?;
        let denominator = winding.intersection();
        if denominator == 0 {
            return Err(SurfaceError::UndefinedSlope);
        }
        let Winding { short, lamination: l, a, fan, around } = &winding;
        let e = short.triangulation().corner(*a)[2];
        let inner = if fan.len() > 2 { &fan[1..fan.len() - 1] } else { &[][..] };
        let twisting = inner.iter().map(|&x| (l.side_weight(x) - around).max(0)).min().unwrap_or(0);
        let sign = if l.side_weight(*a) > *around || l.dual_weight(e) < 0 { -1 } else { 1 };
        let slope = Slope::new(sign * twisting, denominator)?;
        if sign < 0 && short.weight() == 2 {
            // Non-isolating slopes lean right.
            return Slope::new(slope.numerator + slope.denominator, slope.denominator);
        }
        Ok(slope)
    }

    /// Encoding from this triangulation to the one crushed along the curve.
    pub fn crush(&self) -> Result<Encoding, SurfaceError> {
        self.crush_with(&EngineConfig::default())
    }

    pub fn crush_with(&self, config: &EngineConfig) -> Result<Encoding, SurfaceError> {
        let (short, conjugator) = self.shorten_with(config)?;
        let crush = Crush::new(&short)?;
        conjugator.then_move(Move::Crush(crush))
    }
}

impl TryFrom<Lamination> for Curve {
    type Error = SurfaceError;

    fn try_from(lamination: Lamination) -> Result<Self, Self::Error> {
        Curve::new(lamination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Arc<Triangulation> {
        Arc::new(Triangulation::new([[0, 1, 2], [!0, !1, !2]]).unwrap())
    }

    fn curve(t: &Arc<Triangulation>, w: Vec<i64>) -> Curve {
        Curve::new(Lamination::new(Arc::clone(t), w).unwrap()).unwrap()
    }

    #[test]
    fn construction_checks() {
        let t = torus();
        let lam = |w: Vec<i64>| Lamination::new(Arc::clone(&t), w).unwrap();
        assert!(matches!(Curve::new(lam(vec![0, 0, 0])), Err(SurfaceError::NotACurve(_))));
        assert!(matches!(Curve::new(lam(vec![2, 2, 0])), Err(SurfaceError::NotACurve(_))));
        assert!(matches!(Curve::new(lam(vec![1, 0, 0])), Err(SurfaceError::NotACurve(_))));
        assert!(Curve::try_from(lam(vec![1, 2, 1])).is_ok());
    }

    #[test]
    fn parallels_of_the_generators() {
        let t = torus();
        assert_eq!(curve(&t, vec![1, 1, 0]).parallel(), Ok(Edge::new(-3)));
        assert_eq!(curve(&t, vec![0, 1, 1]).parallel(), Ok(Edge::new(-1)));
        assert_eq!(curve(&t, vec![1, 0, 1]).parallel(), Ok(Edge::new(-2)));
        assert!(matches!(curve(&t, vec![1, 2, 1]).parallel(), Err(SurfaceError::NotShort(_))));
    }

    #[test]
    fn torus_curves_do_not_isolate() {
        let t = torus();
        assert_eq!(curve(&t, vec![1, 2, 1]).is_isolating(), Ok(false));
    }

    #[test]
    fn twist_encoding_acts_as_expected() {
        let t = torus();
        let ta = curve(&t, vec![1, 1, 0]).encode_twist(1).unwrap();
        let b = Lamination::new(Arc::clone(&t), vec![0, 1, 1]).unwrap();
        assert_eq!(ta.encoding().apply(&b).unwrap().weights(), &[1, 0, 1]);
        assert_eq!(ta.inverse().unwrap().encoding().apply(&b).unwrap().weights(), &[1, 2, 1]);
    }

    #[test]
    fn torus_generators_meet_once() {
        let t = torus();
        let a = curve(&t, vec![1, 1, 0]);
        let lam = |w: Vec<i64>| Lamination::new(Arc::clone(&t), w).unwrap();
        assert_eq!(a.intersection(&lam(vec![0, 1, 1])), Ok(1));
        assert_eq!(a.intersection(&lam(vec![1, 0, 1])), Ok(1));
        assert_eq!(a.intersection(a.lamination()), Ok(0));
        assert_eq!(a.intersection(&lam(vec![2, 2, 0])), Ok(0));
        assert_eq!(a.slope(a.lamination()), Err(SurfaceError::UndefinedSlope));
    }

    #[test]
    fn slopes_count_twists() {
        let t = torus();
        let a = curve(&t, vec![1, 1, 0]);
        let b = Lamination::new(Arc::clone(&t), vec![0, 1, 1]).unwrap();
        for n in 2..8 {
            let image = a.encode_twist(n).unwrap().encoding().apply(&b).unwrap();
            assert_eq!(image.weights(), &[n, n - 1, 1]);
            assert_eq!(a.intersection(&image), Ok(1));
            assert_eq!(a.slope(&image), Slope::new(n - 1, 1));
        }
    }

    #[test]
    fn slopes_are_reduced_and_ordered() {
        let half = Slope::new(2, 4).unwrap();
        assert_eq!((half.numerator(), half.denominator()), (1, 2));
        assert_eq!(Slope::new(3, -6), Slope::new(-1, 2));
        assert!(Slope::new(-1, 2).unwrap() < half);
        assert!(Slope::new(2, 3).unwrap() > half);
        assert_eq!(half.to_string(), "1/2");
        assert_eq!(Slope::new(1, 0), Err(SurfaceError::UndefinedSlope));
    }

    #[test]
    fn crushing_kills_the_curve() {
        let t = torus();
        let c = curve(&t, vec![1, 2, 1]);
        let crush = c.crush().unwrap();
        assert!(crush.apply(c.lamination()).unwrap().is_empty());
        assert_eq!(crush.target().num_vertices(), 3);
    }
}
