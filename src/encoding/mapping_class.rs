//! Mappings and mapping classes.
//!
//! A [`Mapping`] is an encoding between isometric triangulations, the usual
//! shape of a named generator before it is closed up. A [`MappingClass`]
//! starts and ends on the same triangulation and so forms a group under
//! composition. Equality compares the images of the edge arcs (see
//! [`Encoding::try_eq`]).
//!
//! Classes recorded as a pure Dehn twist (or half twist) remember their
//! move and power so that [`MappingClass::pow`] can use the twist short-cut
//! instead of repeating the encoding.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::encoding::moves::{HalfTwist, Move, Twist};
use crate::encoding::{same_triangulation, Encoding};
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::triangulation::Triangulation;

/// An encoding whose endpoints are isometric.
#[derive(Clone, Debug)]
pub struct Mapping {
    encoding: Encoding,
    name: Option<String>,
}

impl Mapping {
    pub fn new(encoding: Encoding) -> Result<Self, SurfaceError> {
        if !encoding.source().is_isometric_to(encoding.target()) {
            return Err(SurfaceError::NotIsometric);
        }
        Ok(Mapping { encoding, name: None })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn into_encoding(self) -> Encoding {
        self.encoding
    }
}

/// The twist-like move a class was built from.
#[derive(Clone)]
enum TwistMove {
    Full(Twist),
    Half(HalfTwist),
}

impl TwistMove {
    fn power(&self) -> i64 {
        match self {
            TwistMove::Full(t) => t.power(),
            TwistMove::Half(h) => h.power(),
        }
    }

    fn with_power(&self, power: i64) -> TwistMove {
        match self {
            TwistMove::Full(t) => TwistMove::Full(t.with_power(power)),
            TwistMove::Half(h) => TwistMove::Half(h.with_power(power)),
        }
    }

    fn to_move(&self) -> Move {
        match self {
            TwistMove::Full(t) => Move::Twist(t.clone()),
            TwistMove::Half(h) => Move::HalfTwist(h.clone()),
        }
    }
}

/// Twist data kept for the power short-cut: conjugator into the short
/// triangulation and the twist move itself.
#[derive(Clone)]
struct PureTwist {
    conjugator: Encoding,
    twist: TwistMove,
}

impl PureTwist {
    fn encoding(&self) -> Result<Encoding, SurfaceError> {
        self.conjugator
            .then(&Encoding::from_move(self.twist.to_move()))?
            .then(&self.conjugator.inverse())
    }

    fn with_power(&self, power: i64) -> PureTwist {
        PureTwist { conjugator: self.conjugator.clone(), twist: self.twist.with_power(power) }
    }
}

/// Whether `weights` are the coordinates of edge arc `i`.
fn is_edge_arc(i: usize, weights: &[i64]) -> bool {
    weights.iter().enumerate().all(|(j, &w)| w == if i == j { -1 } else { 0 })
}

/// An element of the mapping class group, as an encoding from a
/// triangulation to itself.
///
/// The images of the edge arcs are computed once, on construction. They
/// determine the class, so equality, hashing and the identity test read
/// them instead of re-running the encoding.
#[derive(Clone)]
pub struct MappingClass {
    encoding: Encoding,
    name: Option<String>,
    twist: Option<PureTwist>,
    signature: Arc<[Vec<i64>]>,
}

impl MappingClass {
    /// Fails with [`SurfaceError::NotAMappingClass`] unless source and target
    /// agree, and with the encoding's own error if it cannot carry the edge
    /// arcs.
    pub fn new(encoding: Encoding) -> Result<Self, SurfaceError> {
        if !encoding.is_mapping_class() {
            return Err(SurfaceError::NotAMappingClass);
        }
        MappingClass::from_parts(encoding, None, None)
    }

    fn from_parts(
        encoding: Encoding,
        name: Option<String>,
        twist: Option<PureTwist>,
    ) -> Result<Self, SurfaceError> {
        let signature = encoding.intersection_matrix()?;
        let zeta = encoding.source().zeta();
        crate::ensure_invariant!(
            signature.len() == zeta && signature.iter().all(|row| row.len() == zeta),
            "edge arc images of a class on {zeta} edges are not square"
        );
        Ok(MappingClass { encoding, name, twist, signature: signature.into() })
    }

    pub fn identity(triangulation: Arc<Triangulation>) -> Self {
        let signature: Vec<Vec<i64>> = Lamination::edge_arcs(&triangulation)
            .into_iter()
            .map(Lamination::into_weights)
            .collect();
        MappingClass {
            encoding: Encoding::identity(triangulation),
            name: None,
            twist: None,
            signature: signature.into(),
        }
    }

    /// The class `conjugator⁻¹ ∘ twist ∘ conjugator`, recorded as a pure twist.
    pub(crate) fn from_twist(conjugator: Encoding, twist: Twist) -> Result<Self, SurfaceError> {
        let pure = PureTwist { conjugator, twist: TwistMove::Full(twist) };
        MappingClass::from_parts(pure.encoding()?, None, Some(pure))
    }

    /// The class `conjugator⁻¹ ∘ half ∘ conjugator`, recorded as a half twist.
    pub(crate) fn from_half_twist(
        conjugator: Encoding,
        half: HalfTwist,
    ) -> Result<Self, SurfaceError> {
        let pure = PureTwist { conjugator, twist: TwistMove::Half(half) };
        MappingClass::from_parts(pure.encoding()?, None, Some(pure))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        self.encoding.source()
    }

    /// Images of the edge arcs, one row per edge.
    pub fn edge_arc_images(&self) -> &[Vec<i64>] {
        &self.signature
    }

    /// Power of the Dehn twist this class was built as, if any.
    pub fn twist_power(&self) -> Option<i64> {
        match &self.twist {
            Some(PureTwist { twist: TwistMove::Full(t), .. }) => Some(t.power()),
            _ => None,
        }
    }

    /// Power of the half twist this class was built as, if any.
    pub fn half_twist_power(&self) -> Option<i64> {
        match &self.twist {
            Some(PureTwist { twist: TwistMove::Half(h), .. }) => Some(h.power()),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Group operations
    // -------------------------------------------------------------------------

    /// `self` first, then `other`.
    pub fn then(&self, other: &MappingClass) -> Result<MappingClass, SurfaceError> {
        MappingClass::new(self.encoding.then(&other.encoding)?)
    }

    /// `self ∘ other`: `other` first.
    pub fn compose(&self, other: &MappingClass) -> Result<MappingClass, SurfaceError> {
        other.then(self)
    }

    pub fn inverse(&self) -> Result<MappingClass, SurfaceError> {
        MappingClass::from_parts(
            self.encoding.inverse(),
            self.name.as_ref().map(|n| format!("{n}^-1")),
            self.twist.as_ref().map(|t| t.with_power(-t.twist.power())),
        )
    }

    /// `self^k`. Pure twists and half twists use the short-cut, so the move
    /// count does not grow with `k`; other classes use binary powering.
    pub fn pow(&self, k: i64) -> Result<MappingClass, SurfaceError> {
        if k == 0 {
            return Ok(MappingClass::identity(Arc::clone(self.triangulation())));
        }
        if let Some(pure) = &self.twist {
            let base = pure.twist.power();
            let power = base
                .checked_mul(k)
                .ok_or(SurfaceError::PowerOverflow { base, exponent: k })?;
            let pure = pure.with_power(power);
            return MappingClass::from_parts(pure.encoding()?, None, Some(pure));
        }
        let mut exponent = k.unsigned_abs();
        let mut square = if k < 0 { self.encoding.inverse() } else { self.encoding.clone() };
        let mut result = Encoding::identity(Arc::clone(self.triangulation()));
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.then(&square)?;
            }
            exponent >>= 1;
            if exponent > 0 {
                square = square.then(&square)?;
            }
        }
        MappingClass::new(result)
    }

    // -------------------------------------------------------------------------
    // Equality and order
    // -------------------------------------------------------------------------

    /// Compares the edge arc images. Classes on different triangulations
    /// cannot be compared.
    pub fn try_eq(&self, other: &MappingClass) -> Result<bool, SurfaceError> {
        if !same_triangulation(self.triangulation(), other.triangulation()) {
            return Err(SurfaceError::TriangulationMismatch("comparing mapping classes"));
        }
        Ok(self.signature == other.signature)
    }

    pub fn is_identity(&self) -> bool {
        self.signature.iter().enumerate().all(|(i, row)| is_edge_arc(i, row))
    }

    /// Smallest `n` with `self^n` the identity, or 0 if there is none up to
    /// the structural bound on periodic orders.
    ///
    /// A result of 0 means "not of finite order": it is a bounded search,
    /// not a proof.
    pub fn order(&self) -> Result<usize, SurfaceError> {
        self.order_with(&EngineConfig::default())
    }

    pub fn order_with(&self, config: &EngineConfig) -> Result<usize, SurfaceError> {
        let bound = config.max_order.unwrap_or_else(|| self.triangulation().max_order());
        let mut images: Vec<Lamination> = Lamination::edge_arcs(self.triangulation());
        for n in 1..=bound {
            images = images
                .iter()
                .map(|l| self.encoding.apply(l))
                .collect::<Result<_, _>>()?;
            if images.iter().enumerate().all(|(i, l)| is_edge_arc(i, l.weights())) {
                return Ok(n);
            }
        }
        log::debug!("no period up to {bound}; treating as infinite order");
        Ok(0)
    }

    pub fn is_periodic(&self) -> Result<bool, SurfaceError> {
        Ok(self.order()? > 0)
    }
}

impl PartialEq for MappingClass {
    /// False across different triangulations.
    fn eq(&self, other: &Self) -> bool {
        same_triangulation(self.triangulation(), other.triangulation())
            && self.signature == other.signature
    }
}

impl Eq for MappingClass {}

impl Hash for MappingClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triangulation().hash(state);
        self.signature.hash(state);
    }
}

impl fmt::Display for MappingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.encoding),
        }
    }
}

impl fmt::Debug for MappingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingClass")
            .field("name", &self.name)
            .field("moves", &self.encoding.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lamination::curve::Curve;
    use crate::topology::edge::Edge;

    fn torus() -> Arc<Triangulation> {
        Arc::new(Triangulation::new([[0, 1, 2], [!0, !1, !2]]).unwrap())
    }

    fn twist(t: &Arc<Triangulation>, w: Vec<i64>) -> MappingClass {
        Curve::new(Lamination::new(Arc::clone(t), w).unwrap())
            .unwrap()
            .encode_twist(1)
            .unwrap()
    }

    #[test]
    fn non_loops_are_rejected() {
        let t = torus();
        let e = Encoding::identity(t).flip(Edge::new(0)).unwrap();
        assert!(matches!(MappingClass::new(e.clone()), Err(SurfaceError::NotAMappingClass)));
        // A single flip of the torus lands on an isometric triangulation.
        assert!(Mapping::new(e).is_ok());
    }

    #[test]
    fn twist_and_inverse_cancel() {
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]);
        let id = MappingClass::identity(Arc::clone(&t));
        assert_eq!(a.then(&a.inverse().unwrap()).unwrap(), id);
        assert!(a.pow(0).unwrap().is_identity());
        assert!(!a.is_identity());
    }

    #[test]
    fn twist_powers_keep_their_length() {
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]);
        let big = a.pow(1_000).unwrap();
        assert_eq!(big.encoding().len(), a.encoding().len());
        assert_eq!(big.twist_power(), Some(1_000));
        assert_eq!(a.pow(3).unwrap(), a.then(&a).unwrap().then(&a).unwrap());
        let inv = a.inverse().unwrap();
        assert_eq!(a.pow(-2).unwrap(), inv.then(&inv).unwrap());
    }

    #[test]
    fn generic_powers_use_binary_composition() {
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]);
        let b = twist(&t, vec![0, 1, 1]);
        let ab = a.then(&b).unwrap();
        assert_eq!(ab.twist_power(), None);
        assert_eq!(ab.pow(5).unwrap(), ab.pow(2).unwrap().then(&ab.pow(3).unwrap()).unwrap());
        assert_eq!(ab.pow(-1).unwrap(), ab.inverse().unwrap());
    }

    #[test]
    fn orders_on_the_torus() {
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]);
        let b = twist(&t, vec![0, 1, 1]);
        assert_eq!(a.order(), Ok(0));
        assert_eq!(a.then(&b).unwrap().order(), Ok(3));
        assert_eq!(a.then(&b).unwrap().then(&a).unwrap().order(), Ok(2));
        assert_eq!(a.is_periodic(), Ok(false));
        let capped = EngineConfig { max_order: Some(2), ..Default::default() };
        assert_eq!(a.then(&b).unwrap().order_with(&capped), Ok(0));
    }

    #[test]
    fn encodings_that_drop_arcs_are_reported() {
        // Flip, subdivide and unsubdivide, flip back: a loop whose middle
        // cannot carry the flipped edge arc across the subdivided triangle.
        let t = torus();
        let flip = Encoding::identity(Arc::clone(&t)).flip(Edge::new(0)).unwrap();
        let flipped = Arc::clone(flip.target());
        let subdivide =
            Move::pachner(Arc::clone(&flipped), flipped.triangle_of(Edge::new(0))).unwrap();
        let undo = crate::encoding::moves::Transport::inverse(&subdivide);
        let detour = flip
            .clone()
            .then_move(subdivide)
            .unwrap()
            .then_move(undo)
            .unwrap()
            .then(&flip.inverse())
            .unwrap();
        assert!(detour.is_mapping_class());
        let err = MappingClass::new(detour).unwrap_err();
        assert!(matches!(err, SurfaceError::TerminalArcs(_)));
        assert!(err.is_assumption());
    }

    #[test]
    fn comparing_across_triangulations_is_an_error() {
        let t = torus();
        let other = Arc::new(
            Triangulation::new([[-6, -1, 0], [-5, 2, 5], [-4, -3, 4], [-2, 1, 3]]).unwrap(),
        );
        let a = MappingClass::identity(Arc::clone(&t));
        let b = MappingClass::identity(other);
        assert!(matches!(a.try_eq(&b), Err(SurfaceError::TriangulationMismatch(_))));
        assert_ne!(a, b);
        assert_eq!(a.try_eq(&MappingClass::identity(t)), Ok(true));
    }

    #[test]
    fn equal_classes_hash_alike() {
        use std::collections::HashSet;
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]);
        let b = twist(&t, vec![0, 1, 1]);
        let ab = a.then(&b).unwrap();
        // (ab)^6 is the identity, reached by a different encoding.
        let mut seen = HashSet::new();
        seen.insert(MappingClass::identity(Arc::clone(&t)));
        seen.insert(a.clone());
        assert!(!seen.insert(ab.pow(6).unwrap()));
        assert!(!seen.insert(a.pow(2).unwrap().then(&a.inverse().unwrap()).unwrap()));
        assert!(seen.insert(b));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn names_and_display() {
        let t = torus();
        let a = twist(&t, vec![1, 1, 0]).with_name("a");
        assert_eq!(a.to_string(), "a");
        assert_eq!(a.inverse().unwrap().name(), Some("a^-1"));
        assert_eq!(MappingClass::identity(t).to_string(), "Id");
    }
}
