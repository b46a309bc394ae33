//! Multiarcs: disjoint unions of arcs between punctures.

use std::sync::Arc;

use crate::algs::shorten::{self, ArcStrategy, ShortenStrategy};
use crate::config::EngineConfig;
use crate::encoding::mapping_class::MappingClass;
use crate::encoding::moves::HalfTwist;
use crate::encoding::Encoding;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

/// A lamination consisting of arcs only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiArc(Lamination);

impl MultiArc {
    /// Accepts any lamination with an arc component. Closed components are
    /// only detected later, when shortening cannot make progress.
    pub fn new(lamination: Lamination) -> Result<Self, SurfaceError> {
        if !lamination.is_multiarc() {
            return Err(SurfaceError::NotAMultiArc(format!("{:?}", lamination.weights())));
        }
        Ok(MultiArc(lamination))
    }

    pub fn lamination(&self) -> &Lamination {
        &self.0
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        self.0.triangulation()
    }

    /// Short when every arc is an edge of the triangulation.
    pub fn is_short(&self) -> bool {
        ArcStrategy.is_short(&self.0)
    }

    pub fn shorten(&self) -> Result<(MultiArc, Encoding), SurfaceError> {
        self.shorten_with(&EngineConfig::default())
    }

    pub fn shorten_with(&self, config: &EngineConfig) -> Result<(MultiArc, Encoding), SurfaceError> {
        let (short, conjugator) = shorten::shorten(&ArcStrategy, &self.0, config)?;
        Ok((MultiArc(short), conjugator))
    }

    /// The smallest label carrying an arc. Only defined for short multiarcs.
    pub fn parallel(&self) -> Result<Edge, SurfaceError> {
        if !self.is_short() {
            return Err(SurfaceError::NotShort(format!("{:?}", self.0.weights())));
        }
        self.triangulation()
            .edges()
            .find(|&e| self.0.get(e) < 0)
            .ok_or_else(|| SurfaceError::NotAMultiArc(format!("{:?}", self.0.weights())))
    }

    /// The multicurve bounding a regular neighbourhood of the arcs.
    ///
    /// On the short triangulation every non-arc edge gets weight 2; then each
    /// triangle meeting the multicurve on one side only is emptied and its
    /// neighbours are rechecked. Peripheral components are dropped and the
    /// rest is pulled back to the original triangulation.
    pub fn boundary(&self) -> Result<Lamination, SurfaceError> {
        self.boundary_with(&EngineConfig::default())
    }

    pub fn boundary_with(&self, config: &EngineConfig) -> Result<Lamination, SurfaceError> {
        let (short, conjugator) = self.shorten_with(config)?;
        let t = short.triangulation();
        let mut weights: Vec<i64> =
            short.0.weights().iter().map(|&w| if w < 0 { 0 } else { 2 }).collect();
        let total = |weights: &[i64], index: usize| {
            t.triangles()[index].iter().map(|e| weights[e.index()]).sum::<i64>()
        };
        let mut pending: Vec<usize> =
            (0..t.num_triangles()).filter(|&i| total(&weights, i) == 2).collect();
        while let Some(index) = pending.pop() {
            if total(&weights, index) != 2 {
                continue;
            }
            for e in t.triangles()[index].edges() {
                weights[e.index()] = 0;
                pending.push(t.triangle_of(!e));
            }
        }
        let boundary = Lamination::from_parts(Arc::clone(t), weights).remove_peripheral();
        conjugator.inverse().apply(&boundary)
    }

    /// The half twist about this arc raised to `power`.
    ///
    /// The arc must be a single arc joining two distinct punctures; an arc
    /// from a puncture back to itself fails with [`SurfaceError::ArcIsALoop`].
    pub fn encode_halftwist(&self, power: i64) -> Result<MappingClass, SurfaceError> {
        self.encode_halftwist_with(power, &EngineConfig::default())
    }

    pub fn encode_halftwist_with(
        &self,
        power: i64,
        config: &EngineConfig,
    ) -> Result<MappingClass, SurfaceError> {
        let (short, conjugator) = self.shorten_with(config)?;
        let half = HalfTwist::new(short, power, config)?;
        MappingClass::from_half_twist(conjugator, half)
    }
}

impl TryFrom<Lamination> for MultiArc {
    type Error = SurfaceError;

    fn try_from(lamination: Lamination) -> Result<Self, Self::Error> {
        MultiArc::new(lamination)
    }
}
