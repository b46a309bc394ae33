//! Multicurves: disjoint unions of curves, each with a multiplicity.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::encoding::mapping_class::MappingClass;
use crate::encoding::Encoding;
use crate::lamination::arc::MultiArc;
use crate::lamination::curve::Curve;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::triangulation::Triangulation;

/// A non-empty lamination whose components are all non-peripheral curves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiCurve(Lamination);

impl MultiCurve {
    pub fn new(lamination: Lamination) -> Result<Self, SurfaceError> {
        if lamination.is_empty() {
            return Err(SurfaceError::NotACurve("empty lamination".into()));
        }
        lamination
            .validate_realizable()
            .map_err(|e| SurfaceError::NotACurve(e.to_string()))?;
        if !lamination.is_multicurve() || lamination.has_peripheral() {
            return Err(SurfaceError::NotACurve(format!(
                "{:?} has arcs or peripheral components",
                lamination.weights()
            )));
        }
        Ok(MultiCurve(lamination))
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

    /// Distinct component curves with their multiplicities.
    pub fn components(&self) -> Result<Vec<(Curve, i64)>, SurfaceError> {
        self.components_with(&EngineConfig::default())
    }

    pub fn components_with(&self, config: &EngineConfig) -> Result<Vec<(Curve, i64)>, SurfaceError> {
        self.0
            .components_with(config)?
            .into_iter()
            .map(|(component, m)| Ok((Curve::new(component)?, m)))
            .collect()
    }

    /// The product of the twists about the components, each raised to
    /// `power` times its multiplicity.
    pub fn encode_twist(&self, power: i64) -> Result<MappingClass, SurfaceError> {
        self.encode_twist_with(power, &EngineConfig::default())
    }

    pub fn encode_twist_with(
        &self,
        power: i64,
        config: &EngineConfig,
    ) -> Result<MappingClass, SurfaceError> {
        let mut class = MappingClass::identity(Arc::clone(self.triangulation()));
        for (curve, m) in self.components_with(config)? {
            let k = power
                .checked_mul(m)
                .ok_or(SurfaceError::PowerOverflow { base: power, exponent: m })?;
            class = class.then(&curve.encode_twist_with(k, config)?)?;
        }
        Ok(class)
    }

    /// Crushes the components one after another. A component that an
    /// earlier crush made peripheral has nothing left to crush.
    pub fn crush(&self) -> Result<Encoding, SurfaceError> {
        self.crush_with(&EngineConfig::default())
    }

    pub fn crush_with(&self, config: &EngineConfig) -> Result<Encoding, SurfaceError> {
        let mut crush = Encoding::identity(Arc::clone(self.triangulation()));
        for (curve, _) in self.components_with(config)? {
            let image = crush.apply(curve.lamination())?;
            if image.is_empty() {
                continue;
            }
            let next = Curve::new(image)?.crush_with(config)?;
            crush = crush.then(&next)?;
        }
        Ok(crush)
    }

    /// The boundary of a regular neighbourhood of this multicurve together
    /// with `other`, without peripheral components.
    pub fn boundary_union(&self, other: &Lamination) -> Result<Lamination, SurfaceError> {
        self.boundary_union_with(other, &EngineConfig::default())
    }

    pub fn boundary_union_with(
        &self,
        other: &Lamination,
        config: &EngineConfig,
    ) -> Result<Lamination, SurfaceError> {
        if !other.same_triangulation(self.triangulation()) {
            return Err(SurfaceError::TriangulationMismatch("boundary of a union"));
        }
        let crush = self.crush_with(config)?;
        let crushed = crush.apply(other)?;
        let boundary = neighbourhood_boundary(&crushed, config)?;
        Ok(crush.inverse().apply(&boundary)?.remove_peripheral())
    }

    /// Whether this multicurve and `other` together fill the surface.
    pub fn fills_with(&self, other: &Lamination) -> Result<bool, SurfaceError> {
        self.fills_with_config(other, &EngineConfig::default())
    }

    pub fn fills_with_config(
        &self,
        other: &Lamination,
        config: &EngineConfig,
    ) -> Result<bool, SurfaceError> {
        for (curve, _) in self.components_with(config)? {
            if curve.intersection_with(other, config)? == 0 {
                return Ok(false);
            }
        }
        Ok(self.boundary_union_with(other, config)?.is_empty())
    }
}

/// Boundary of a regular neighbourhood of `lamination`: two copies of each
/// curve component plus the boundary of the arcs.
fn neighbourhood_boundary(
    lamination: &Lamination,
    config: &EngineConfig,
) -> Result<Lamination, SurfaceError> {
    let t = lamination.triangulation();
    let mut curves = Lamination::empty(Arc::clone(t));
    let mut arcs = Lamination::empty(Arc::clone(t));
    for (component, _) in lamination.components_with(config)? {
        if component.has_arcs() {
            arcs = arcs.scaled_add(&component, 1)?;
        } else {
            curves = curves.scaled_add(&component, 2)?;
        }
    }
    if arcs.is_empty() {
        return Ok(curves);
    }
    let arc_boundary = MultiArc::new(arcs)?.boundary_with(config)?;
    curves.scaled_add(&arc_boundary, 1)
}

impl TryFrom<Lamination> for MultiCurve {
    type Error = SurfaceError;

    fn try_from(lamination: Lamination) -> Result<Self, Self::Error> {
        MultiCurve::new(lamination)
    }
}
