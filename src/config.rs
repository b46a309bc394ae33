//! Tunables for the algorithms that loop or search.

/// Engine-wide configuration.
///
/// Every algorithm taking a config also has a plain entry point that uses
/// `EngineConfig::default()`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shortening gives up after `factor * zeta * (weight + zeta)` flips.
    pub shorten_step_factor: usize,
    /// Overrides [`Triangulation::max_order`](crate::topology::triangulation::Triangulation::max_order)
    /// as the bound searched by `MappingClass::order_with`.
    pub max_order: Option<usize>,
    /// Apply twist powers through the orbit short-cut. When false every power
    /// is unrolled into single twists (reference path, linear in the power).
    pub accelerate_twists: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shorten_step_factor: 4,
            max_order: None,
            accelerate_twists: true,
        }
    }
}

impl EngineConfig {
    /// Step guard for shortening a lamination of the given weight.
    pub fn shorten_bound(&self, zeta: usize, weight: i64) -> usize {
        let weight = usize::try_from(weight.max(0)).unwrap_or(usize::MAX);
        self.shorten_step_factor
            .saturating_mul(zeta.max(1))
            .saturating_mul(weight.saturating_add(zeta))
    }
}
