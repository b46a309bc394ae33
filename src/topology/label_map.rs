//! Edge correspondences between two triangulations.
//!
//! A [`LabelMap`] sends every oriented label of a source triangulation to an
//! oriented label of a target one. Flips return the identity correspondence
//! (the flipped edge keeps its label); isometries and crushes carry real
//! relabelings.

use std::fmt;

use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;

/// A total map on the `2 * zeta` oriented labels of a triangulation.
///
/// Stored densely by label slot so lookups are O(1).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LabelMap {
    zeta: usize,
    images: Vec<Edge>,
}

impl LabelMap {
    /// The identity correspondence on `zeta` edges.
    pub fn identity(zeta: usize) -> Self {
        LabelMap {
            zeta,
            images: (0..2 * zeta).map(|s| Edge::from_slot(s, zeta)).collect(),
        }
    }

    /// Builds a map from `(from, to)` pairs, which must cover every label once.
    pub fn from_pairs(
        zeta: usize,
        pairs: impl IntoIterator<Item = (Edge, Edge)>,
    ) -> Result<Self, SurfaceError> {
        let mut images: Vec<Option<Edge>> = vec![None; 2 * zeta];
        for (from, to) in pairs {
            for e in [from, to] {
                if e.index() >= zeta {
                    return Err(SurfaceError::UnknownEdge { edge: e, zeta });
                }
            }
            images[from.slot(zeta)] = Some(to);
        }
        let images = images
            .into_iter()
            .enumerate()
            .map(|(s, img)| {
                img.ok_or_else(|| {
                    SurfaceError::InvalidGluing(format!(
                        "label map omits edge {}",
                        Edge::from_slot(s, zeta)
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let map = LabelMap { zeta, images };
        map.check_bijective()?;
        Ok(map)
    }

    fn check_bijective(&self) -> Result<(), SurfaceError> {
        let mut hit = vec![false; 2 * self.zeta];
        for &img in &self.images {
            let slot = img.slot(self.zeta);
            if hit[slot] {
                return Err(SurfaceError::InvalidGluing(format!(
                    "label map hits {img} twice"
                )));
            }
            hit[slot] = true;
        }
        Ok(())
    }

    #[inline]
    pub fn zeta(&self) -> usize {
        self.zeta
    }

    /// Image of an oriented label.
    #[inline]
    pub fn get(&self, edge: Edge) -> Edge {
        self.images[edge.slot(self.zeta)]
    }

    /// The inverse correspondence.
    pub fn inverse(&self) -> LabelMap {
        let mut images = vec![Edge::new(0); 2 * self.zeta];
        for (slot, &img) in self.images.iter().enumerate() {
            images[img.slot(self.zeta)] = Edge::from_slot(slot, self.zeta);
        }
        LabelMap { zeta: self.zeta, images }
    }

    /// Whether the map respects reversal: `f(!e) == !f(e)`.
    pub fn respects_orientation(&self) -> bool {
        (0..self.zeta).all(|i| {
            let e = Edge::positive(i);
            self.get(!e) == !self.get(e)
        })
    }

    pub fn is_identity(&self) -> bool {
        self.images
            .iter()
            .enumerate()
            .all(|(s, &img)| img == Edge::from_slot(s, self.zeta))
    }

    /// `(from, to)` pairs over every oriented label.
    pub fn iter(&self) -> impl Iterator<Item = (Edge, Edge)> + '_ {
        self.images
            .iter()
            .enumerate()
            .map(move |(s, &img)| (Edge::from_slot(s, self.zeta), img))
    }
}

impl fmt::Debug for LabelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries((0..self.zeta).map(|i| {
                let e = Edge::positive(i);
                (e, self.get(e))
            }))
            .finish()
    }
}
