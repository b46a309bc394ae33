//! Gluing tables: the construction input for triangulations.
//!
//! A gluing table lists, for each triangle, its three oriented edge labels
//! in anticlockwise order. Edge `i` is glued to the triangle containing `!i`.
//! The table is what a surrounding tool persists; [`GluingTable::from`] on a
//! [`Triangulation`] gives back the same shape.

use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

/// One side of one triangle in a gluing table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Side {
    pub triangle: usize,
    pub side: usize,
}

/// Triangles as raw label triples.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GluingTable {
    pub triangles: Vec<[i32; 3]>,
}

impl GluingTable {
    pub fn new(triangles: Vec<[i32; 3]>) -> Self {
        GluingTable { triangles }
    }

    /// Number of edges the table describes, `3F / 2`.
    pub fn zeta(&self) -> usize {
        self.triangles.len() * 3 / 2
    }

    /// Checks the table is internally consistent and returns `zeta`.
    ///
    /// Every label of `0..zeta` and its reverse must occur exactly once.
    pub fn validate(&self) -> Result<usize, SurfaceError> {
        if self.triangles.is_empty() {
            return Err(SurfaceError::InvalidGluing("no triangles".into()));
        }
        if (self.triangles.len() * 3) % 2 != 0 {
            return Err(SurfaceError::InvalidGluing(format!(
                "{} triangles have an odd number of sides",
                self.triangles.len()
            )));
        }
        let zeta = self.zeta();
        let mut seen = vec![false; 2 * zeta];
        for (t, tri) in self.triangles.iter().enumerate() {
            for &label in tri {
                let edge = Edge::new(label);
                if edge.index() >= zeta {
                    return Err(SurfaceError::InvalidGluing(format!(
                        "triangle {t} uses label {label} outside -{zeta}..{zeta}"
                    )));
                }
                let slot = edge.slot(zeta);
                if seen[slot] {
                    return Err(SurfaceError::InvalidGluing(format!(
                        "label {label} is used twice"
                    )));
                }
                seen[slot] = true;
            }
        }
        Ok(zeta)
    }

    /// For each edge index, the two sides it borders: first the side carrying
    /// the positive label, then the side carrying its reverse.
    pub fn edge_sides(&self) -> Result<Vec<[Side; 2]>, SurfaceError> {
        let zeta = self.validate()?;
        let mut sides = vec![[Side { triangle: 0, side: 0 }; 2]; zeta];
        for (triangle, tri) in self.triangles.iter().enumerate() {
            for (side, &label) in tri.iter().enumerate() {
                let edge = Edge::new(label);
                let which = usize::from(!edge.is_positive());
                sides[edge.index()][which] = Side { triangle, side };
            }
        }
        Ok(sides)
    }
}

impl From<&Triangulation> for GluingTable {
    fn from(triangulation: &Triangulation) -> Self {
        GluingTable {
            triangles: triangulation.triangles().iter().map(|t| t.labels()).collect(),
        }
    }
}

impl From<Vec<[i32; 3]>> for GluingTable {
    fn from(triangles: Vec<[i32; 3]>) -> Self {
        GluingTable { triangles }
    }
}
